//! Query string construction for API requests.
//!
//! Every BetaSeries endpoint takes its parameters through the query string.
//! Most of them are optional and must only be sent when the caller actually
//! set them, so `QueryParams` offers one method per inclusion rule instead
//! of a plain `insert`.

use super::ApiError;
use std::collections::BTreeMap;
use url::Url;

/// Builder for the query parameters of a single request.
///
/// Parameters are kept sorted by key, which makes the encoded query string
/// deterministic for logging and error reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<&'static str, String>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always sends `key` with the given value.
    pub fn set(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.insert(key, value.to_string());
        self
    }

    /// Sends `key` only when `value` is not empty.
    pub fn text(self, key: &'static str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.set(key, value)
        }
    }

    /// Sends `key` as decimal text only when `value` is strictly positive.
    pub fn number(self, key: &'static str, value: i64) -> Self {
        if value > 0 { self.set(key, value) } else { self }
    }

    /// Sends `key=true` when `value` is set, omits the key otherwise.
    pub fn flag(self, key: &'static str, value: bool) -> Self {
        if value { self.set(key, "true") } else { self }
    }

    /// Always sends `key` as the literal `true` or `false`.
    ///
    /// Used for parameters whose upstream default is `true`, where omitting
    /// the key would not mean "false".
    pub fn boolean(self, key: &'static str, value: bool) -> Self {
        self.set(key, if value { "true" } else { "false" })
    }

    /// Sends a mandatory identifier, rejecting non-positive values locally.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingParameter` when `value` is zero or negative.
    pub fn required_id(self, key: &'static str, value: i64) -> Result<Self, ApiError> {
        if value <= 0 {
            return Err(ApiError::MissingParameter { name: key });
        }
        Ok(self.set(key, value))
    }

    /// Sends a mandatory string, rejecting empty values locally.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingParameter` when `value` is empty.
    pub fn required_text(self, key: &'static str, value: &str) -> Result<Self, ApiError> {
        if value.is_empty() {
            return Err(ApiError::MissingParameter { name: key });
        }
        Ok(self.set(key, value))
    }

    /// Returns the value that will be sent for `key`, if any.
    #[cfg(test)]
    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns true if no parameter was set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Writes the parameters into the query string of `url`.
    ///
    /// Any query already present on `url` is replaced. An empty parameter
    /// set leaves the URL without a `?`.
    pub(crate) fn apply_to(&self, url: &mut Url) {
        if self.is_empty() {
            url.set_query(None);
            return;
        }

        url.query_pairs_mut()
            .clear()
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())));
    }
}

//! BetaSeries API client.
//!
//! `BetaSeriesClient` owns a base URL and a `Transport`. Every endpoint goes
//! through the same pipeline: the caller-facing method validates its required
//! parameters while building a `QueryParams`, then `call` composes the URL,
//! performs one request and decodes the response envelope.

mod envelope;
mod episodes;
mod friends;
mod members;
mod planning;
mod query;
mod subtitles;
mod transport;
mod types;

pub use envelope::ApiErrorRecord;
pub use episodes::{EpisodeTarget, WatchedOptions};
pub use members::InfosScope;
pub use planning::{GeneralPlanning, PlanningType};
pub use query::QueryParams;
pub use subtitles::SubtitleLanguage;
pub use transport::{
    API_KEY_HEADER, API_VERSION_HEADER, HttpResponse, HttpTransport, TOKEN_HEADER, Transport,
    TransportError,
};
pub use types::{
    Episode, EpisodeShow, EpisodeUserState, Member, MemberOptions, MemberStats, Rating, Show,
    Subtitle, SubtitleEpisode,
};

use envelope::Envelope;
use reqwest::Method;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Default address of the BetaSeries API.
pub const DEFAULT_BASE_URL: &str = "https://api.betaseries.com";

/// Errors returned by API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A parameter the endpoint requires was not set.
    #[error("Parameter '{name}' is not set")]
    MissingParameter { name: &'static str },

    /// A parameter was set to a value the endpoint does not accept.
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The configured base URL cannot be used to build request URLs.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP round trip failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The API reported one or more errors.
    #[error("API error on {endpoint} (query '{query}'): {}", join_errors(.errors))]
    Api {
        endpoint: String,
        query: String,
        errors: Vec<ApiErrorRecord>,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response of {endpoint} (query '{query}'): {source}")]
    Decode {
        endpoint: String,
        query: String,
        source: serde_json::Error,
    },

    /// The API answered with a non-success status and no usable error report.
    #[error("HTTP {status} on {endpoint} (query '{query}'): {body}")]
    HttpStatus {
        endpoint: String,
        query: String,
        status: u16,
        body: String,
    },

    #[error("no episodes found")]
    NoEpisodesFound,

    #[error("no members found")]
    NoMembersFound,

    #[error("no subtitles found")]
    NoSubtitlesFound,
}

impl ApiError {
    /// Returns true for the "nothing matched" outcomes.
    ///
    /// These are legitimate negative results rather than failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::NoEpisodesFound | ApiError::NoMembersFound | ApiError::NoSubtitlesFound
        )
    }

    /// Returns true for errors raised before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ApiError::MissingParameter { .. } | ApiError::InvalidParameter { .. }
        )
    }
}

fn join_errors(errors: &[ApiErrorRecord]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Handle to the BetaSeries API.
///
/// The handle is cheap to share by reference and carries no state between
/// calls. Each method issues exactly one request; retries are left to the
/// caller.
///
/// # Examples
///
/// ```no_run
/// use betaseries::{BetaSeriesClient, Config, HttpTransport, SubtitleLanguage};
///
/// let config = Config::load(None)?;
/// let transport = HttpTransport::from_config(&config)?;
/// let client = BetaSeriesClient::new(&config.base_url, transport)?;
///
/// let subtitles = client.subtitles_episode(42, Some(SubtitleLanguage::Vf))?;
/// println!("{} subtitle(s)", subtitles.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct BetaSeriesClient<T> {
    base_url: Url,
    transport: T,
}

impl<T: Transport> BetaSeriesClient<T> {
    /// Creates a client sending requests below `base_url` through `transport`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if `base_url` does not parse or
    /// cannot carry a path (e.g. `mailto:` URLs).
    pub fn new(base_url: &str, transport: T) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        Ok(Self {
            base_url: parsed,
            transport,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the full URL of `endpoint` with `query` applied.
    ///
    /// The endpoint path is appended to the path of the base URL, so a base
    /// such as `http://localhost/api` is kept as a prefix.
    fn endpoint_url(&self, endpoint: &str, query: &QueryParams) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}{}", url.path().trim_end_matches('/'), endpoint);
        url.set_path(&path);
        url.set_fragment(None);
        query.apply_to(&mut url);
        url
    }

    /// Sends one request and decodes its envelope.
    fn call<E: Envelope>(
        &self,
        method: Method,
        endpoint: &str,
        query: QueryParams,
    ) -> Result<E::Payload, ApiError> {
        let url = self.endpoint_url(endpoint, &query);
        let raw_query = url.query().unwrap_or_default().to_string();

        debug!(%method, endpoint, query = %raw_query, "sending request");
        let response = self.transport.execute(&method, &url)?;

        decode::<E>(endpoint, &raw_query, &response)
    }
}

/// Decodes a response into the payload of envelope `E`.
///
/// Reported API errors take precedence over the payload. A structurally valid
/// response with an empty payload yields the family's "not found" error.
fn decode<E: Envelope>(
    endpoint: &str,
    query: &str,
    response: &HttpResponse,
) -> Result<E::Payload, ApiError> {
    let envelope: E = match serde_json::from_slice(&response.body) {
        Ok(envelope) => envelope,
        Err(_) if !response.is_success() => {
            return Err(http_status_error(endpoint, query, response));
        }
        Err(source) => {
            return Err(ApiError::Decode {
                endpoint: endpoint.to_string(),
                query: query.to_string(),
                source,
            });
        }
    };

    let (errors, payload) = envelope.into_parts();

    if !errors.is_empty() {
        warn!(endpoint, query, errors = %join_errors(&errors), "API reported errors");
        return Err(ApiError::Api {
            endpoint: endpoint.to_string(),
            query: query.to_string(),
            errors,
        });
    }

    if !response.is_success() {
        return Err(http_status_error(endpoint, query, response));
    }

    match payload {
        Some(payload) => Ok(payload),
        None => {
            debug!(endpoint, query, "empty result");
            Err(E::not_found())
        }
    }
}

fn http_status_error(endpoint: &str, query: &str, response: &HttpResponse) -> ApiError {
    ApiError::HttpStatus {
        endpoint: endpoint.to_string(),
        query: query.to_string(),
        status: response.status,
        body: response.body_text(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording stub transport shared by the endpoint tests.
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug)]
    pub(crate) struct StubTransport {
        response: HttpResponse,
        pub(crate) requests: RefCell<Vec<(Method, Url)>>,
    }

    impl StubTransport {
        pub(crate) fn new(status: u16, body: &str) -> Self {
            Self {
                response: HttpResponse::new(status, body),
                requests: RefCell::new(Vec::new()),
            }
        }

        /// The only request sent, panics if there were none or several.
        pub(crate) fn single_request(&self) -> (Method, Url) {
            let requests = self.requests.borrow();
            assert_eq!(requests.len(), 1, "expected exactly one request");
            requests[0].clone()
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for StubTransport {
        fn execute(&self, method: &Method, url: &Url) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push((method.clone(), url.clone()));
            Ok(self.response.clone())
        }
    }

    pub(crate) fn client(status: u16, body: &str) -> BetaSeriesClient<StubTransport> {
        BetaSeriesClient::new("https://api.example.test", StubTransport::new(status, body))
            .unwrap()
    }

    /// Query pairs of a URL as owned strings.
    pub(crate) fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub(crate) fn has_key(url: &Url, key: &str) -> bool {
        url.query_pairs().any(|(k, _)| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use super::envelope::{EpisodeItem, SubtitleList};

    #[test]
    fn test_rejects_malformed_base_url() {
        let err = BetaSeriesClient::new("not a url", StubTransport::new(200, "{}")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));

        let err = BetaSeriesClient::new("mailto:me@example.test", StubTransport::new(200, "{}"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client =
            BetaSeriesClient::new("http://localhost:8080/api/", StubTransport::new(200, "{}"))
                .unwrap();
        let url = client.endpoint_url("/episodes/display", &QueryParams::new().set("id", 1));
        assert_eq!(url.as_str(), "http://localhost:8080/api/episodes/display?id=1");
    }

    #[test]
    fn test_api_errors_win_over_payload() {
        let body = r#"{"episode": {"id": 1}, "errors": [{"type": "api", "code": 4001, "text": "nope"}]}"#;
        let err = decode::<EpisodeItem>("/episodes/display", "id=1", &HttpResponse::new(200, body))
            .unwrap_err();

        match err {
            ApiError::Api {
                endpoint,
                query,
                errors,
            } => {
                assert_eq!(endpoint, "/episodes/display");
                assert_eq!(query, "id=1");
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].code, 4001);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_list_is_not_found() {
        let body = r#"{"subtitles": [], "errors": []}"#;
        let err = decode::<SubtitleList>("/subtitles/last", "", &HttpResponse::new(200, body))
            .unwrap_err();
        assert!(matches!(err, ApiError::NoSubtitlesFound));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = decode::<EpisodeItem>("/episodes/next", "id=3", &HttpResponse::new(200, "<html>"))
            .unwrap_err();
        match err {
            ApiError::Decode { endpoint, query, .. } => {
                assert_eq!(endpoint, "/episodes/next");
                assert_eq!(query, "id=3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failed_status_without_errors() {
        let err = decode::<EpisodeItem>("/episodes/next", "", &HttpResponse::new(502, "Bad Gateway"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus { status: 502, .. }));

        let err = decode::<EpisodeItem>("/episodes/next", "", &HttpResponse::new(500, "{}"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus { status: 500, .. }));
    }

    #[test]
    fn test_error_status_with_reported_errors_is_api_error() {
        let body = r#"{"errors": [{"type": "api", "code": 2005, "text": "Wrong token"}]}"#;
        let err = decode::<EpisodeItem>("/episodes/watched", "id=1", &HttpResponse::new(400, body))
            .unwrap_err();
        assert!(matches!(err, ApiError::Api { .. }));
        assert!(err.to_string().contains("Wrong token (2005)"));
    }

    #[test]
    fn test_call_sends_single_request() {
        let client = client(200, r#"{"episode": {"id": 9, "title": "Ozymandias"}, "errors": []}"#);
        let episode = client
            .call::<EpisodeItem>(Method::GET, "/episodes/display", QueryParams::new().set("id", 9))
            .unwrap();

        assert_eq!(episode.title, "Ozymandias");
        let (method, url) = client.transport().single_request();
        assert_eq!(method, Method::GET);
        assert_eq!(url.path(), "/episodes/display");
        assert_eq!(pairs(&url), vec![("id".to_string(), "9".to_string())]);
    }
}

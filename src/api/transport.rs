//! HTTP transport used by the API client.
//!
//! The client never talks to the network directly. It hands a method and a
//! fully built URL to a `Transport`, which performs exactly one request and
//! returns the buffered response.

use crate::config::Config;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors raised while performing the HTTP round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS, timeout or protocol failure reported by reqwest.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A credential or version from the configuration is not a valid header value.
    #[error("Invalid value for header {header}: {source}")]
    InvalidHeader {
        header: &'static str,
        source: InvalidHeaderValue,
    },

    /// I/O failure in a transport that is not backed by reqwest.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response from a status and a body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can issue one authenticated HTTP request.
///
/// Requests never carry a body; all parameters are already encoded in `url`.
/// Implementations must release the underlying connection before returning,
/// on success and failure alike.
pub trait Transport {
    /// Performs a single request and returns the buffered response.
    fn execute(&self, method: &Method, url: &Url) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, method: &Method, url: &Url) -> Result<HttpResponse, TransportError> {
        (**self).execute(method, url)
    }
}

/// Header carrying the developer API key.
pub const API_KEY_HEADER: &str = "x-betaseries-key";
/// Header selecting the API version.
pub const API_VERSION_HEADER: &str = "x-betaseries-version";
/// Header carrying the member access token.
pub const TOKEN_HEADER: &str = "x-betaseries-token";

/// Blocking reqwest transport with the BetaSeries authentication headers.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Wraps an already configured reqwest client.
    ///
    /// The client is expected to send the authentication headers itself.
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    /// Builds a transport sending the credentials found in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential cannot be used as a header value or
    /// the TLS backend fails to initialize.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, header_value(API_KEY_HEADER, &config.api_key)?);
        headers.insert(
            API_VERSION_HEADER,
            header_value(API_VERSION_HEADER, &config.api_version)?,
        );
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = header_value(TOKEN_HEADER, token)?;
            value.set_sensitive(true);
            headers.insert(TOKEN_HEADER, value);
        }

        let mut builder = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("betaseries/", env!("CARGO_PKG_VERSION")));

        // reqwest's blocking client has a 30s default; None disables it
        builder = builder.timeout(config.timeout_secs.map(Duration::from_secs));

        Ok(Self::new(builder.build()?))
    }
}

impl Transport for HttpTransport {
    fn execute(&self, method: &Method, url: &Url) -> Result<HttpResponse, TransportError> {
        let response = self.client.request(method.clone(), url.clone()).send()?;
        let status = response.status().as_u16();

        // Reading the body consumes the response and frees the connection,
        // also when this returns early with an error.
        let body = response.bytes()?.to_vec();
        debug!(status, bytes = body.len(), "received response");

        Ok(HttpResponse { status, body })
    }
}

fn header_value(header: &'static str, value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value).map_err(|source| TransportError::InvalidHeader { header, source })
}

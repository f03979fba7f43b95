//! betaseries - Typed client for the BetaSeries episode tracking API.
//!
//! This library translates method calls into requests against the BetaSeries
//! REST endpoints (episodes, friends, members, planning, subtitles) and
//! decodes the JSON envelopes into typed records.
//!
//! Every call performs exactly one request. Errors are classified as local
//! validation failures, transport failures, API or decoding failures, and the
//! expected "nothing found" outcomes (see [`ApiError::is_not_found`]).

mod api;
mod config;

pub use api::{
    API_KEY_HEADER, API_VERSION_HEADER, ApiError, ApiErrorRecord, BetaSeriesClient,
    DEFAULT_BASE_URL, Episode, EpisodeShow, EpisodeTarget, EpisodeUserState, GeneralPlanning,
    HttpResponse, HttpTransport, InfosScope, Member, MemberOptions, MemberStats, PlanningType,
    QueryParams, Rating, Show, Subtitle, SubtitleEpisode, SubtitleLanguage, TOKEN_HEADER,
    Transport, TransportError, WatchedOptions,
};
pub use config::{
    Config, ConfigError, DEFAULT_API_VERSION, ENV_API_KEY, ENV_API_VERSION, ENV_BASE_URL,
    ENV_TOKEN, default_config_path,
};

// Re-exported so custom transports can name the request types
pub use reqwest::Method;
pub use url::Url;

use thiserror::Error;

/// Top-level error type for setting up and using a client.
#[derive(Debug, Error)]
pub enum BetaSeriesError {
    /// Error while loading the configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while building the HTTP transport.
    #[error("Transport setup error: {0}")]
    Transport(#[from] TransportError),

    /// Error returned by an API call.
    #[error("{0}")]
    Api(#[from] ApiError),
}

/// Builds a client over HTTP from a loaded configuration.
///
/// # Examples
///
/// ```no_run
/// use betaseries::{Config, EpisodeTarget, connect};
///
/// let client = connect(&Config::load(None)?)?;
/// let episode = client.episode_next(EpisodeTarget::Id(1161))?;
/// println!("{} - {}", episode.code, episode.title);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn connect(config: &Config) -> Result<BetaSeriesClient<HttpTransport>, BetaSeriesError> {
    let transport = HttpTransport::from_config(config)?;
    Ok(BetaSeriesClient::new(&config.base_url, transport)?)
}

//! Subtitle endpoints (`/subtitles/*`).

use super::envelope::SubtitleList;
use super::{ApiError, BetaSeriesClient, QueryParams, Subtitle, Transport};
use reqwest::Method;
use std::fmt;
use std::str::FromStr;

/// Language filter of the subtitle endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleLanguage {
    /// Every available language.
    All,
    /// Original and French versions.
    VoVf,
    /// Original version.
    Vo,
    /// French version.
    Vf,
}

impl SubtitleLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            SubtitleLanguage::All => "all",
            SubtitleLanguage::VoVf => "vovf",
            SubtitleLanguage::Vo => "vo",
            SubtitleLanguage::Vf => "vf",
        }
    }
}

impl fmt::Display for SubtitleLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubtitleLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(SubtitleLanguage::All),
            "vovf" => Ok(SubtitleLanguage::VoVf),
            "vo" => Ok(SubtitleLanguage::Vo),
            "vf" => Ok(SubtitleLanguage::Vf),
            other => Err(format!(
                "unknown language '{other}', expected one of: all, vovf, vo, vf"
            )),
        }
    }
}

fn with_language(query: QueryParams, language: Option<SubtitleLanguage>) -> QueryParams {
    match language {
        Some(language) => query.set("language", language.as_str()),
        None => query,
    }
}

impl<T: Transport> BetaSeriesClient<T> {
    /// Lists the subtitles of an episode.
    pub fn subtitles_episode(
        &self,
        id: i64,
        language: Option<SubtitleLanguage>,
    ) -> Result<Vec<Subtitle>, ApiError> {
        let query = with_language(QueryParams::new().required_id("id", id)?, language);
        self.call::<SubtitleList>(Method::GET, "/subtitles/episode", query)
    }

    /// Lists the subtitles of all episodes of a show.
    pub fn subtitles_show(
        &self,
        id: i64,
        language: Option<SubtitleLanguage>,
    ) -> Result<Vec<Subtitle>, ApiError> {
        let query = with_language(QueryParams::new().required_id("id", id)?, language);
        self.call::<SubtitleList>(Method::GET, "/subtitles/show", query)
    }

    /// Lists the most recently added subtitles.
    ///
    /// The API caps `number` at 100; 0 keeps the API default.
    pub fn subtitles_last(
        &self,
        number: i64,
        language: Option<SubtitleLanguage>,
    ) -> Result<Vec<Subtitle>, ApiError> {
        let query = with_language(QueryParams::new().number("number", number), language);
        self.call::<SubtitleList>(Method::GET, "/subtitles/last", query)
    }
}

//! Episode endpoints (`/episodes/*`).

use super::envelope::EpisodeItem;
use super::{ApiError, BetaSeriesClient, Episode, QueryParams, Transport};
use reqwest::Method;

/// Identifies an episode or a show, either by BetaSeries or TheTVDB id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeTarget {
    /// BetaSeries identifier, sent as `id`.
    Id(i64),
    /// TheTVDB identifier, sent as `thetvdb_id`.
    TheTvdb(i64),
}

impl EpisodeTarget {
    fn apply(self, query: QueryParams) -> Result<QueryParams, ApiError> {
        match self {
            EpisodeTarget::Id(id) => query.required_id("id", id),
            EpisodeTarget::TheTvdb(id) => query.required_id("thetvdb_id", id),
        }
    }
}

/// Options of the watched marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchedOptions {
    /// Also mark all previous episodes as watched (upstream default: true).
    pub bulk: bool,
    /// Unmark the episodes after this one.
    pub delete: bool,
    /// Rating to give the episode, 1 to 5.
    pub note: Option<u8>,
}

impl Default for WatchedOptions {
    fn default() -> Self {
        Self {
            bulk: true,
            delete: false,
            note: None,
        }
    }
}

impl<T: Transport> BetaSeriesClient<T> {
    /// Fetches one episode, optionally with its subtitles embedded.
    pub fn episode_display(
        &self,
        target: EpisodeTarget,
        subtitles: bool,
    ) -> Result<Episode, ApiError> {
        let query = target.apply(QueryParams::new())?.flag("subtitles", subtitles);
        self.call::<EpisodeItem>(Method::GET, "/episodes/display", query)
    }

    /// Fetches the latest aired episode of a show.
    pub fn episode_latest(&self, show: EpisodeTarget) -> Result<Episode, ApiError> {
        let query = show.apply(QueryParams::new())?;
        self.call::<EpisodeItem>(Method::GET, "/episodes/latest", query)
    }

    /// Fetches the next episode to watch in a show.
    pub fn episode_next(&self, show: EpisodeTarget) -> Result<Episode, ApiError> {
        let query = show.apply(QueryParams::new())?;
        self.call::<EpisodeItem>(Method::GET, "/episodes/next", query)
    }

    /// Finds an episode of a show by its number (`S01E05` or `1x05`).
    ///
    /// The show is passed as `show_id`; an empty `number` is not sent.
    pub fn episode_search(
        &self,
        show_id: i64,
        number: &str,
        subtitles: bool,
    ) -> Result<Episode, ApiError> {
        let query = QueryParams::new()
            .required_id("show_id", show_id)?
            .text("number", number)
            .flag("subtitles", subtitles);
        self.call::<EpisodeItem>(Method::GET, "/episodes/search", query)
    }

    /// Identifies an episode from a video file name.
    pub fn episode_scraper(&self, file: &str) -> Result<Episode, ApiError> {
        let query = QueryParams::new().required_text("file", file)?;
        self.call::<EpisodeItem>(Method::GET, "/episodes/scraper", query)
    }

    /// Marks an episode as downloaded.
    pub fn episode_downloaded(&self, target: EpisodeTarget) -> Result<Episode, ApiError> {
        self.episode_update(Method::POST, "/episodes/downloaded", target)
    }

    /// Removes the downloaded mark of an episode.
    pub fn episode_not_downloaded(&self, target: EpisodeTarget) -> Result<Episode, ApiError> {
        self.episode_update(Method::DELETE, "/episodes/downloaded", target)
    }

    /// Marks an episode as watched.
    ///
    /// `bulk` is always sent, even when true, because the upstream default
    /// has changed between API versions.
    pub fn episode_watched(
        &self,
        target: EpisodeTarget,
        options: &WatchedOptions,
    ) -> Result<Episode, ApiError> {
        let mut query = target
            .apply(QueryParams::new())?
            .boolean("bulk", options.bulk)
            .flag("delete", options.delete);

        if let Some(note) = options.note {
            if !(1..=5).contains(&note) {
                return Err(ApiError::InvalidParameter {
                    name: "note",
                    reason: format!("{note} is not between 1 and 5"),
                });
            }
            query = query.set("note", note);
        }

        self.call::<EpisodeItem>(Method::POST, "/episodes/watched", query)
    }

    /// Removes the watched mark of an episode.
    pub fn episode_not_watched(&self, target: EpisodeTarget) -> Result<Episode, ApiError> {
        self.episode_update(Method::DELETE, "/episodes/watched", target)
    }

    fn episode_update(
        &self,
        method: Method,
        endpoint: &str,
        target: EpisodeTarget,
    ) -> Result<Episode, ApiError> {
        let query = target.apply(QueryParams::new())?;
        self.call::<EpisodeItem>(method, endpoint, query)
    }
}

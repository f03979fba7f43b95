//! Records returned by the BetaSeries API.
//!
//! These structures mirror the JSON objects of the API. Every field falls
//! back to its default when the API leaves it out or sends `null`, since the
//! set of fields returned varies between endpoints.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads a field that may be `null`, giving its default in that case.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An episode of a show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Episode {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    /// Identifier of the episode on TheTVDB.
    #[serde(deserialize_with = "null_as_default")]
    pub thetvdb_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub youtube_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub season: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub episode: u32,
    /// The show this episode belongs to.
    #[serde(deserialize_with = "null_as_default")]
    pub show: EpisodeShow,
    /// Season/episode code such as `S01E05`.
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    /// Position of the episode across all seasons.
    #[serde(deserialize_with = "null_as_default")]
    pub global: u32,
    /// Non-zero for specials.
    #[serde(deserialize_with = "null_as_default")]
    pub special: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// Broadcast date as `YYYY-MM-DD`.
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub note: Rating,
    /// State of the episode for the authenticated member.
    #[serde(deserialize_with = "null_as_default")]
    pub user: EpisodeUserState,
    #[serde(deserialize_with = "null_as_default")]
    pub comments: String,
    /// Only filled when subtitles were requested.
    #[serde(deserialize_with = "null_as_default")]
    pub subtitles: Vec<Subtitle>,
}

/// Short show reference embedded in episodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeShow {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub thetvdb_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
}

/// Aggregated member ratings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rating {
    /// Number of votes.
    #[serde(deserialize_with = "null_as_default")]
    pub total: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub mean: f32,
    /// Rating given by the authenticated member, 0 if none.
    #[serde(deserialize_with = "null_as_default")]
    pub user: u32,
}

/// Per-member flags of an episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeUserState {
    #[serde(deserialize_with = "null_as_default")]
    pub seen: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub downloaded: bool,
}

/// A BetaSeries member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub fb_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub login: String,
    /// Experience points.
    #[serde(deserialize_with = "null_as_default")]
    pub xp: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub cached: i64,
    pub avatar: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub in_account: bool,
    pub stats: Option<MemberStats>,
    #[serde(deserialize_with = "null_as_default")]
    pub favorites: Vec<Show>,
    #[serde(deserialize_with = "null_as_default")]
    pub shows: Vec<Show>,
    pub options: Option<MemberOptions>,
}

/// Statistics block of a member profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberStats {
    #[serde(deserialize_with = "null_as_default")]
    pub friends: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub shows: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub seasons: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub episodes: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub comments: u32,
    /// Percentage of followed episodes already watched.
    #[serde(deserialize_with = "null_as_default")]
    pub progress: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub episodes_to_watch: u32,
    /// Minutes spent watching.
    #[serde(deserialize_with = "null_as_default")]
    pub time_on_tv: u64,
    /// Minutes left to watch.
    #[serde(deserialize_with = "null_as_default")]
    pub time_to_spend: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub movies: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub badges: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub member_since_days: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub friends_of_friends: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub episodes_per_month: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub favorite_day: String,
    #[serde(deserialize_with = "null_as_default")]
    pub five_stars_percent: f64,
    #[serde(rename = "four-five_stars_total")]
    #[serde(deserialize_with = "null_as_default")]
    pub four_five_stars_total: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub streak_days: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub favorite_genre: String,
    #[serde(deserialize_with = "null_as_default")]
    pub written_words: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub without_days: u32,
}

/// Display preferences of a member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberOptions {
    #[serde(deserialize_with = "null_as_default")]
    pub downloaded: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub notation: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub timelag: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub global: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub specials: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub friendship: String,
}

/// A show as embedded in member profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Show {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub thetvdb_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// A subtitle file for an episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subtitle {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    /// One of `VO`, `VF`, ...
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    /// Site the subtitle comes from (addic7ed, tvsubtitles, ...).
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quality: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub file: String,
    /// File names inside an archive.
    #[serde(deserialize_with = "null_as_default")]
    pub content: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub episode: SubtitleEpisode,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
}

/// Back reference from a subtitle to its episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleEpisode {
    #[serde(deserialize_with = "null_as_default")]
    pub show_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub episode_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub season: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub episode: u32,
}

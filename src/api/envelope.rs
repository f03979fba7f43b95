//! Response envelopes.
//!
//! Every BetaSeries response is a JSON object with an `errors` array next to
//! the payload, which is either a single named object or a named list. Each
//! envelope type below matches one of those shapes.

use super::ApiError;
use super::types::{Episode, Member, Subtitle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An error object reported by the API inside the `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiErrorRecord {
    /// Error category, e.g. `api`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Numeric BetaSeries error code.
    pub code: i64,
    #[serde(rename = "text", alias = "message")]
    pub message: String,
}

impl fmt::Display for ApiErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// A decoded response shape.
pub(crate) trait Envelope: DeserializeOwned {
    /// The record(s) callers get back.
    type Payload;

    /// Splits the envelope into the reported errors and the payload.
    ///
    /// The payload is `None` if the target field was null, missing or an
    /// empty list.
    fn into_parts(self) -> (Vec<ApiErrorRecord>, Option<Self::Payload>);

    /// The "nothing matched" error of this envelope's resource family.
    fn not_found() -> ApiError;
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

/// `{"episode": {...}, "errors": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct EpisodeItem {
    #[serde(default)]
    episode: Option<Episode>,
    #[serde(default)]
    errors: Option<Vec<ApiErrorRecord>>,
}

impl Envelope for EpisodeItem {
    type Payload = Episode;

    fn into_parts(self) -> (Vec<ApiErrorRecord>, Option<Episode>) {
        (self.errors.unwrap_or_default(), self.episode)
    }

    fn not_found() -> ApiError {
        ApiError::NoEpisodesFound
    }
}

/// `{"episodes": [...], "errors": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct EpisodeList {
    #[serde(default)]
    episodes: Option<Vec<Episode>>,
    #[serde(default)]
    errors: Option<Vec<ApiErrorRecord>>,
}

impl Envelope for EpisodeList {
    type Payload = Vec<Episode>;

    fn into_parts(self) -> (Vec<ApiErrorRecord>, Option<Vec<Episode>>) {
        (
            self.errors.unwrap_or_default(),
            self.episodes.and_then(non_empty),
        )
    }

    fn not_found() -> ApiError {
        ApiError::NoEpisodesFound
    }
}

/// `{"member": {...}, "errors": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct MemberItem {
    #[serde(default)]
    member: Option<Member>,
    #[serde(default)]
    errors: Option<Vec<ApiErrorRecord>>,
}

impl Envelope for MemberItem {
    type Payload = Member;

    fn into_parts(self) -> (Vec<ApiErrorRecord>, Option<Member>) {
        (self.errors.unwrap_or_default(), self.member)
    }

    fn not_found() -> ApiError {
        ApiError::NoMembersFound
    }
}

/// `{"users": [...], "errors": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct UserList {
    #[serde(default)]
    users: Option<Vec<Member>>,
    #[serde(default)]
    errors: Option<Vec<ApiErrorRecord>>,
}

impl Envelope for UserList {
    type Payload = Vec<Member>;

    fn into_parts(self) -> (Vec<ApiErrorRecord>, Option<Vec<Member>>) {
        (self.errors.unwrap_or_default(), self.users.and_then(non_empty))
    }

    fn not_found() -> ApiError {
        ApiError::NoMembersFound
    }
}

/// `{"subtitles": [...], "errors": [...]}`.
#[derive(Debug, Deserialize)]
pub(crate) struct SubtitleList {
    #[serde(default)]
    subtitles: Option<Vec<Subtitle>>,
    #[serde(default)]
    errors: Option<Vec<ApiErrorRecord>>,
}

impl Envelope for SubtitleList {
    type Payload = Vec<Subtitle>;

    fn into_parts(self) -> (Vec<ApiErrorRecord>, Option<Vec<Subtitle>>) {
        (
            self.errors.unwrap_or_default(),
            self.subtitles.and_then(non_empty),
        )
    }

    fn not_found() -> ApiError {
        ApiError::NoSubtitlesFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_record_field_names() {
        let record: ApiErrorRecord =
            serde_json::from_str(r#"{"type": "api", "code": 4001, "text": "Episode not found."}"#)
                .unwrap();
        assert_eq!(record.kind, "api");
        assert_eq!(record.code, 4001);
        assert_eq!(record.message, "Episode not found.");

        let aliased: ApiErrorRecord =
            serde_json::from_str(r#"{"code": 2001, "message": "Invalid token"}"#).unwrap();
        assert_eq!(aliased.message, "Invalid token");
    }

    #[test]
    fn test_empty_list_has_no_payload() {
        let list: SubtitleList = serde_json::from_str(r#"{"subtitles": [], "errors": []}"#).unwrap();
        let (errors, payload) = list.into_parts();
        assert!(errors.is_empty());
        assert!(payload.is_none());
    }

    #[test]
    fn test_null_item_and_errors() {
        let item: EpisodeItem = serde_json::from_str(r#"{"episode": null, "errors": null}"#).unwrap();
        let (errors, payload) = item.into_parts();
        assert!(errors.is_empty());
        assert!(payload.is_none());
    }

    #[test]
    fn test_family_not_found_errors() {
        assert!(matches!(EpisodeList::not_found(), ApiError::NoEpisodesFound));
        assert!(matches!(UserList::not_found(), ApiError::NoMembersFound));
        assert!(matches!(MemberItem::not_found(), ApiError::NoMembersFound));
        assert!(matches!(SubtitleList::not_found(), ApiError::NoSubtitlesFound));
    }
}

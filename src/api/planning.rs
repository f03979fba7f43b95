//! Planning endpoints (`/planning/*`).

use super::envelope::EpisodeList;
use super::{ApiError, BetaSeriesClient, Episode, QueryParams, Transport};
use reqwest::Method;
use std::fmt;
use std::str::FromStr;

/// Episode filter of the general planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanningType {
    /// Season premieres only.
    Premiere,
    /// Every episode in the window.
    All,
}

impl PlanningType {
    fn as_str(self) -> &'static str {
        match self {
            PlanningType::Premiere => "premiere",
            PlanningType::All => "all",
        }
    }
}

impl fmt::Display for PlanningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanningType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "premiere" => Ok(PlanningType::Premiere),
            "all" => Ok(PlanningType::All),
            other => Err(format!("unknown planning type '{other}', expected premiere or all")),
        }
    }
}

/// Time window of the general planning.
///
/// Episodes airing within `[date - before, date + after]` days are returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralPlanning {
    /// Center of the window as `YYYY-MM-DD`, or `now`.
    pub date: String,
    /// Days before `date` included in the window.
    pub before: u32,
    /// Days after `date` included in the window.
    pub after: u32,
    /// Episode filter, none sends no `type`.
    pub kind: Option<PlanningType>,
}

impl Default for GeneralPlanning {
    fn default() -> Self {
        Self {
            date: "now".to_string(),
            before: 0,
            after: 0,
            kind: None,
        }
    }
}

impl<T: Transport> BetaSeriesClient<T> {
    /// Lists the episodes airing around a date, across all shows.
    ///
    /// `date`, `before` and `after` are always sent; an empty date is sent as
    /// `now`.
    pub fn planning_general(&self, window: &GeneralPlanning) -> Result<Vec<Episode>, ApiError> {
        let date = if window.date.is_empty() {
            "now"
        } else {
            window.date.as_str()
        };

        let mut query = QueryParams::new()
            .set("date", date)
            .set("before", window.before)
            .set("after", window.after);
        if let Some(kind) = window.kind {
            query = query.set("type", kind.as_str());
        }

        self.call::<EpisodeList>(Method::GET, "/planning/general", query)
    }

    /// Lists the first upcoming episode of each show about to air.
    pub fn planning_incoming(&self) -> Result<Vec<Episode>, ApiError> {
        self.call::<EpisodeList>(Method::GET, "/planning/incoming", QueryParams::new())
    }

    /// Lists the planned episodes of a member.
    ///
    /// A `member_id` of 0 means the authenticated member. `unseen` keeps only
    /// episodes not watched yet, `month` (`YYYY-MM` or `now`) restricts the
    /// result to one month.
    pub fn planning_member(
        &self,
        member_id: i64,
        unseen: bool,
        month: &str,
    ) -> Result<Vec<Episode>, ApiError> {
        let query = QueryParams::new()
            .number("id", member_id)
            .flag("unseen", unseen)
            .text("month", month);
        self.call::<EpisodeList>(Method::GET, "/planning/member", query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client, has_key};

    const EPISODES: &str = r#"{
        "episodes": [
            {"id": 1, "title": "One", "date": "2026-10-12"},
            {"id": 2, "title": "Two", "date": "2026-10-14"}
        ],
        "errors": []
    }"#;

    #[test]
    fn test_general_sends_window() {
        let client = client(200, EPISODES);
        let window = GeneralPlanning {
            date: "2026-10-13".to_string(),
            before: 2,
            after: 3,
            kind: Some(PlanningType::Premiere),
        };
        let episodes = client.planning_general(&window).unwrap();
        assert_eq!(episodes.len(), 2);

        let (_, url) = client.transport().single_request();
        assert_eq!(url.path(), "/planning/general");
        assert_eq!(
            url.query(),
            Some("after=3&before=2&date=2026-10-13&type=premiere")
        );
    }

    #[test]
    fn test_general_defaults() {
        let client = client(200, EPISODES);
        let window = GeneralPlanning {
            date: String::new(),
            ..GeneralPlanning::default()
        };
        client.planning_general(&window).unwrap();

        let (_, url) = client.transport().single_request();
        assert_eq!(url.query(), Some("after=0&before=0&date=now"));
    }

    #[test]
    fn test_incoming_has_no_query() {
        let client = client(200, EPISODES);
        client.planning_incoming().unwrap();

        let (_, url) = client.transport().single_request();
        assert_eq!(url.path(), "/planning/incoming");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_member_options() {
        let client = client(200, EPISODES);
        client.planning_member(0, true, "").unwrap();
        client.planning_member(8, false, "2026-10").unwrap();

        let requests = client.transport().requests.borrow();
        assert_eq!(requests[0].1.query(), Some("unseen=true"));
        assert!(!has_key(&requests[0].1, "month"));
        assert_eq!(requests[1].1.query(), Some("id=8&month=2026-10"));
    }

    #[test]
    fn test_empty_planning_is_no_episodes() {
        let client = client(200, r#"{"episodes": [], "errors": []}"#);
        let err = client.planning_incoming().unwrap_err();
        assert!(matches!(err, ApiError::NoEpisodesFound));
    }
}

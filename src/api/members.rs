//! Member endpoints (`/members/*`).

use super::envelope::{MemberItem, UserList};
use super::{ApiError, BetaSeriesClient, Member, QueryParams, Transport};
use reqwest::Method;
use std::fmt;
use std::str::FromStr;

/// How much of a member profile `members_infos` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InfosScope {
    /// Full profile with shows and movies.
    #[default]
    Full,
    /// Profile without shows and movies.
    Summary,
    /// Profile with movies only.
    Movies,
    /// Profile with shows only.
    Shows,
}

impl InfosScope {
    fn apply(self, query: QueryParams) -> QueryParams {
        match self {
            InfosScope::Full => query,
            InfosScope::Summary => query.flag("summary", true),
            InfosScope::Movies => query.set("only", "movies"),
            InfosScope::Shows => query.set("only", "shows"),
        }
    }
}

impl fmt::Display for InfosScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InfosScope::Full => "full",
            InfosScope::Summary => "summary",
            InfosScope::Movies => "movies",
            InfosScope::Shows => "shows",
        };
        f.write_str(name)
    }
}

impl FromStr for InfosScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(InfosScope::Full),
            "summary" => Ok(InfosScope::Summary),
            "movies" => Ok(InfosScope::Movies),
            "shows" => Ok(InfosScope::Shows),
            other => Err(format!(
                "unknown scope '{other}', expected one of: full, summary, movies, shows"
            )),
        }
    }
}

impl<T: Transport> BetaSeriesClient<T> {
    /// Searches members by login.
    ///
    /// `login` may contain `%` as a wildcard. A `limit` of 0 keeps the API
    /// default.
    pub fn members_search(&self, login: &str, limit: i64) -> Result<Vec<Member>, ApiError> {
        let query = QueryParams::new()
            .required_text("login", login)?
            .number("limit", limit);
        self.call::<UserList>(Method::GET, "/members/search", query)
    }

    /// Fetches the profile of a member.
    pub fn members_infos(&self, id: i64, scope: InfosScope) -> Result<Member, ApiError> {
        let query = scope.apply(QueryParams::new().required_id("id", id)?);
        self.call::<MemberItem>(Method::GET, "/members/infos", query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client, has_key, pairs};

    const PROFILE: &str = r#"{
        "member": {
            "id": 5,
            "login": "carol",
            "xp": 12000,
            "stats": {"friends": 3, "shows": 40, "episodes": 1200, "favorite_day": "Sunday"},
            "favorites": [{"id": 10, "title": "Breaking Bad"}],
            "options": {"downloaded": true, "specials": false, "friendship": "friend"}
        },
        "errors": []
    }"#;

    #[test]
    fn test_search_wildcard_and_limit() {
        let client = client(200, r#"{"users": [{"id": 5, "login": "carol"}], "errors": []}"#);
        let members = client.members_search("car%", 10).unwrap();
        assert_eq!(members[0].login, "carol");

        let (_, url) = client.transport().single_request();
        assert_eq!(url.path(), "/members/search");
        assert_eq!(url.query(), Some("limit=10&login=car%25"));
    }

    #[test]
    fn test_search_without_limit() {
        let client = client(200, r#"{"users": [{"id": 5}], "errors": []}"#);
        client.members_search("carol", 0).unwrap();

        let (_, url) = client.transport().single_request();
        assert!(!has_key(&url, "limit"));
    }

    #[test]
    fn test_search_requires_login() {
        let client = client(200, "{}");
        let err = client.members_search("", 5).unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter { name: "login" }));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[test]
    fn test_infos_full_profile() {
        let client = client(200, PROFILE);
        let member = client.members_infos(5, InfosScope::Full).unwrap();

        let stats = member.stats.as_ref().unwrap();
        assert_eq!(stats.shows, 40);
        assert_eq!(stats.favorite_day, "Sunday");
        assert_eq!(member.favorites[0].title, "Breaking Bad");
        assert!(member.options.as_ref().unwrap().downloaded);

        let (_, url) = client.transport().single_request();
        assert_eq!(pairs(&url), vec![("id".to_string(), "5".to_string())]);
    }

    #[test]
    fn test_infos_scopes() {
        let client = client(200, PROFILE);
        client.members_infos(5, InfosScope::Summary).unwrap();
        client.members_infos(5, InfosScope::Shows).unwrap();

        let requests = client.transport().requests.borrow();
        assert_eq!(requests[0].1.query(), Some("id=5&summary=true"));
        assert!(!has_key(&requests[0].1, "only"));
        assert_eq!(requests[1].1.query(), Some("id=5&only=shows"));
    }

    #[test]
    fn test_infos_requires_positive_id() {
        let client = client(200, PROFILE);
        let err = client.members_infos(-4, InfosScope::Full).unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter { name: "id" }));
        assert_eq!(client.transport().request_count(), 0);
    }

    #[test]
    fn test_null_member_is_not_found() {
        let client = client(200, r#"{"member": null, "errors": []}"#);
        let err = client.members_infos(5, InfosScope::Full).unwrap_err();
        assert!(matches!(err, ApiError::NoMembersFound));
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!("Summary".parse::<InfosScope>(), Ok(InfosScope::Summary));
        assert!("everything".parse::<InfosScope>().is_err());
    }
}

//! Friend endpoints (`/friends/*`).

use super::envelope::{MemberItem, UserList};
use super::{ApiError, BetaSeriesClient, Member, QueryParams, Transport};
use reqwest::Method;

impl<T: Transport> BetaSeriesClient<T> {
    /// Lists the friends of a member.
    ///
    /// A `member_id` of 0 lists the friends of the authenticated member. With
    /// `blocked` set, the blocked members are returned instead; the API only
    /// honors this for the authenticated member.
    pub fn friends_list(&self, member_id: i64, blocked: bool) -> Result<Vec<Member>, ApiError> {
        let query = QueryParams::new()
            .number("id", member_id)
            .flag("blocked", blocked);
        self.call::<UserList>(Method::GET, "/friends/list", query)
    }

    /// Lists pending friendship requests.
    ///
    /// Requests sent by the authenticated member by default, requests they
    /// received when `received` is set.
    pub fn friends_requests(&self, received: bool) -> Result<Vec<Member>, ApiError> {
        let query = QueryParams::new().flag("received", received);
        self.call::<UserList>(Method::GET, "/friends/requests", query)
    }

    /// Adds a member to the friends of the authenticated member.
    pub fn friend_add(&self, id: i64) -> Result<Member, ApiError> {
        self.friend_update(Method::POST, "/friends/friend", id)
    }

    /// Removes a member from the friends of the authenticated member.
    pub fn friend_remove(&self, id: i64) -> Result<Member, ApiError> {
        self.friend_update(Method::DELETE, "/friends/friend", id)
    }

    /// Blocks a member for the authenticated member.
    pub fn friend_block(&self, id: i64) -> Result<Member, ApiError> {
        self.friend_update(Method::POST, "/friends/block", id)
    }

    /// Lifts a block set with `friend_block`.
    pub fn friend_unblock(&self, id: i64) -> Result<Member, ApiError> {
        self.friend_update(Method::DELETE, "/friends/block", id)
    }

    fn friend_update(&self, method: Method, endpoint: &str, id: i64) -> Result<Member, ApiError> {
        let query = QueryParams::new().required_id("id", id)?;
        self.call::<MemberItem>(method, endpoint, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client, has_key, pairs};

    const USERS: &str = r#"{"users": [{"id": 1, "login": "alice"}, {"id": 2, "login": "bob"}], "errors": []}"#;
    const MEMBER: &str = r#"{"member": {"id": 2, "login": "bob", "xp": 830}, "errors": []}"#;

    #[test]
    fn test_list_for_authenticated_member() {
        let client = client(200, USERS);
        let friends = client.friends_list(0, false).unwrap();

        assert_eq!(friends.len(), 2);
        assert_eq!(friends[1].login, "bob");

        let (method, url) = client.transport().single_request();
        assert_eq!(method, Method::GET);
        assert_eq!(url.path(), "/friends/list");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_list_blocked() {
        let client = client(200, USERS);
        client.friends_list(0, true).unwrap();

        let (_, url) = client.transport().single_request();
        assert!(!has_key(&url, "id"));
        assert_eq!(
            pairs(&url),
            vec![("blocked".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn test_list_for_other_member() {
        let client = client(200, USERS);
        client.friends_list(17, false).unwrap();

        let (_, url) = client.transport().single_request();
        assert_eq!(pairs(&url), vec![("id".to_string(), "17".to_string())]);
    }

    #[test]
    fn test_empty_list_is_no_members() {
        let client = client(200, r#"{"users": [], "errors": []}"#);
        let err = client.friends_requests(true).unwrap_err();
        assert!(matches!(err, ApiError::NoMembersFound));

        let (_, url) = client.transport().single_request();
        assert_eq!(url.path(), "/friends/requests");
        assert!(has_key(&url, "received"));
    }

    #[test]
    fn test_friend_mutations() {
        let client = client(200, MEMBER);
        let member = client.friend_add(2).unwrap();
        assert_eq!(member.xp, 830);
        client.friend_remove(2).unwrap();
        client.friend_block(2).unwrap();
        client.friend_unblock(2).unwrap();

        let requests = client.transport().requests.borrow();
        let calls: Vec<(Method, &str)> = requests
            .iter()
            .map(|(method, url)| (method.clone(), url.path()))
            .collect();
        assert_eq!(
            calls,
            vec![
                (Method::POST, "/friends/friend"),
                (Method::DELETE, "/friends/friend"),
                (Method::POST, "/friends/block"),
                (Method::DELETE, "/friends/block"),
            ]
        );
        assert!(requests.iter().all(|(_, url)| url.query() == Some("id=2")));
    }

    #[test]
    fn test_mutation_requires_id() {
        let client = client(200, MEMBER);
        let err = client.friend_block(0).unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter { name: "id" }));
        assert_eq!(client.transport().request_count(), 0);
    }
}

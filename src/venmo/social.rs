use serde_json::Value;

use crate::{Res, transport::Transport, types::Host};

use super::{ApiRequest, Venmo};

impl<T: Transport> Venmo<T> {
    /// People the service suggests adding as friends.
    pub fn suggested(&self) -> Res<Value> {
        self.request_json(ApiRequest::get(Host::Api, "/v1/suggested"))
    }

    /// Activity feed of the user's friends.
    pub fn stories(&self) -> Res<Value> {
        self.request_json(ApiRequest::get(
            Host::Api,
            "/v1/stories/target-or-actor/friends",
        ))
    }

    /// Searches users by name, username, phone number or email.
    ///
    /// The query is forwarded as given, and an empty query is left to the
    /// server to judge.
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text search term, sent as the `query` parameter
    ///
    /// # Returns
    ///
    /// - `Ok(Value)` - The matching users as returned by the server
    /// - `Err(Error::Status)` - The server rejected the search
    ///
    /// # Example
    ///
    /// ```
    /// let found = venmo.search_users("alice")?;
    /// for user in found["data"].as_array().into_iter().flatten() {
    ///     println!("{}", user["username"]);
    /// }
    /// ```
    pub fn search_users(&self, query: &str) -> Res<Value> {
        self.request_json(ApiRequest::get(Host::Api, "/v1/users").query("query", query))
    }

    /// Retrieves the friends of the logged-in user.
    ///
    /// The list is addressed by the external identifier, so the identity must
    /// have been resolved by login or [`Venmo::resolve_identity`].
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of friends to return. The app asks for
    ///   [`DEFAULT_FRIENDS_LIMIT`](super::DEFAULT_FRIENDS_LIMIT) to get them all
    ///   in one page.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAuthenticated`](crate::Error::NotAuthenticated) when the
    ///   external identifier is unknown; nothing is sent.
    /// - [`Error::Status`](crate::Error::Status) for a non-2xx response.
    pub fn friends(&self, limit: u32) -> Res<Value> {
        let external_id = self.current_external_id()?;
        self.request_json(
            ApiRequest::get(Host::Api, format!("/v1/users/{external_id}/friends"))
                .query("limit", limit),
        )
    }

    /// Lists the users this account has blocked.
    pub fn blocked_users(&self) -> Res<Value> {
        self.request_json(ApiRequest::get(Host::Api, "/v1/blocks"))
    }
}

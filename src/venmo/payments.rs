use serde_json::Value;

use crate::{Res, transport::Transport, types::Host};

use super::{ApiRequest, Venmo};

const INCOMPLETE_STATUS: &str = "pending,held";

impl<T: Transport> Venmo<T> {
    /// Retrieves charges the user requested from others that are still open.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of entries, the app uses
    ///   [`DEFAULT_PAGE_LIMIT`](super::DEFAULT_PAGE_LIMIT)
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotAuthenticated`](crate::Error::NotAuthenticated)
    /// before sending anything when the external identifier is unknown.
    pub fn incomplete_requests(&self, limit: u32) -> Res<Value> {
        self.incomplete_payments_for("charge", limit)
    }

    /// Retrieves payments the user sent that are still pending or held.
    ///
    /// Same query and preconditions as [`Venmo::incomplete_requests`] with
    /// `action=pay`.
    pub fn incomplete_payments(&self, limit: u32) -> Res<Value> {
        self.incomplete_payments_for("pay", limit)
    }

    fn incomplete_payments_for(&self, action: &str, limit: u32) -> Res<Value> {
        let external_id = self.current_external_id()?;
        self.request_json(
            ApiRequest::get(Host::Api, "/v1/payments")
                .query("action", action)
                .query("actor", external_id)
                .query("limit", limit)
                .query("status", INCOMPLETE_STATUS),
        )
    }
}

use serde_json::Value;

use crate::{Res, transport::Transport, types::Host};

use super::{ApiRequest, Venmo};

impl<T: Transport> Venmo<T> {
    /// Lists the devices the account stays logged in on.
    ///
    /// Each entry carries a `user_device_id` usable with
    /// [`Venmo::forget_device`].
    pub fn remembered_devices(&self) -> Res<Value> {
        self.request_json(ApiRequest::get(Host::Web, "/api/v5/devices"))
    }

    /// Forgets a remembered device, so its next login is challenged again.
    ///
    /// # Arguments
    ///
    /// * `device_id` - The `user_device_id` of an entry returned by
    ///   [`Venmo::remembered_devices`]
    ///
    /// # Returns
    ///
    /// - `Ok(Value)` - The server's answer, or `Value::Null` for an empty body
    /// - `Err(Error::Status)` - Unknown device or other non-2xx status
    ///
    /// # Example
    ///
    /// ```
    /// let devices = venmo.remembered_devices()?;
    /// if let Some(id) = devices["data"][0]["user_device_id"].as_u64() {
    ///     venmo.forget_device(id)?;
    /// }
    /// ```
    pub fn forget_device(&self, device_id: u64) -> Res<Value> {
        self.request_json(ApiRequest::delete(
            Host::Web,
            format!("/api/v5/devices/{device_id}"),
        ))
    }
}

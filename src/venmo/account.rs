use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

use crate::{
    Res,
    error::Error,
    session::OTP_SECRET_HEADER,
    transport::Transport,
    types::{
        Audience, AudienceRequest, ChangePasswordRequest, EditProfileRequest, Host, PhoneRequest,
    },
};

use super::{ApiRequest, DEFAULT_PAGE_LIMIT, Venmo, ensure_success};

impl<T: Transport> Venmo<T> {
    /// Retrieves the account summary of the logged-in user.
    ///
    /// The payload is returned exactly as the server sent it. It includes the
    /// current balance under `data.balance` and the user object under
    /// `data.user`.
    ///
    /// # Returns
    ///
    /// - `Ok(Value)` - The decoded account JSON
    /// - `Err(Error::NotAuthenticated)` - No session is installed
    /// - `Err(Error::Status)` - The server answered with a non-2xx status
    ///
    /// # Example
    ///
    /// ```
    /// let account = venmo.account()?;
    /// println!("Balance: {}", account["data"]["balance"]);
    /// ```
    pub fn account(&self) -> Res<Value> {
        self.request_json(ApiRequest::get(Host::Api, "/v1/account"))
    }

    /// Retrieves the notification alerts shown in the app.
    pub fn alerts(&self) -> Res<Value> {
        self.request_json(ApiRequest::get(Host::Api, "/v1/alerts"))
    }

    /// Retrieves card authorizations that have not been acknowledged yet.
    ///
    /// Sends `acknowledged=false` and `status=active,captured` together with
    /// the page size.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of authorizations to return
    ///
    /// # Returns
    ///
    /// The decoded JSON page, or [`Error::Status`] on a non-2xx response.
    pub fn authorizations(&self, limit: u32) -> Res<Value> {
        self.request_json(
            ApiRequest::get(Host::Api, "/v1/authorizations")
                .query("acknowledged", false)
                .query("status", "active,captured")
                .query("limit", limit),
        )
    }

    /// [`Venmo::authorizations`] with the page size the app uses.
    pub fn pending_authorizations(&self) -> Res<Value> {
        self.authorizations(DEFAULT_PAGE_LIMIT)
    }

    /// Whether the account may see merchant payment activation screens.
    pub fn merchant_views(&self) -> Res<Value> {
        self.request_json(ApiRequest::get(
            Host::Api,
            "/v1/users/merchant-payments-activation-views",
        ))
    }

    /// Downloads the feature allow-list.
    ///
    /// The body is not JSON, so it is handed back as raw bytes without any
    /// decoding.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<u8>)` - The response body as received
    /// - `Err(Error::Status)` - The server answered with a non-2xx status
    pub fn allowlist(&self) -> Res<Vec<u8>> {
        Ok(self
            .request(ApiRequest::get(Host::Api, "/v1/hermes-whitelist"))?
            .into_bytes())
    }

    /// Lists the bank accounts linked to the account.
    pub fn bank_accounts(&self) -> Res<Value> {
        self.request_json(ApiRequest::get(Host::Web, "/api/v5/bankaccounts"))
    }

    /// Lists every funding source: balance, banks and cards.
    pub fn payment_methods(&self) -> Res<Value> {
        self.request_json(ApiRequest::get(Host::Api, "/v1/payment-methods"))
    }

    /// Changes the account password.
    ///
    /// The request targets `/v1/users/{external_id}`, so the identity must
    /// have been resolved. Both passwords are forwarded as given; the server
    /// decides whether they are acceptable.
    ///
    /// # Arguments
    ///
    /// * `old_password` - The current password
    /// * `new_password` - The password to set
    ///
    /// # Errors
    ///
    /// - [`Error::NotAuthenticated`] without a session or without a resolved
    ///   external identifier; nothing is sent.
    /// - [`Error::Status`] when the server rejects the change, e.g. a wrong
    ///   old password.
    pub fn change_password(&self, old_password: &str, new_password: &str) -> Res<Value> {
        let external_id = self.current_external_id()?;
        let payload = ChangePasswordRequest {
            old_password,
            password: new_password,
        };
        self.request_json(
            ApiRequest::put(Host::Api, format!("/v1/users/{external_id}")).json(&payload)?,
        )
    }

    /// Registers a new phone number on the account.
    ///
    /// # Arguments
    ///
    /// * `new_number` - The number as the app formats it, e.g. `"(123) 456-7890"`
    ///
    /// # Errors
    ///
    /// - [`Error::Unsupported`] when the server answers with a two-factor
    ///   challenge to confirm the change; that exchange is not implemented.
    /// - [`Error::Status`] for any other non-2xx response.
    pub fn change_phone_number(&self, new_number: &str) -> Res<Value> {
        let session = self.current_session()?;
        let request = ApiRequest::post(Host::Web, "/api/v5/phones")
            .json(&PhoneRequest { phone: new_number })?;

        let response = self.transport.execute(self.build(session, request))?;
        if response.status() == StatusCode::UNAUTHORIZED
            && response.headers().contains_key(OTP_SECRET_HEADER)
        {
            warn!("phone number change challenged");
            return Err(Error::Unsupported(
                "confirming a phone number change with a two-factor code",
            ));
        }
        ensure_success(response)?.json()
    }

    /// Sets the audience of every past transaction at once.
    ///
    /// # Example
    ///
    /// ```
    /// use venmo_client::types::Audience;
    ///
    /// venmo.set_history_audience(Audience::Friends)?;
    /// ```
    pub fn set_history_audience(&self, audience: Audience) -> Res<Value> {
        self.request_json(
            ApiRequest::post(Host::Web, "/api/v5/stories/each")
                .json(&AudienceRequest { audience })?,
        )
    }

    pub fn make_history_private(&self) -> Res<Value> {
        self.set_history_audience(Audience::Private)
    }

    pub fn make_history_visible_to_friends(&self) -> Res<Value> {
        self.set_history_audience(Audience::Friends)
    }

    /// Updates profile fields.
    ///
    /// Fields left unset on the request are sent as `null`. Whether the
    /// server treats that as "clear" or "keep" is not documented, so set
    /// every field you want to keep.
    ///
    /// # Example
    ///
    /// ```
    /// use venmo_client::types::EditProfileRequest;
    ///
    /// let profile = EditProfileRequest::default()
    ///     .first_name("Alice")
    ///     .last_name("Anders");
    /// venmo.edit_profile(&profile)?;
    /// ```
    pub fn edit_profile(&self, profile: &EditProfileRequest) -> Res<Value> {
        self.request_json(ApiRequest::put(Host::Web, "/api/v5/users/me").json(profile)?)
    }
}

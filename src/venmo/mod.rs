//! # Venmo API Module
//!
//! This module is the client for the private API behind the Venmo mobile app.
//! It owns the login handshake and one uniform request path that every account
//! and social operation goes through.
//!
//! ## Architecture
//!
//! ```text
//! Caller
//!    ↓
//! Venmo client (one session, one cookie jar)
//!     ├── Authentication (password grant, SMS two-factor, identity)
//!     ├── Account (profile, balance sources, privacy, password)
//!     ├── Social (friends, feed, search, blocks)
//!     ├── Payments (incomplete charges and payments)
//!     └── Devices (remembered devices)
//!    ↓
//! Transport (reqwest blocking, cookie store)
//!    ↓
//! venmo.com / api.venmo.com
//! ```
//!
//! ## Request Pattern
//!
//! Every resource call is an [`ApiRequest`]: method, [`Host`], path, optional
//! query and optional JSON body. [`Venmo::request`] attaches the headers the
//! upstream service expects from the iOS app (device id, user agent, locale,
//! encodings) plus the bearer token, sends it, and turns any non-2xx status
//! into [`Error::Status`] with the raw body. Nothing is retried.
//!
//! ## Two Hosts
//!
//! The service is split across `venmo.com` (the older v5 API, also serving
//! the login and two-factor pages) and `api.venmo.com` (v1). Each operation
//! targets the host the app itself uses.
//!
//! ## Session State
//!
//! A client holds at most one [`AuthenticatedSession`]. It is installed only
//! after login and identity resolution both succeeded. Operations scoped to
//! the external identifier (friends, incomplete payments, password change)
//! check for it first and fail with [`Error::NotAuthenticated`] without
//! touching the network.
//!
//! ## Usage
//!
//! ```rust
//! use venmo_client::{config::{self, ClientConfig, Credentials}, venmo::Venmo};
//!
//! config::load_env()?;
//! let mut venmo = Venmo::new(ClientConfig::from_env()?)?;
//! venmo.login_with(&Credentials::from_env()?)?;
//! let friends = venmo.friends(venmo_client::venmo::DEFAULT_FRIENDS_LIMIT)?;
//! ```

mod account;
mod auth;
mod devices;
mod payments;
mod request;
mod social;

pub use request::ApiRequest;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::{
    Res,
    config::ClientConfig,
    error::Error,
    prompt::{CodePrompt, TerminalPrompt},
    session::AuthenticatedSession,
    transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport},
    types::Host,
};

/// Page size used by the app for authorizations and incomplete payments.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Friend list page size used by the app; large enough to fetch everyone.
pub const DEFAULT_FRIENDS_LIMIT: u32 = 1337;

const ACCEPT_JSON_UTF8: &str = "application/json; charset=utf-8";
const ACCEPT_LANGUAGE: &str = "en-US;q=1.0";
const ACCEPT_ENCODING: &str = "gzip;q=1.0,compress;q=0.5";

/// Client for one Venmo account.
pub struct Venmo<T = ReqwestTransport> {
    transport: T,
    config: ClientConfig,
    prompt: Box<dyn CodePrompt>,
    session: Option<AuthenticatedSession>,
}

impl Venmo<ReqwestTransport> {
    /// Creates a client backed by a cookie-keeping `reqwest` transport that
    /// asks for two-factor codes on the terminal.
    pub fn new(config: ClientConfig) -> Res<Self> {
        Ok(Self::with_transport(ReqwestTransport::new()?, config))
    }
}

impl<T: Transport> Venmo<T> {
    /// Creates a client over any [`Transport`], without a session.
    ///
    /// Two-factor codes are asked for on the terminal until
    /// [`Venmo::with_prompt`] replaces the prompt.
    ///
    /// # Arguments
    ///
    /// * `transport` - Sends the built requests; it should keep cookies
    ///   between calls for the two-factor exchange to work
    /// * `config` - Device id, user agent and base URLs
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            prompt: Box::new(TerminalPrompt::default()),
            session: None,
        }
    }

    /// Replaces the source of two-factor codes.
    pub fn with_prompt(mut self, prompt: impl CodePrompt + 'static) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    /// Installs a previously obtained session.
    pub fn with_session(mut self, session: AuthenticatedSession) -> Self {
        self.session = Some(session);
        self
    }

    /// The installed session, if login or [`Venmo::with_session`] put one
    /// there.
    pub fn session(&self) -> Option<&AuthenticatedSession> {
        self.session.as_ref()
    }

    /// Consumes the client and hands back its session, e.g. to keep the
    /// token for a later run.
    pub fn into_session(self) -> Option<AuthenticatedSession> {
        self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends an authenticated request and returns the raw response.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAuthenticated`] when no session is installed; nothing is
    ///   sent.
    /// - [`Error::Status`] for any non-2xx response.
    pub fn request(&self, request: ApiRequest) -> Res<HttpResponse> {
        let session = self.current_session()?;
        self.send_as(session, request)
    }

    /// Like [`Venmo::request`], decoding the body as JSON.
    ///
    /// A 2xx response with an empty body (typically `204 No Content` on a
    /// `DELETE`) decodes to [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Everything [`Venmo::request`] returns, plus [`Error::Json`] when a
    /// non-empty 2xx body is not JSON.
    ///
    /// # Example
    ///
    /// ```
    /// use venmo_client::{types::Host, venmo::ApiRequest};
    ///
    /// let feed = venmo.request_json(
    ///     ApiRequest::get(Host::Api, "/v1/stories/target-or-actor/friends").query("limit", 5),
    /// )?;
    /// ```
    pub fn request_json(&self, request: ApiRequest) -> Res<Value> {
        let response = self.request(request)?;
        if response.bytes().iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        response.json()
    }

    pub(crate) fn send_as(
        &self,
        session: &AuthenticatedSession,
        request: ApiRequest,
    ) -> Res<HttpResponse> {
        self.execute(self.build(session, request))
    }

    /// Resolves the host and attaches the app headers and bearer token.
    /// The `device-id` header is the one the session was created with.
    pub(crate) fn build(&self, session: &AuthenticatedSession, request: ApiRequest) -> HttpRequest {
        let mut http = HttpRequest::new(request.method, self.url(request.host, &request.path))
            .headers(self.app_headers(session.device_id()))
            .header("Authorization", session.authorization())
            .query(request.query);
        if let Some(body) = request.body {
            http = http.header("Content-Type", ACCEPT_JSON_UTF8).json(body);
        }
        http
    }

    /// Runs a request through the transport and rejects non-2xx statuses.
    pub(crate) fn execute(&self, request: HttpRequest) -> Res<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        ensure_success(response)
    }

    pub(crate) fn url(&self, host: Host, path: &str) -> String {
        let base = match host {
            Host::Web => &self.config.web_url,
            Host::Api => &self.config.api_url,
        };
        format!("{base}{path}")
    }

    /// Headers every app request carries, before authorization.
    pub(crate) fn app_headers(&self, device_id: &str) -> Vec<(&'static str, String)> {
        vec![
            ("device-id", device_id.to_string()),
            ("Accept", ACCEPT_JSON_UTF8.to_string()),
            ("User-Agent", self.config.user_agent.clone()),
            ("Accept-Language", ACCEPT_LANGUAGE.to_string()),
            ("Accept-Encoding", ACCEPT_ENCODING.to_string()),
        ]
    }

    fn current_session(&self) -> Res<&AuthenticatedSession> {
        self.session
            .as_ref()
            .ok_or(Error::NotAuthenticated("login has not completed"))
    }

    /// External identifier of the logged-in user.
    fn current_external_id(&self) -> Res<&str> {
        self.current_session()?
            .external_id()
            .ok_or(Error::NotAuthenticated("identity has not been resolved"))
    }
}

pub(crate) fn ensure_success(response: HttpResponse) -> Res<HttpResponse> {
    let status: StatusCode = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Status {
            status,
            body: response.text(),
        })
    }
}

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    Res,
    config::Credentials,
    error::Error,
    session::{AuthenticatedSession, PendingChallenge},
    transport::{HttpRequest, Transport},
    types::{
        CodeDelivery, Host, LoginRequest, LoginResponse, OtpChannel, SendCodeRequest,
        SubmitCodeRequest, id_string,
    },
};

use super::{ACCEPT_JSON_UTF8, ApiRequest, Venmo, ensure_success};

/// Client id the mobile app presents on the password grant.
const CLIENT_ID: &str = "1";

const ACCESS_TOKEN_PATH: &str = "/api/v5/oauth/access_token";
const ME_PATH: &str = "/api/v5/users/me";
const TWO_FACTOR_PAGE_PATH: &str = "/two-factor";
const TWO_FACTOR_TOKEN_PATH: &str = "/api/v5/two_factor/token";
const LOGIN_PATH: &str = "/login";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const WEB_ACCEPT_LANGUAGE: &str = "en-us";
const WEB_ACCEPT_ENCODING: &str = "gzip, deflate";

impl<T: Transport> Venmo<T> {
    /// Logs in with a username, phone number or email and a password.
    ///
    /// Performs the password grant, answers an SMS two-factor challenge if the
    /// server raises one, then resolves the account's external identifier.
    /// The session is installed on the client only if every step succeeded;
    /// on failure the client keeps whatever session it had before.
    ///
    /// # Two-factor challenge
    ///
    /// A `401` carrying a `Venmo-Otp-Secret` header starts the SMS exchange:
    /// the two-factor page is loaded for its cookies, an OTP token is
    /// requested, a code is sent by SMS, and the configured
    /// [`CodePrompt`](crate::prompt::CodePrompt) is asked for it. That call
    /// blocks for as long as the prompt does. A wrong code is not re-prompted;
    /// call `login` again.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for an empty identifier or password.
    /// - [`Error::MissingChallenge`] when a `401` lacks the OTP secret or the
    ///   anti-forgery cookie.
    /// - [`Error::Unsupported`] when the two-factor exchange does not hand
    ///   back an access token, or `remember_device` is configured.
    /// - [`Error::Status`] for any other non-2xx response along the way.
    pub fn login(&mut self, identifier: &str, password: &str) -> Res<&AuthenticatedSession> {
        if identifier.trim().is_empty() {
            return Err(Error::InvalidInput("identifier must not be empty"));
        }
        if password.is_empty() {
            return Err(Error::InvalidInput("password must not be empty"));
        }

        let payload = LoginRequest {
            client_id: CLIENT_ID,
            password,
            phone_email_or_username: identifier,
        };
        let request = HttpRequest::new(Method::POST, self.url(Host::Web, ACCESS_TOKEN_PATH))
            .headers(self.app_headers(&self.config.device_id))
            .header("Content-Type", ACCEPT_JSON_UTF8)
            .json(serde_json::to_value(&payload)?);

        let response = self.transport.execute(request)?;
        let grant: LoginResponse = if response.status() == StatusCode::UNAUTHORIZED {
            let challenge = PendingChallenge::from_response(&response)?;
            warn!("login challenged, starting two-factor exchange");
            self.complete_two_factor(challenge)?
        } else {
            ensure_success(response)?.json()?
        };

        let mut session = AuthenticatedSession::from_login(grant, &self.config.device_id);
        let me = self.fetch_me(&session)?;
        session.set_external_id(external_id_of(&me)?);

        info!(
            username = session.username().unwrap_or_default(),
            id = session.id(),
            "logged in"
        );
        let session = self.session.insert(session);
        Ok(&*session)
    }

    /// [`Venmo::login`] with credentials from [`Credentials`].
    pub fn login_with(&mut self, credentials: &Credentials) -> Res<&AuthenticatedSession> {
        self.login(&credentials.identifier, credentials.password.expose_secret())
    }

    /// Fetches the current user and stores its external identifier on the
    /// session. Needed after restoring a session from a bare access token.
    pub fn resolve_identity(&mut self) -> Res<&str> {
        self.me()?;
        self.current_external_id()
    }

    /// Returns the current user as JSON, refreshing the stored external
    /// identifier.
    pub fn me(&mut self) -> Res<Value> {
        let me = self.fetch_me(self.current_session()?)?;
        let external_id = external_id_of(&me)?;
        info!(external_id = %external_id, "identity resolved");
        if let Some(session) = self.session.as_mut() {
            session.set_external_id(external_id);
        }
        Ok(me)
    }

    /// Revokes the bearer token.
    ///
    /// The session stays installed; later calls with the revoked token fail
    /// with a `401` [`Error::Status`] from the server.
    ///
    /// # Returns
    ///
    /// - `Ok(Value)` - The server's answer, `Value::Null` when the body is
    ///   empty (e.g. `204 No Content`)
    /// - `Err(Error::NotAuthenticated)` - No session is installed
    /// - `Err(Error::Status)` - Revocation was refused
    pub fn sign_out(&self) -> Res<Value> {
        self.request_json(ApiRequest::delete(Host::Web, ACCESS_TOKEN_PATH))
    }

    fn fetch_me(&self, session: &AuthenticatedSession) -> Res<Value> {
        self.send_as(session, ApiRequest::get(Host::Web, ME_PATH))?
            .json()
    }

    fn complete_two_factor(&self, challenge: PendingChallenge) -> Res<LoginResponse> {
        if self.config.remember_device {
            return Err(Error::Unsupported(
                "remembering the device after a two-factor login",
            ));
        }

        let user_agent = self.config.user_agent.as_str();
        let web_referer = format!("{}/", self.config.web_url);

        // Loading the page first sets cookies the token endpoint requires.
        let page = HttpRequest::new(Method::GET, self.url(Host::Web, TWO_FACTOR_PAGE_PATH))
            .header("Accept-Encoding", WEB_ACCEPT_ENCODING)
            .header("device-id", self.config.device_id.as_str())
            .header("Accept", ACCEPT_HTML)
            .header("User-Agent", user_agent)
            .header("Accept-Language", WEB_ACCEPT_LANGUAGE)
            .header("Referer", web_referer.as_str())
            .header("Venmo-Otp-Secret", challenge.otp_secret())
            .header("Venmo-User-Agent", user_agent);
        self.execute(page)?;

        let token = HttpRequest::new(Method::GET, self.url(Host::Web, TWO_FACTOR_TOKEN_PATH))
            .header("Accept-Encoding", WEB_ACCEPT_ENCODING)
            .header("Accept", "application/json")
            .header("User-Agent", user_agent)
            .header("Accept-Language", WEB_ACCEPT_LANGUAGE)
            .header("Referer", web_referer.as_str())
            .header("venmo-otp-secret", challenge.otp_secret());
        self.execute(token)?;

        let send_code = SendCodeRequest {
            csrftoken2: challenge.csrf_token(),
            via: OtpChannel::Sms,
        };
        let sent = self.execute(
            self.two_factor_request(Method::POST, TWO_FACTOR_TOKEN_PATH, &challenge)
                .json(serde_json::to_value(&send_code)?),
        )?;
        let delivery = CodeDelivery {
            channel: OtpChannel::Sms,
            status: sent
                .json::<Value>()
                .ok()
                .and_then(|body| body["data"]["status"].as_str().map(str::to_string)),
        };
        info!(status = ?delivery.status, "verification code requested");

        let code = self.prompt.request_code(&delivery)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(Error::InvalidInput("verification code must not be empty"));
        }

        let submit = SubmitCodeRequest {
            csrftoken2: challenge.csrf_token(),
        };
        let response = self.execute(
            self.two_factor_request(Method::POST, LOGIN_PATH, &challenge)
                .header("venmo-otp", code)
                .json(serde_json::to_value(&submit)?),
        )?;

        response.json::<LoginResponse>().map_err(|_| {
            Error::Unsupported("two-factor login completed without returning an access token")
        })
    }

    /// Headers for the JSON calls of the two-factor exchange.
    fn two_factor_request(
        &self,
        method: Method,
        path: &str,
        challenge: &PendingChallenge,
    ) -> HttpRequest {
        HttpRequest::new(method, self.url(Host::Web, path))
            .header("Accept", "application/json")
            .header("Accept-Language", WEB_ACCEPT_LANGUAGE)
            .header("Accept-Encoding", WEB_ACCEPT_ENCODING)
            .header("Content-Type", "application/json")
            .header("Origin", self.config.web_url.as_str())
            .header("User-Agent", self.config.user_agent.as_str())
            .header("Referer", format!("{}/", self.config.web_url))
            .header("venmo-otp-secret", challenge.otp_secret())
    }
}

fn external_id_of(me: &Value) -> Res<String> {
    // v5 nests the user under `data`; accept both shapes.
    id_string(&me["external_id"])
        .or_else(|| id_string(&me["data"]["external_id"]))
        .or_else(|| id_string(&me["data"]["user"]["external_id"]))
        .ok_or(Error::MissingField("external_id"))
}

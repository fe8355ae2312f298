use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    Res,
    error::Error,
    transport::HttpResponse,
    types::LoginResponse,
    utils,
};

/// Response header carrying the step-up secret on a challenged login.
pub const OTP_SECRET_HEADER: &str = "venmo-otp-secret";

/// Cookie holding the anti-forgery token used during the OTP exchange.
pub const CSRF_COOKIE: &str = "csrftoken2";

/// State of a logged-in user.
///
/// Built from the password grant; the external identifier is filled in by a
/// follow-up identity call. The client only exposes a session once that call
/// has succeeded, unless the caller restores one with
/// [`AuthenticatedSession::from_access_token`].
#[derive(Debug)]
pub struct AuthenticatedSession {
    access_token: SecretString,
    id: u64,
    external_id: Option<String>,
    name: Option<String>,
    username: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    balance: Option<String>,
    balance_as_of: DateTime<Utc>,
    device_id: String,
}

impl AuthenticatedSession {
    pub(crate) fn from_login(grant: LoginResponse, device_id: &str) -> Self {
        Self {
            access_token: SecretString::from(grant.access_token),
            id: grant.id,
            external_id: None,
            name: grant.name,
            username: grant.username,
            phone: grant.phone,
            email: grant.email,
            balance: grant.balance,
            balance_as_of: Utc::now(),
            device_id: device_id.to_string(),
        }
    }

    /// Restores a session from a token obtained earlier.
    ///
    /// Only the token and account id are known. Call
    /// [`Venmo::resolve_identity`](crate::venmo::Venmo::resolve_identity)
    /// before any operation scoped to the external identifier.
    pub fn from_access_token(
        access_token: impl Into<String>,
        id: u64,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            id,
            external_id: None,
            name: None,
            username: None,
            phone: None,
            email: None,
            balance: None,
            balance_as_of: Utc::now(),
            device_id: device_id.into(),
        }
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub(crate) fn authorization(&self) -> String {
        utils::bearer(self.access_token.expose_secret())
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub(crate) fn set_external_id(&mut self, external_id: String) {
        self.external_id = Some(external_id);
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Balance as reported at login. Never refreshed.
    pub fn balance(&self) -> Option<&str> {
        self.balance.as_deref()
    }

    pub fn balance_as_of(&self) -> DateTime<Utc> {
        self.balance_as_of
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

/// Data needed to answer a step-up challenge. Consumed by the OTP exchange.
#[derive(Debug)]
pub struct PendingChallenge {
    otp_secret: SecretString,
    csrf_token: SecretString,
}

impl PendingChallenge {
    /// Pulls the OTP secret header and the anti-forgery cookie out of a
    /// challenged login response.
    ///
    /// # Errors
    ///
    /// [`Error::MissingChallenge`] when either is absent.
    pub fn from_response(response: &HttpResponse) -> Res<Self> {
        Self::from_headers(response.headers()).map_err(|missing| Error::MissingChallenge {
            missing,
            body: response.text(),
        })
    }

    fn from_headers(headers: &HeaderMap) -> Result<Self, &'static str> {
        let otp_secret = headers
            .get(OTP_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or("the Venmo-Otp-Secret header")?;
        let csrf_token =
            utils::extract_cookie(headers, CSRF_COOKIE).ok_or("the csrftoken2 cookie")?;

        Ok(Self {
            otp_secret: SecretString::from(otp_secret.to_string()),
            csrf_token: SecretString::from(csrf_token),
        })
    }

    pub(crate) fn otp_secret(&self) -> &str {
        self.otp_secret.expose_secret()
    }

    pub(crate) fn csrf_token(&self) -> &str {
        self.csrf_token.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{
        StatusCode,
        header::{HeaderName, HeaderValue, SET_COOKIE},
    };

    use super::*;

    fn challenge_response() -> HttpResponse {
        HttpResponse::new(StatusCode::UNAUTHORIZED, r#"{"error":{"code":81109}}"#)
    }

    #[test]
    fn test_challenge_reads_secret_and_cookie() {
        let response = challenge_response()
            .with_header(
                HeaderName::from_static(OTP_SECRET_HEADER),
                HeaderValue::from_static("otp-secret"),
            )
            .with_header(
                SET_COOKIE,
                HeaderValue::from_static("csrftoken2=csrf-value; Path=/; Secure"),
            );

        let challenge = PendingChallenge::from_response(&response).unwrap();
        assert_eq!(challenge.otp_secret(), "otp-secret");
        assert_eq!(challenge.csrf_token(), "csrf-value");
    }

    #[test]
    fn test_challenge_without_secret_is_fatal() {
        let response = challenge_response().with_header(
            SET_COOKIE,
            HeaderValue::from_static("csrftoken2=csrf-value"),
        );

        match PendingChallenge::from_response(&response) {
            Err(Error::MissingChallenge { missing, body }) => {
                assert!(missing.contains("Venmo-Otp-Secret"));
                assert!(body.contains("81109"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_challenge_without_cookie_is_fatal() {
        let response = challenge_response().with_header(
            HeaderName::from_static(OTP_SECRET_HEADER),
            HeaderValue::from_static("otp-secret"),
        );

        assert!(matches!(
            PendingChallenge::from_response(&response),
            Err(Error::MissingChallenge { missing, .. }) if missing.contains("csrftoken2")
        ));
    }

    #[test]
    fn test_restored_session_has_no_identity() {
        let session = AuthenticatedSession::from_access_token("tok", 42, "DEVICE");

        assert_eq!(session.id(), 42);
        assert_eq!(session.external_id(), None);
        assert_eq!(session.authorization(), "Bearer tok");
        assert_eq!(session.device_id(), "DEVICE");
    }
}

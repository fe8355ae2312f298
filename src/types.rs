use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The two domains the upstream service is split across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// `venmo.com`, the older v5 API and the web login pages.
    Web,
    /// `api.venmo.com`, the v1 API.
    Api,
}

/// Channel a two-factor code is delivered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpChannel {
    Sms,
}

impl fmt::Display for OtpChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpChannel::Sms => f.write_str("sms"),
        }
    }
}

/// Who can see a transaction in the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Private,
    Friends,
}

/// Password grant sent to the access token endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub client_id: &'a str,
    pub password: &'a str,
    pub phone_email_or_username: &'a str,
}

/// Body of a successful password grant.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(deserialize_with = "numeric_id")]
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub balance: Option<String>,
}

/// Asks the server to deliver a two-factor code.
#[derive(Debug, Serialize)]
pub struct SendCodeRequest<'a> {
    pub csrftoken2: &'a str,
    pub via: OtpChannel,
}

/// Body of the final two-factor login; the code itself travels in the
/// `venmo-otp` header.
#[derive(Debug, Serialize)]
pub struct SubmitCodeRequest<'a> {
    pub csrftoken2: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub old_password: &'a str,
    pub password: &'a str,
}

/// New phone number for the account.
#[derive(Debug, Serialize)]
pub struct PhoneRequest<'a> {
    pub phone: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AudienceRequest {
    pub audience: Audience,
}

/// Profile edit. Fields left as `None` are sent as JSON `null`, not omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl EditProfileRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// What the prompt is told about the code it is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDelivery {
    pub channel: OtpChannel,
    /// Delivery status reported by the server, usually `sent`.
    pub status: Option<String>,
}

// The upstream API is inconsistent about quoting ids and amounts.

fn numeric_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom("id is not an unsigned integer")),
        Value::String(s) => s.parse().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "expected numeric id, got {other}"
        ))),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Reads an identifier that may be encoded as a string or a number.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_accepts_quoted_id_and_numeric_balance() {
        let grant: LoginResponse = serde_json::from_value(json!({
            "access_token": "tok",
            "id": "1234",
            "username": "alice",
            "balance": 12.5,
            "phone": null
        }))
        .unwrap();

        assert_eq!(grant.id, 1234);
        assert_eq!(grant.balance.as_deref(), Some("12.5"));
        assert_eq!(grant.phone, None);
        assert_eq!(grant.email, None);
    }

    #[test]
    fn test_login_response_requires_token() {
        let grant = serde_json::from_value::<LoginResponse>(json!({"id": 1}));
        assert!(grant.is_err());
    }

    #[test]
    fn test_edit_profile_sends_nulls() {
        let body = serde_json::to_value(EditProfileRequest::new().first_name("Al")).unwrap();

        assert_eq!(
            body,
            json!({
                "email": null,
                "first_name": "Al",
                "last_name": null,
                "username": null
            })
        );
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_value(AudienceRequest {
                audience: Audience::Friends
            })
            .unwrap(),
            json!({"audience": "friends"})
        );
        assert_eq!(serde_json::to_value(OtpChannel::Sms).unwrap(), json!("sms"));
    }
}

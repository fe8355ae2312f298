//! Error types for the Venmo client.

use reqwest::StatusCode;
use thiserror::Error;

/// Venmo client errors.
///
/// Every failure surfaces to the direct caller unchanged. Nothing in the
/// client retries, backs off or falls back.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-2xx response. The body is kept verbatim and never parsed.
    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Network failure (connection refused, TLS, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A 2xx body could not be decoded, or a payload could not be encoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation ran before login (or identity resolution) completed.
    #[error("not authenticated: {0}")]
    NotAuthenticated(&'static str),

    /// The server asked for step-up authentication without the data needed to
    /// answer it.
    #[error("login challenge is missing {missing}: {body}")]
    MissingChallenge { missing: &'static str, body: String },

    /// A successful response lacked a field the client depends on.
    #[error("response is missing field `{0}`")]
    MissingField(&'static str),

    /// A flow the client knows about but does not implement.
    #[error("not implemented: {0}")]
    Unsupported(&'static str),

    /// Empty login credentials or verification code; nothing was sent.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The verification code prompt was abandoned before a code arrived.
    #[error("verification code prompt was cancelled")]
    PromptCancelled,

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status carried by a [`Error::Status`], if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status(),
            _ => None,
        }
    }

    /// True when the server rejected the bearer token, e.g. after sign out.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_exposes_code() {
        let err = Error::Status {
            status: StatusCode::UNAUTHORIZED,
            body: r#"{"error":{"message":"revoked"}}"#.to_string(),
        };

        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("revoked"));
    }

    #[test]
    fn test_precondition_error_has_no_status() {
        let err = Error::NotAuthenticated("identity has not been resolved");

        assert_eq!(err.status(), None);
        assert!(!err.is_unauthorized());
    }
}

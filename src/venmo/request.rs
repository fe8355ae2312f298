use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::{Res, types::Host};

/// One call against the app API, relative to a [`Host`].
///
/// The client turns it into an [`HttpRequest`](crate::transport::HttpRequest)
/// by resolving the host, attaching the device header bundle and the bearer
/// token.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) host: Host,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
}

impl ApiRequest {
    /// Creates a request without query parameters or body.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `host` - Which of the two service domains to address
    /// * `path` - Absolute path on that host, e.g. `/v1/account`
    pub fn new(method: Method, host: Host, path: impl Into<String>) -> Self {
        Self {
            method,
            host,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(host: Host, path: impl Into<String>) -> Self {
        Self::new(Method::GET, host, path)
    }

    pub fn post(host: Host, path: impl Into<String>) -> Self {
        Self::new(Method::POST, host, path)
    }

    pub fn put(host: Host, path: impl Into<String>) -> Self {
        Self::new(Method::PUT, host, path)
    }

    pub fn delete(host: Host, path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, host, path)
    }

    /// Appends a query parameter. Values are rendered with `to_string`, so
    /// booleans go out as `true`/`false`.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets the JSON body.
    ///
    /// # Errors
    ///
    /// [`Error::Json`](crate::Error::Json) when `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Res<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

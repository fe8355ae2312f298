//! # HTTP Transport
//!
//! The transport is the only part of the crate that talks to the network. It
//! takes a fully built [`HttpRequest`] and hands back the raw [`HttpResponse`]
//! for any status code; deciding what counts as failure is left to the
//! client. Keeping this seam as a trait lets tests inject a recording fake.
//!
//! [`ReqwestTransport`] is the production implementation. It wraps a
//! `reqwest::blocking::Client` with a persistent cookie store, so cookies set
//! by the login handshake follow every later request on the same transport.

use reqwest::{
    Method, StatusCode,
    blocking::Client,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Res;

/// A single outgoing request, already resolved to an absolute URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Starts a request with no headers, query or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Appends a header. Names are not deduplicated.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Replaces the query parameters. They are URL-encoded by the transport.
    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Sets the JSON body. The transport serializes it and sets
    /// `Content-Type` unless a header already does.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Looks up a request header case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Looks up a query parameter by exact name.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A response as received, status unchecked.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response without headers.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Builds a response whose body is the serialized `value`.
    pub fn from_json(status: StatusCode, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Appends a header, keeping earlier values with the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of header `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON, whatever the status.
    ///
    /// # Errors
    ///
    /// [`Error::Json`](crate::Error::Json) when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Res<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Issues one HTTP request and returns the response for any status.
///
/// Implementations must not turn non-2xx statuses into errors; the client
/// inspects them, e.g. to detect a two-factor challenge.
pub trait Transport {
    /// Sends `request` and returns the full response.
    ///
    /// # Errors
    ///
    /// Only for failures to get a response at all, such as connection
    /// errors, surfaced as [`Error::Http`](crate::Error::Http).
    fn execute(&self, request: HttpRequest) -> Res<HttpResponse>;
}

/// Blocking `reqwest` transport with an in-memory cookie jar.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a blocking client with a cookie store and gzip decoding.
    ///
    /// # Errors
    ///
    /// [`Error::Http`](crate::Error::Http) when the TLS backend cannot be
    /// initialised.
    pub fn new() -> Res<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self { client })
    }

    /// Uses a caller-built client. Cookie persistence is then the caller's
    /// responsibility.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> Res<HttpResponse> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

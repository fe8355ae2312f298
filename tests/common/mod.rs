#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use reqwest::{
    StatusCode,
    header::{HeaderName, HeaderValue, SET_COOKIE},
};
use serde_json::{Value, json};
use venmo_client::{
    Res,
    config::ClientConfig,
    transport::{HttpRequest, HttpResponse, Transport},
    venmo::Venmo,
};

pub const TOKEN: &str = "tok-123";
pub const EXTERNAL_ID: &str = "ext-42";
pub const OTP_SECRET: &str = "otp-secret-1";
pub const CSRF: &str = "csrf-abc";

#[derive(Default)]
struct State {
    responses: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

/// Replays canned responses in order and records every request it sees.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Rc<RefCell<State>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: HttpResponse) -> &Self {
        self.state.borrow_mut().responses.push_back(response);
        self
    }

    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push(HttpResponse::from_json(code(status), &body))
    }

    pub fn push_text(&self, status: u16, body: &str) -> &Self {
        self.push(HttpResponse::new(code(status), body))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests.len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.state
            .borrow()
            .requests
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for FakeTransport {
    fn execute(&self, request: HttpRequest) -> Res<HttpResponse> {
        let mut state = self.state.borrow_mut();
        let response = state.responses.pop_front().unwrap_or_else(|| {
            panic!("no canned response for {} {}", request.method, request.url)
        });
        state.requests.push(request);
        Ok(response)
    }
}

pub fn code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap()
}

pub fn grant() -> Value {
    json!({
        "access_token": TOKEN,
        "id": "777",
        "name": "Alice Anders",
        "username": "alice",
        "phone": "5551234567",
        "email": "alice@example.com",
        "balance": "10.00"
    })
}

pub fn me() -> Value {
    json!({
        "external_id": EXTERNAL_ID,
        "username": "alice"
    })
}

/// A login response asking for step-up authentication.
pub fn challenge() -> HttpResponse {
    HttpResponse::from_json(
        StatusCode::UNAUTHORIZED,
        &json!({"error": {"code": 81109, "message": "Additional verification required"}}),
    )
    .with_header(
        HeaderName::from_static("venmo-otp-secret"),
        HeaderValue::from_static(OTP_SECRET),
    )
    .with_header(
        SET_COOKIE,
        HeaderValue::from_str(&format!("csrftoken2={CSRF}; Path=/; Secure")).unwrap(),
    )
}

pub fn client(transport: &FakeTransport) -> Venmo<FakeTransport> {
    Venmo::with_transport(transport.clone(), ClientConfig::default())
}

/// A client that went through a plain login. The two login requests are
/// already recorded on `transport`.
pub fn logged_in(transport: &FakeTransport) -> Venmo<FakeTransport> {
    transport.push_json(200, grant()).push_json(200, me());
    let mut venmo = client(transport);
    venmo.login("alice", "hunter2").unwrap();
    venmo
}

#![allow(dead_code)]

use serde_json::{json, Value};
use starspace_core::gateway::{ApiRequest, ApiResponse, HttpTransport, TransportError};
use starspace_core::{ApiClient, ClientConfig, MemoryCredentialStore, Session};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub const BASE_URL: &str = "http://api.starspace.test";

type Reply = Result<ApiResponse, TransportError>;

/// Scripted transport; clones share the same script and request log.
#[derive(Clone, Default)]
pub struct FakeTransport {
    replies: Rc<RefCell<VecDeque<Reply>>>,
    sent: Rc<RefCell<Vec<(String, ApiRequest)>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_json(&self, status: u16, body: Value) -> &Self {
        self.replies.borrow_mut().push_back(Ok(ApiResponse {
            status,
            body: body.to_string().into_bytes(),
        }));
        self
    }

    pub fn reply_status(&self, status: u16) -> &Self {
        self.replies.borrow_mut().push_back(Ok(ApiResponse {
            status,
            body: Vec::new(),
        }));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError(message.to_string())));
        self
    }

    pub fn sent(&self) -> Vec<(String, ApiRequest)> {
        self.sent.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.sent
            .borrow()
            .iter()
            .map(|(_, request)| format!("{} {}", request.method, request.path))
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl HttpTransport for FakeTransport {
    fn send(&self, url: &str, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent
            .borrow_mut()
            .push((url.to_string(), request.clone()));
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted reply".to_string())))
    }
}

pub type TestClient = ApiClient<FakeTransport, MemoryCredentialStore>;

/// Client with a restored session over `store`.
pub fn client(transport: &FakeTransport, store: &MemoryCredentialStore) -> TestClient {
    let config = ClientConfig::with_api_url(BASE_URL).expect("test base url");
    ApiClient::new(config, transport.clone(), Session::restore(store.clone()))
}

pub fn user_json() -> Value {
    json!({ "id": "u-1", "email": "ada@example.com" })
}

pub fn profile_json() -> Value {
    json!({
        "id": "p-1",
        "user_id": "u-1",
        "full_name": "Ada Lovelace",
        "date_of_birth": "1815-12-10T00:00:00",
        "place_of_birth": "London, UK",
        "time_of_birth": "1:00 PM",
        "mbti_type": "INTJ",
        "enneagram_type": "5"
    })
}

pub fn friend_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "user_id": "u-1",
        "full_name": name,
        "date_of_birth": "1906-12-09",
        "place_of_birth": "New York, USA",
        "time_of_birth": "8:00 AM",
        "mbti_type": "ISTJ",
        "enneagram_type": "8"
    })
}

pub fn compatibility_json(friend_id: &str, overall: f64) -> Value {
    json!({
        "user": profile_json(),
        "friend": friend_json(friend_id, "Grace Hopper"),
        "scores": {
            "overall": overall,
            "love": 70,
            "physical_intimacy": 65,
            "work": 92,
            "marriage": 71,
            "friendship": 88
        },
        "analysis": "Strong working partnership."
    })
}

//! Shared test helpers, available to every `#[cfg(test)]` module in the crate.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::storage::MemoryStorage;
use crate::token::TokenStore;
use crate::types::Movie;

/// Scripted transport: hands out queued responses in order and records every
/// request it saw. Running past the end of the script panics, failing the
/// test instead of hanging it.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next request.
    pub fn expect(&self, response: HttpResponse) {
        self.script.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a transport-level failure for the next request.
    pub fn expect_transport_error(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(TransportError(message.to_string())));
    }

    /// Requests issued so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted request: {:?} {}", request.method, request.url))
    }
}

/// A response with `Content-Type: application/json` and the given body.
pub fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    }
}

/// A response with an arbitrary content type.
pub fn text_response(status: u16, content_type: &str, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), content_type.to_string())],
        body: body.to_string(),
    }
}

/// A bodiless response, as servers send for 204 No Content.
pub fn empty_response(status: u16) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body: String::new(),
    }
}

/// An [`ApiClient`] over the given transport, with in-memory token storage
/// and a fixed base URL (`http://mock.test`).
pub fn test_client(transport: Arc<MockTransport>) -> ApiClient {
    ApiClient::new(
        ApiConfig::new("http://mock.test"),
        TokenStore::new(Arc::new(MemoryStorage::new())),
        transport,
    )
}

/// A fully-populated movie fixture.
pub fn sample_movie(id: &str, title: &str) -> Movie {
    Movie {
        id: id.to_string(),
        title: title.to_string(),
        director: "Alguien".to_string(),
        poster_url: None,
        year: Some(1999),
        created_at: Some("2024-01-01T00:00:00Z".to_string()),
        updated_at: Some("2024-01-01T00:00:00Z".to_string()),
    }
}

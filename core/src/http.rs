//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data with owned fields. The pipeline in
//! [`crate::client`] builds an [`HttpRequest`], hands it to an injected
//! [`HttpTransport`], and classifies the returned [`HttpResponse`]. Keeping
//! the transport behind a trait keeps the core deterministic: unit tests
//! script it, integration tests back it with a real HTTP client.
//!
//! A transport must distinguish "the call itself failed" (DNS failure or
//! refused connection: return `Err(TransportError)`) from "the server
//! answered with an error status" (return `Ok` carrying that status); the
//! pipeline maps the two to different errors.

use thiserror::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An outgoing HTTP request described as plain data.
///
/// `url` is absolute: the pipeline joins the configured base URL with the
/// operation path before the request reaches the transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Look up a response header by name, case-insensitively.
    ///
    /// Returns the first value when a header occurs more than once.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The transport call itself failed; no response status exists.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Executes [`HttpRequest`]s. Implemented by the embedding application (or
/// by test doubles); the core ships none of its own.
pub trait HttpTransport: Send + Sync {
    /// Perform the round-trip. `Err` means the request never produced a
    /// response; server-side error statuses are `Ok`.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

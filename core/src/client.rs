//! Request pipeline and the fixed operations of the movie catalog API.
//!
//! # Design
//! `ApiClient` owns three injected pieces: the resolved base URL, the shared
//! [`TokenStore`], and an [`HttpTransport`]. Every operation funnels through
//! one `send` pipeline that builds headers, executes the round-trip, and
//! normalizes the outcome: transport failures, malformed bodies, and error
//! statuses all surface as a single [`ApiError`] whose `Display` is safe to
//! show to users. Operations are synchronous and the client is cheap to
//! clone; clones share the token store and transport.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::token::TokenStore;
use crate::types::{Credentials, LoginResponse, Movie, MoviePayload, RegisterPayload};

const FALLBACK_ERROR_MESSAGE: &str = "Ocurrió un error inesperado.";

/// Options for a single pipeline pass. `auth` defaults to on; public
/// endpoints opt out explicitly.
struct RequestOptions {
    method: HttpMethod,
    body: Option<String>,
    auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            body: None,
            auth: true,
        }
    }
}

/// Synchronous client for the movie catalog API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token_store: TokenStore,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(
        config: ApiConfig,
        token_store: TokenStore,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            token_store,
            transport,
        }
    }

    /// The token store consulted before every authenticated request.
    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    /// POST `/api/auth/login`. Returns the issued token; storing it in the
    /// token store is the caller's decision, not a side effect.
    pub fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.request(
            "/api/auth/login",
            RequestOptions {
                method: HttpMethod::Post,
                body: Some(to_body(credentials)?),
                auth: false,
            },
        )
    }

    /// POST `/api/auth/register`. Success carries no data worth returning;
    /// failure surfaces the server's message.
    pub fn register(&self, payload: &RegisterPayload) -> Result<(), ApiError> {
        self.send(
            "/api/auth/register",
            RequestOptions {
                method: HttpMethod::Post,
                body: Some(to_body(payload)?),
                auth: false,
            },
        )
        .map(|_| ())
    }

    /// GET `/api/movies`.
    pub fn list_movies(&self) -> Result<Vec<Movie>, ApiError> {
        self.request("/api/movies", RequestOptions::default())
    }

    /// POST `/api/movies`. Returns the stored movie, with its
    /// server-assigned id and timestamps.
    pub fn create_movie(&self, payload: &MoviePayload) -> Result<Movie, ApiError> {
        self.request(
            "/api/movies",
            RequestOptions {
                method: HttpMethod::Post,
                body: Some(to_body(payload)?),
                ..RequestOptions::default()
            },
        )
    }

    /// PUT `/api/movies/{id}`. Replaces every field of the movie.
    pub fn update_movie(&self, id: &str, payload: &MoviePayload) -> Result<Movie, ApiError> {
        self.request(
            &format!("/api/movies/{id}"),
            RequestOptions {
                method: HttpMethod::Put,
                body: Some(to_body(payload)?),
                ..RequestOptions::default()
            },
        )
    }

    /// DELETE `/api/movies/{id}`.
    pub fn delete_movie(&self, id: &str) -> Result<(), ApiError> {
        self.send(
            &format!("/api/movies/{id}"),
            RequestOptions {
                method: HttpMethod::Delete,
                ..RequestOptions::default()
            },
        )
        .map(|_| ())
    }

    /// Run the pipeline and decode the success payload into `T`.
    ///
    /// A success payload that does not match `T` is reported the same way
    /// as a body that failed to parse at all: the server broke its
    /// contract.
    fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let (status, payload) = self.send(path, options)?;
        serde_json::from_value(payload.unwrap_or(Value::Null))
            .map_err(|source| ApiError::InvalidResponse { status, source })
    }

    /// One pipeline pass: build headers, execute, normalize the outcome.
    ///
    /// On success, returns the status and the classified payload: `None`
    /// for a 204, parsed JSON when the content type says JSON, the raw
    /// text as a JSON string otherwise.
    fn send(&self, path: &str, options: RequestOptions) -> Result<(u16, Option<Value>), ApiError> {
        let request = self.build_request(path, options);
        tracing::debug!(method = ?request.method, url = %request.url, "api request");

        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(source) => {
                tracing::warn!(url = %request.url, error = %source, "transport failure");
                return Err(ApiError::Network { source });
            }
        };

        let status = response.status;
        let payload = classify_payload(&response)?;

        if !(200..300).contains(&status) {
            tracing::warn!(status, url = %request.url, "api error response");
            return Err(ApiError::Http {
                status,
                message: error_message(payload.as_ref()),
                details: payload.unwrap_or(Value::Null),
            });
        }

        tracing::debug!(status, url = %request.url, "api response");
        Ok((status, payload))
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = Vec::new();
        if options.body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if options.auth {
            // A missing token is not an error at this layer: the request
            // goes out bare and the server answers 401.
            if let Some(token) = self.token_store.value() {
                headers.push(("Authorization".to_string(), format!("Bearer {token}")));
            }
        }
        HttpRequest {
            method: options.method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body: options.body,
        }
    }
}

fn to_body<T: Serialize>(payload: &T) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Classify the response body according to status and content type.
fn classify_payload(response: &HttpResponse) -> Result<Option<Value>, ApiError> {
    if response.status == 204 {
        return Ok(None);
    }
    let is_json = response
        .header("content-type")
        .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"));
    if is_json {
        return serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|source| ApiError::InvalidResponse {
                status: response.status,
                source,
            });
    }
    Ok(Some(Value::String(response.body.clone())))
}

/// User-facing message for an error response: the payload's `error` field
/// if it is a string, else its `message` field if it is a string, else the
/// fixed fallback. A field holding null or a non-string does not commit.
fn error_message(payload: Option<&Value>) -> String {
    payload
        .and_then(Value::as_object)
        .and_then(|object| {
            object
                .get("error")
                .and_then(Value::as_str)
                .or_else(|| object.get("message").and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

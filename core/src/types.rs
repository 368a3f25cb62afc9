//! Domain DTOs for the movie catalog API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined
//! independently; the mock-server crate keeps its own copies and the
//! integration tests catch any drift between the two. Fields are
//! snake_case in Rust and camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Sign-in request payload. Serialized once per login, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-up request payload. `confirmPassword` is omitted from the JSON
/// when `None`; servers that validate it treat absence as "not checked".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

/// Successful sign-in response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// A movie in the catalog as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Opaque server-assigned identifier.
    pub id: String,
    pub title: String,
    pub director: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Request payload for creating or updating a movie. The same shape serves
/// both: an update replaces every field rather than patching.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePayload {
    pub title: String,
    pub director: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    pub year: i32,
}

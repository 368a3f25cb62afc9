//! Error type for the API request pipeline.
//!
//! # Design
//! Every pipeline failure is normalized into one [`ApiError`] variant with a
//! human-readable message as its `Display` output. User-facing messages are
//! Spanish, matching the backend's error language. `status()` exists only
//! for failures that carry an HTTP status; a transport failure happened
//! before any status existed, and the distinction matters to callers.

use serde_json::Value;
use thiserror::Error;

use crate::http::TransportError;

/// Errors raised by [`crate::client::ApiClient`] operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the server (DNS failure, refused
    /// connection, ...). Terminal; the pipeline does not retry.
    #[error("No se pudo conectar con el servidor.")]
    Network {
        #[source]
        source: TransportError,
    },

    /// The server answered, but the body could not be understood: either
    /// a body advertised as JSON failed to parse, or a success payload did
    /// not match the expected shape.
    #[error("El servidor devolvió una respuesta inválida.")]
    InvalidResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The server answered with a status outside the 2xx range.
    #[error("{message}")]
    Http {
        status: u16,
        /// Server-provided `error`/`message` field, or the fixed fallback.
        message: String,
        /// Full response payload, kept for diagnostics. `Value::Null` when
        /// the response carried no body.
        details: Value,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status associated with the failure, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::InvalidResponse { status, .. } | ApiError::Http { status, .. } => {
                Some(*status)
            }
            ApiError::Network { .. } | ApiError::Serialization(_) => None,
        }
    }
}

//! Client-side data layer for the movie catalog service.
//!
//! # Overview
//! Everything a front end needs between its UI and the catalog's REST API:
//! a request pipeline that normalizes every failure into one user-facing
//! error type, a token store that survives restarts through pluggable
//! durable storage, and an observable CRUD store mirroring server state
//! for presentation layers.
//!
//! # Design
//! - The network seam is the [`http::HttpTransport`] trait. The core ships
//!   no HTTP implementation of its own; the embedding application injects
//!   one, and tests script it.
//! - State lives in [`observable::Observable`] holders. No global
//!   singletons; stores are built once at a composition root and handed
//!   (cheaply cloned) to their consumers.
//! - All operations are synchronous and blocking; concurrency is the
//!   caller's concern.
//!
//! # Wiring it up
//! ```no_run
//! use std::sync::Arc;
//!
//! use videoteca_core::client::ApiClient;
//! use videoteca_core::config::ApiConfig;
//! use videoteca_core::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
//! use videoteca_core::storage::FileStorage;
//! use videoteca_core::store::MoviesStore;
//! use videoteca_core::token::TokenStore;
//! use videoteca_core::types::Credentials;
//!
//! struct MyTransport;
//!
//! impl HttpTransport for MyTransport {
//!     fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
//!         // Execute with the HTTP client of your choice.
//!         unimplemented!()
//!     }
//! }
//!
//! let tokens = TokenStore::new(Arc::new(FileStorage::new("videoteca.json")));
//! let api = ApiClient::new(ApiConfig::from_env(), tokens, Arc::new(MyTransport));
//! let movies = MoviesStore::new(api.clone());
//!
//! let login = api.login(&Credentials {
//!     email: "ana@example.com".into(),
//!     password: "secret".into(),
//! }).unwrap();
//! api.token_store().set(Some(login.token.as_str()));
//!
//! movies.load_movies();
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observable;
pub mod storage;
pub mod store;
pub mod token;
pub mod types;

#[cfg(test)]
pub mod testutil;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use observable::{Observable, Subscription};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, NullStorage, StorageError};
pub use store::{MoviesState, MoviesStore};
pub use token::{TokenStore, TOKEN_STORAGE_KEY};
pub use types::{Credentials, LoginResponse, Movie, MoviePayload, RegisterPayload};

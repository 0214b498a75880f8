//! Rentflow API client.
//!
//! Performs HTTP requests against the rental-management API, transparently
//! attaching the current access token and recovering from a single
//! expired-token failure per call.
//!
//! # Token refresh
//!
//! On a 401 the client refreshes the access token exactly once and retries
//! the original request exactly once, returning whatever that retry
//! produces. If the refresh fails the stored pair is cleared and the
//! original 401 is returned for the caller to treat as session expiry.
//! There is no loop and no recursion back into the retry path.
//!
//! # Example
//!
//! ```rust,ignore
//! use rentflow_client::{ApiClient, ApiConfig, ApiRequest, TokenStore};
//!
//! let config = ApiConfig::from_env()?;
//! let tokens = TokenStore::new();
//! let client = ApiClient::new(&config, tokens.clone());
//!
//! client.login(&Credentials::new("sam@example.com", "hunter2!")).await?;
//!
//! let response = client.send(&ApiRequest::get("products/")).await?;
//! let orders: Vec<Order> = client.fetch_json(&ApiRequest::get("orders/")).await?;
//! ```
//!
//! # Modules
//!
//! - [`client`] - the request/refresh/retry engine and auth endpoints
//! - [`request`] - request descriptions that can be issued more than once
//! - [`token`] - the per-session token store
//! - [`config`] - environment-driven configuration
//! - [`error`] - the client error taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod token;

pub use client::{ApiClient, Credentials, Registration};
pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use request::{ApiRequest, FormPart, FormValue, RequestBody};
pub use token::TokenStore;

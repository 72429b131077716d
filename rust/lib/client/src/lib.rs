//! FriendFrame HTTP client.
//!
//! Wraps the FriendFrame service API behind one method per domain action.
//! Every call pulls a bearer token from an injected [`IdentityProvider`],
//! sends the request, and maps the service's wire DTOs into the UI model
//! from `friendframe_types`.
//!
//! Failures are always surfaced as a typed [`ApiError`]. A missing token or
//! a 401 response additionally triggers
//! [`IdentityProvider::redirect_to_sign_in`].
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use friendframe_client::{ApiClient, ClientConfig, StaticIdentity};
//!
//! let identity = Arc::new(StaticIdentity::new("session-jwt"));
//! let client = ApiClient::new(ClientConfig::from_env(), identity)?;
//! let groups = client.list_groups().await?;
//! ```

mod client;
mod config;
pub mod dto;
mod error;
mod identity;
pub mod mapping;

#[cfg(test)]
mod client_test;

pub use client::{ApiClient, GroupUpdate, NewFrame, NewGroup};
pub use config::{
    API_URL_ENV, ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT, PRODUCTION_HOSTS, TIMEOUT_ENV,
    publishable_key_for_host,
};
pub use error::ApiError;
pub use identity::{IdentityProvider, StaticIdentity};

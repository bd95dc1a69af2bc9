#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP client abstractions for the drive-ox crates
//!
//! This crate provides the request plumbing used by the typed drive client
//! and the query layer: endpoint descriptors, auth methods, JSON request
//! execution and consistent error parsing.

pub mod error;
pub mod request_builder;

pub use error::CommonRequestError;
pub use request_builder::{AuthMethod, Endpoint, HttpMethod, RequestBuilder, RequestConfig};

/// Re-export common types for convenience
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};

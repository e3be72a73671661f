#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async HTTP client for the [SecurionPay](https://securionpay.com) payments
//! API.
//!
//! Wraps the wire types of the `securionpay` crate in authenticated
//! requests: each call is validated locally, signed with HTTP Basic auth
//! (API key as username, empty password) and sent through a
//! `reqwest_middleware` transport.
//!
//! # Modules
//!
//! - [`client`] - The [`SecurionPayClient`] and its operations
//! - [`config`] - Client configuration builder
//! - [`credentials`] - API key and transport shared between client clones
//! - [`endpoint`] - Operation URL resolution
//! - [`constants`] - Default base URL, environment variable name
//! - [`error`] - Client error type
//!
//! # Features
//!
//! - `telemetry` (default) - `tracing` spans around every operation

pub mod client;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod endpoint;
pub mod error;

pub use client::SecurionPayClient;
pub use config::ClientConfig;
pub use credentials::{ApiKey, CredentialStore};
pub use endpoint::Endpoints;
pub use error::ClientError;

//! Validade Core - Shared domain types.
//!
//! This crate provides the common types used across Validade Control:
//! - `server` - The web application binary
//! - `integration-tests` - End-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no store
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, emails, roles, statuses, and the product and
//!   expiry-record models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

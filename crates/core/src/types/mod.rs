//! Core types for Validade Control.
//!
//! This module provides type-safe wrappers for the domain concepts shared
//! between the server and the tests.

pub mod credential;
pub mod email;
pub mod identifier;
pub mod product;
pub mod record;
pub mod role;
pub mod status;

pub use credential::Credential;
pub use email::{Email, EmailError};
pub use identifier::{Identifier, normalize_identifier};
pub use product::Product;
pub use record::ExpiryRecord;
pub use role::{Role, RoleError};
pub use status::{AccountStatus, AccountStatusError, ExpiryStatus};

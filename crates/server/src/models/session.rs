//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use validade_core::{Identifier, Role};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Normalized login identifier.
    pub utilizador: Identifier,
    /// Display name as stored in the worksheet (original casing).
    pub nome: String,
    /// Permission tier.
    pub nivel: Role,
}

impl CurrentUser {
    /// Returns true when the user holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.nivel.is_admin()
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

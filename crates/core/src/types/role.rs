//! Permission roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error parsing a [`Role`] from a worksheet cell.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown role: {0:?}")]
pub struct RoleError(pub String);

/// Coarse permission tier gating which pages a user may see.
///
/// Stored in the `nivel` column of the user worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May manage products and approve pending accounts.
    Admin,
    /// May list and append expiry records.
    #[default]
    User,
}

impl Role {
    /// The canonical cell value for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Returns true for [`Role::Admin`].
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    /// Parse a role cell. Tolerates surrounding whitespace and casing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(RoleError(other.to_owned())),
        }
    }
}

//! Login identifiers and the canonical normalization rule.
//!
//! Identifiers in the user worksheet were typed by humans, so comparisons
//! must tolerate stray whitespace and casing differences. Every identifier
//! comparison in the system goes through [`normalize_identifier`] - there is
//! no other normalization rule anywhere.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Normalize a raw identifier for comparison: trim surrounding whitespace
/// and lowercase.
///
/// Secrets are never normalized; this applies to identifiers only.
#[must_use]
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A login identifier in normalized form.
///
/// Constructing an `Identifier` applies [`normalize_identifier`], so two
/// identifiers that differ only in case or surrounding whitespace compare
/// equal:
///
/// ```
/// use validade_core::Identifier;
///
/// assert_eq!(Identifier::new("RICARDO "), Identifier::new("ricardo"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Create an identifier from raw user input, normalizing it.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(normalize_identifier(raw))
    }

    /// Returns the normalized identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identifier {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_identifier("  RICARDO "), "ricardo");
        assert_eq!(normalize_identifier("ricardo"), "ricardo");
        assert_eq!(normalize_identifier("\tMaria\n"), "maria");
    }

    #[test]
    fn test_normalize_keeps_interior_whitespace() {
        assert_eq!(normalize_identifier(" Joao Silva "), "joao silva");
    }

    #[test]
    fn test_normalize_handles_unicode() {
        assert_eq!(normalize_identifier("JOÃO"), "joão");
    }

    #[test]
    fn test_identifier_equality_after_normalization() {
        assert_eq!(Identifier::new("RICARDO "), Identifier::new("ricardo"));
        assert_ne!(Identifier::new("ricardo"), Identifier::new("maria"));
    }

    #[test]
    fn test_identifier_empty() {
        assert!(Identifier::new("   ").is_empty());
        assert!(!Identifier::new("a").is_empty());
    }

    #[test]
    fn test_serde_uses_normalized_form() {
        let id = Identifier::new(" RICARDO ");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ricardo\"");
    }
}

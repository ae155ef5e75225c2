//! Credential records from the user worksheet.

use serde::{Deserialize, Serialize};

use crate::{AccountStatus, Email, Identifier, Role};

/// One row of the `utilizadores` worksheet.
///
/// Secrets are stored and compared as plaintext: the worksheet is the
/// authority and offers nothing better. Comparison rules:
/// identifiers are compared in normalized form, secrets byte-exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Login identifier as stored in the sheet (not normalized).
    pub utilizador: String,
    /// Plaintext secret.
    pub senha: String,
    /// Permission tier.
    pub nivel: Role,
    /// Lifecycle state (`pendente` until approved).
    pub estado: AccountStatus,
    /// Contact address; absent on rows created before the column existed.
    pub email: Option<Email>,
}

impl Credential {
    /// Returns true if this record belongs to the given identifier.
    #[must_use]
    pub fn is_for(&self, identifier: &Identifier) -> bool {
        &Identifier::new(&self.utilizador) == identifier
    }

    /// Returns true if `submitted` matches the stored secret exactly.
    ///
    /// No trimming, no case folding: `" 123"` does not match `"123"`.
    #[must_use]
    pub fn secret_matches(&self, submitted: &str) -> bool {
        self.senha == submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ricardo() -> Credential {
        Credential {
            utilizador: "ricardo".to_owned(),
            senha: "123".to_owned(),
            nivel: Role::Admin,
            estado: AccountStatus::Active,
            email: None,
        }
    }

    #[test]
    fn test_is_for_normalizes_both_sides() {
        let cred = Credential {
            utilizador: " Ricardo ".to_owned(),
            ..ricardo()
        };
        assert!(cred.is_for(&Identifier::new("RICARDO ")));
        assert!(!cred.is_for(&Identifier::new("maria")));
    }

    #[test]
    fn test_secret_is_exact() {
        let cred = ricardo();
        assert!(cred.secret_matches("123"));
        assert!(!cred.secret_matches(" 123"));
        assert!(!cred.secret_matches("124"));
    }
}

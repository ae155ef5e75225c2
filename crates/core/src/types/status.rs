//! Status enums: account lifecycle and derived expiry state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Error parsing an [`AccountStatus`] from a worksheet cell.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown account status: {0:?}")]
pub struct AccountStatusError(pub String);

/// Lifecycle state of a credential record.
///
/// Self-registered accounts start as `pendente` and cannot log in until an
/// administrator flips them to `ativo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Awaiting administrator approval.
    Pending,
    /// May log in.
    #[default]
    Active,
}

impl AccountStatus {
    /// The canonical cell value for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Active => "ativo",
        }
    }

    /// Parse a status cell.
    ///
    /// Rows created before the status column carried data have an empty
    /// cell; those accounts are treated as active.
    ///
    /// # Errors
    ///
    /// Returns [`AccountStatusError`] for any other unrecognized value.
    pub fn parse(s: &str) -> Result<Self, AccountStatusError> {
        match s.trim().to_lowercase().as_str() {
            "" | "ativo" => Ok(Self::Active),
            "pendente" => Ok(Self::Pending),
            other => Err(AccountStatusError(other.to_owned())),
        }
    }
}

/// Derived expiry state of a record; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// More than the warning window away from expiry.
    Valid,
    /// Expires within the warning window (inclusive of today).
    ExpiringSoon,
    /// Expiry date is in the past.
    Expired,
}

impl ExpiryStatus {
    /// Days before expiry at which a record is flagged as expiring soon.
    pub const WARNING_WINDOW_DAYS: i64 = 7;

    /// Classify an expiry date relative to `today`.
    #[must_use]
    pub fn classify(expiry: NaiveDate, today: NaiveDate) -> Self {
        let days_left = (expiry - today).num_days();
        if days_left < 0 {
            Self::Expired
        } else if days_left <= Self::WARNING_WINDOW_DAYS {
            Self::ExpiringSoon
        } else {
            Self::Valid
        }
    }

    /// Short human-readable label used in pages and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Valid => "OK",
            Self::ExpiringSoon => "Atenção",
            Self::Expired => "Caducado",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_account_status_parse() {
        assert_eq!(AccountStatus::parse("ativo").unwrap(), AccountStatus::Active);
        assert_eq!(
            AccountStatus::parse(" Pendente ").unwrap(),
            AccountStatus::Pending
        );
    }

    #[test]
    fn test_account_status_empty_cell_is_active() {
        assert_eq!(AccountStatus::parse("").unwrap(), AccountStatus::Active);
        assert_eq!(AccountStatus::parse("  ").unwrap(), AccountStatus::Active);
    }

    #[test]
    fn test_account_status_rejects_unknown() {
        assert!(AccountStatus::parse("approved").is_err());
    }

    #[test]
    fn test_classify_expired() {
        let today = date("2025-06-15");
        assert_eq!(
            ExpiryStatus::classify(date("2025-06-14"), today),
            ExpiryStatus::Expired
        );
    }

    #[test]
    fn test_classify_expiring_soon_boundaries() {
        let today = date("2025-06-15");
        // Today and the last day of the window both warn.
        assert_eq!(
            ExpiryStatus::classify(today, today),
            ExpiryStatus::ExpiringSoon
        );
        assert_eq!(
            ExpiryStatus::classify(date("2025-06-22"), today),
            ExpiryStatus::ExpiringSoon
        );
    }

    #[test]
    fn test_classify_valid_past_window() {
        let today = date("2025-06-15");
        assert_eq!(
            ExpiryStatus::classify(date("2025-06-23"), today),
            ExpiryStatus::Valid
        );
    }
}

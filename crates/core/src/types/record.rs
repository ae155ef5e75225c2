//! Expiry records from the records worksheet.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ExpiryStatus;

/// One row of the `registos` worksheet. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpiryRecord {
    /// Product name as selected at submission time. Free text; there is no
    /// referential check against the product worksheet.
    pub produto: String,
    /// Date the product expires.
    pub data_validade: NaiveDate,
    /// Time of day the product expires, when recorded.
    pub hora_registo: Option<NaiveTime>,
    /// Identifier of the user who recorded the entry.
    pub registado_por: String,
    /// When the entry was recorded.
    pub registado_em: DateTime<Utc>,
}

impl ExpiryRecord {
    /// Derived expiry state relative to `today`.
    #[must_use]
    pub fn status(&self, today: NaiveDate) -> ExpiryStatus {
        ExpiryStatus::classify(self.data_validade, today)
    }
}

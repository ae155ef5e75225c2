//! Typed worksheet adapters over the raw tabular-store client.
//!
//! The store has no row-level primitives, so every mutation here is
//! read-all, modify in memory, write-all. That pattern loses rows when two
//! writers interleave, so all mutations take the single writer lock for the
//! whole read-modify-write cycle. Reads never take the lock.
//!
//! # Worksheets
//!
//! - `utilizadores` - credentials ([`UserDirectory`])
//! - `produtos` - product templates ([`ProductCatalog`], reads cached 60 s)
//! - `registos` - expiry records ([`ExpiryLedger`], append-only)
//!
//! Column lookup goes through the header row, so worksheets may order their
//! columns freely; a missing column is a schema error
//! ([`StoreError::MissingColumn`]), reported as a store failure and never as
//! an authentication failure.

mod products;
mod records;
mod users;

pub use products::{PRODUCTS_WORKSHEET, ProductCatalog};
pub use records::{DATE_FORMAT, RECORDS_WORKSHEET, TIME_FORMAT, ExpiryLedger};
pub use users::{USERS_WORKSHEET, UserDirectory};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use validade_core::Product;

use crate::sheets::{SheetsClient, SheetsError};

/// Time product listings stay cached before the worksheet is re-read.
const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(60);

pub(crate) const PRODUCT_CACHE_KEY: &str = "produtos";

/// Errors from the typed store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The tabular store could not be reached or rejected the call.
    #[error("store unavailable: {0}")]
    Sheets(#[from] SheetsError),

    /// A worksheet lacks a column the schema requires.
    #[error("worksheet {worksheet:?} is missing column {column:?}")]
    MissingColumn {
        worksheet: &'static str,
        column: &'static str,
    },

    /// A worksheet came back without even a header row.
    #[error("worksheet {0:?} has no header row")]
    EmptyWorksheet(&'static str),

    /// A cell holds a value the schema cannot interpret.
    #[error("bad data in worksheet {worksheet:?}: {detail}")]
    Data {
        worksheet: &'static str,
        detail: String,
    },

    /// A uniqueness rule was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The addressed row does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// True for the connectivity/schema error class - failures of the store
    /// itself, as opposed to domain outcomes like [`StoreError::Conflict`].
    /// Callers use this to keep "store unreadable" distinct from outcomes
    /// like "wrong password".
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::Sheets(_) | Self::MissingColumn { .. } | Self::EmptyWorksheet(_) | Self::Data { .. }
        )
    }
}

/// An in-memory copy of one worksheet: header row plus data rows.
#[derive(Debug, Clone)]
pub(crate) struct Table {
    worksheet: &'static str,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn from_values(
        worksheet: &'static str,
        mut values: Vec<Vec<String>>,
    ) -> Result<Self, StoreError> {
        if values.is_empty() {
            return Err(StoreError::EmptyWorksheet(worksheet));
        }
        let header = values.remove(0);
        Ok(Self {
            worksheet,
            header,
            rows: values,
        })
    }

    /// Index of a column by header name. Header matching tolerates
    /// whitespace and casing; the canonical names are lowercase.
    fn column(&self, name: &'static str) -> Result<usize, StoreError> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or(StoreError::MissingColumn {
                worksheet: self.worksheet,
                column: name,
            })
    }

    /// Fail early when any required column is absent, so schema errors
    /// surface even for empty worksheets.
    pub(crate) fn require_columns(&self, names: &[&'static str]) -> Result<(), StoreError> {
        for &name in names {
            self.column(name)?;
        }
        Ok(())
    }

    pub(crate) fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// A cell by column name. Rows shorter than the header read as empty.
    pub(crate) fn cell<'a>(&self, row: &'a [String], name: &'static str) -> Result<&'a str, StoreError> {
        let idx = self.column(name)?;
        Ok(row.get(idx).map_or("", String::as_str))
    }

    /// Append a row with the given named cells; unnamed columns stay empty.
    pub(crate) fn push_row(&mut self, cells: &[(&'static str, String)]) -> Result<(), StoreError> {
        let mut row = vec![String::new(); self.header.len()];
        for &(name, ref value) in cells {
            let idx = self.column(name)?;
            if let Some(slot) = row.get_mut(idx) {
                slot.clone_from(value);
            }
        }
        self.rows.push(row);
        Ok(())
    }

    /// Overwrite one cell of an existing row.
    pub(crate) fn set_cell(
        &mut self,
        row_index: usize,
        name: &'static str,
        value: String,
    ) -> Result<(), StoreError> {
        let idx = self.column(name)?;
        let Some(row) = self.rows.get_mut(row_index) else {
            return Err(StoreError::NotFound(format!(
                "row {row_index} in worksheet {:?}",
                self.worksheet
            )));
        };
        if row.len() <= idx {
            row.resize(idx + 1, String::new());
        }
        if let Some(slot) = row.get_mut(idx) {
            *slot = value;
        }
        Ok(())
    }

    fn to_values(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}

/// Shared store handle: raw client, the single writer lock, and caches.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    sheets: SheetsClient,
    write_lock: Mutex<()>,
    product_cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl Store {
    /// Create a store over a raw client.
    #[must_use]
    pub fn new(sheets: SheetsClient) -> Self {
        let product_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(PRODUCT_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(StoreInner {
                sheets,
                write_lock: Mutex::new(()),
                product_cache,
            }),
        }
    }

    /// Credential adapter for the `utilizadores` worksheet.
    #[must_use]
    pub const fn users(&self) -> UserDirectory<'_> {
        UserDirectory::new(self)
    }

    /// Product adapter for the `produtos` worksheet.
    #[must_use]
    pub const fn products(&self) -> ProductCatalog<'_> {
        ProductCatalog::new(self)
    }

    /// Expiry-record adapter for the `registos` worksheet.
    #[must_use]
    pub const fn records(&self) -> ExpiryLedger<'_> {
        ExpiryLedger::new(self)
    }

    /// The raw client. Calls made here bypass the writer lock.
    #[must_use]
    pub fn sheets(&self) -> &SheetsClient {
        &self.inner.sheets
    }

    /// Readiness probe: confirms the user worksheet can be read.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`StoreError`] when the store is unreachable
    /// or the worksheet is gone.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.read_table(USERS_WORKSHEET).await.map(|_| ())
    }

    /// Take the single writer lock. Held across every read-modify-write so
    /// concurrent mutations cannot overwrite each other's snapshots.
    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.inner.write_lock.lock().await
    }

    pub(crate) async fn read_table(&self, worksheet: &'static str) -> Result<Table, StoreError> {
        let values = self.inner.sheets.read_values(worksheet).await?;
        Table::from_values(worksheet, values)
    }

    pub(crate) async fn write_table(&self, table: &Table) -> Result<(), StoreError> {
        self.inner
            .sheets
            .write_values(table.worksheet, &table.to_values())
            .await?;
        Ok(())
    }

    pub(crate) fn product_cache(&self) -> &Cache<&'static str, Arc<Vec<Product>>> {
        &self.inner.product_cache
    }
}

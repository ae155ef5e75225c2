//! Expiry-record adapter for the `registos` worksheet.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use validade_core::ExpiryRecord;

use super::{Store, StoreError, Table};

/// Worksheet holding expiry records.
pub const RECORDS_WORKSHEET: &str = "registos";

/// Cell format for expiry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Cell format for optional expiry times.
pub const TIME_FORMAT: &str = "%H:%M";

const COL_PRODUTO: &str = "produto";
const COL_DATA_VALIDADE: &str = "data_validade";
const COL_HORA_REGISTO: &str = "hora_registo";
const COL_REGISTADO_POR: &str = "registado_por";
const COL_REGISTADO_EM: &str = "registado_em";

const REQUIRED_COLUMNS: &[&str] = &[
    COL_PRODUTO,
    COL_DATA_VALIDADE,
    COL_HORA_REGISTO,
    COL_REGISTADO_POR,
    COL_REGISTADO_EM,
];

/// Adapter for the append-only expiry log. There is no update or delete.
pub struct ExpiryLedger<'a> {
    store: &'a Store,
}

impl<'a> ExpiryLedger<'a> {
    pub(crate) const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Table, StoreError> {
        let table = self.store.read_table(RECORDS_WORKSHEET).await?;
        table.require_columns(REQUIRED_COLUMNS)?;
        Ok(table)
    }

    /// All records in worksheet order (append order). Never cached: the
    /// page must show what was just submitted.
    ///
    /// # Errors
    ///
    /// Store failures as usual; unparseable dates are `StoreError::Data`.
    pub async fn list(&self) -> Result<Vec<ExpiryRecord>, StoreError> {
        let table = self.load().await?;

        let mut records = Vec::new();
        for row in table.rows() {
            records.push(parse_record(&table, row)?);
        }
        Ok(records)
    }

    /// Append one record: read-all, concatenate, write-all, under the
    /// writer lock.
    ///
    /// # Errors
    ///
    /// Store failures as usual.
    pub async fn append(&self, record: &ExpiryRecord) -> Result<(), StoreError> {
        let _guard = self.store.lock_writes().await;

        let mut table = self.load().await?;
        table.push_row(&[
            (COL_PRODUTO, record.produto.clone()),
            (
                COL_DATA_VALIDADE,
                record.data_validade.format(DATE_FORMAT).to_string(),
            ),
            (
                COL_HORA_REGISTO,
                record
                    .hora_registo
                    .map(|h| h.format(TIME_FORMAT).to_string())
                    .unwrap_or_default(),
            ),
            (COL_REGISTADO_POR, record.registado_por.clone()),
            (COL_REGISTADO_EM, record.registado_em.to_rfc3339()),
        ])?;

        self.store.write_table(&table).await
    }
}

fn parse_record(table: &Table, row: &[String]) -> Result<ExpiryRecord, StoreError> {
    let produto = table.cell(row, COL_PRODUTO)?.to_string();

    let date_cell = table.cell(row, COL_DATA_VALIDADE)?.trim();
    let data_validade = NaiveDate::parse_from_str(date_cell, DATE_FORMAT).map_err(|_| {
        StoreError::Data {
            worksheet: RECORDS_WORKSHEET,
            detail: format!("invalid expiry date {date_cell:?} for product {produto:?}"),
        }
    })?;

    let hora_cell = table.cell(row, COL_HORA_REGISTO)?.trim();
    let hora_registo = if hora_cell.is_empty() {
        None
    } else {
        Some(
            NaiveTime::parse_from_str(hora_cell, TIME_FORMAT).map_err(|_| StoreError::Data {
                worksheet: RECORDS_WORKSHEET,
                detail: format!("invalid expiry time {hora_cell:?} for product {produto:?}"),
            })?,
        )
    };

    let em_cell = table.cell(row, COL_REGISTADO_EM)?.trim();
    let registado_em = DateTime::parse_from_rfc3339(em_cell)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::Data {
            worksheet: RECORDS_WORKSHEET,
            detail: format!("invalid timestamp {em_cell:?} for product {produto:?}"),
        })?;

    Ok(ExpiryRecord {
        produto,
        data_validade,
        hora_registo,
        registado_por: table.cell(row, COL_REGISTADO_POR)?.to_string(),
        registado_em,
    })
}

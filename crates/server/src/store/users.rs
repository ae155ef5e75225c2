//! Credential adapter for the `utilizadores` worksheet.

use validade_core::{AccountStatus, Credential, Email, Identifier, Role};

use super::{Store, StoreError, Table};

/// Worksheet holding credential records.
pub const USERS_WORKSHEET: &str = "utilizadores";

const COL_UTILIZADOR: &str = "utilizador";
const COL_SENHA: &str = "senha";
const COL_NIVEL: &str = "nivel";
const COL_ESTADO: &str = "estado";
const COL_EMAIL: &str = "email";

const REQUIRED_COLUMNS: &[&str] = &[COL_UTILIZADOR, COL_SENHA, COL_NIVEL, COL_ESTADO, COL_EMAIL];

/// Adapter for credential lookups and account lifecycle changes.
pub struct UserDirectory<'a> {
    store: &'a Store,
}

impl<'a> UserDirectory<'a> {
    pub(crate) const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Table, StoreError> {
        let table = self.store.read_table(USERS_WORKSHEET).await?;
        table.require_columns(REQUIRED_COLUMNS)?;
        Ok(table)
    }

    /// Find the credential whose normalized identifier matches.
    ///
    /// Only the matching row is fully parsed, so junk in unrelated rows
    /// does not break login for everyone else.
    ///
    /// # Errors
    ///
    /// `StoreError::Sheets`/`MissingColumn` when the worksheet is
    /// unreadable; `StoreError::Data` when the matched row itself cannot be
    /// interpreted.
    pub async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Credential>, StoreError> {
        let table = self.load().await?;

        for row in table.rows() {
            if &Identifier::new(table.cell(row, COL_UTILIZADOR)?) == identifier {
                return parse_credential(&table, row).map(Some);
            }
        }
        Ok(None)
    }

    /// All credentials awaiting approval.
    ///
    /// # Errors
    ///
    /// Same as [`Self::find_by_identifier`]; any unparseable row fails the
    /// listing.
    pub async fn list_pending(&self) -> Result<Vec<Credential>, StoreError> {
        let table = self.load().await?;

        let mut pending = Vec::new();
        for row in table.rows() {
            let credential = parse_credential(&table, row)?;
            if credential.estado == AccountStatus::Pending {
                pending.push(credential);
            }
        }
        Ok(pending)
    }

    /// Append a self-registered account in `pendente` state.
    ///
    /// The duplicate check and the append happen under the writer lock so
    /// two simultaneous registrations cannot both pass the check.
    ///
    /// # Errors
    ///
    /// `StoreError::Conflict` when the normalized identifier already
    /// exists; otherwise the usual store failures.
    pub async fn register(
        &self,
        utilizador: &str,
        email: &Email,
        senha: &str,
    ) -> Result<(), StoreError> {
        let _guard = self.store.lock_writes().await;

        let mut table = self.load().await?;
        let identifier = Identifier::new(utilizador);

        for row in table.rows() {
            if Identifier::new(table.cell(row, COL_UTILIZADOR)?) == identifier {
                return Err(StoreError::Conflict(format!(
                    "identifier {identifier} already registered"
                )));
            }
        }

        table.push_row(&[
            (COL_UTILIZADOR, utilizador.trim().to_string()),
            (COL_SENHA, senha.to_string()),
            (COL_NIVEL, Role::User.as_str().to_string()),
            (COL_ESTADO, AccountStatus::Pending.as_str().to_string()),
            (COL_EMAIL, email.to_string()),
        ])?;

        self.store.write_table(&table).await
    }

    /// Flip a pending account to `ativo`.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when no row carries the identifier.
    pub async fn approve(&self, identifier: &Identifier) -> Result<(), StoreError> {
        let _guard = self.store.lock_writes().await;

        let mut table = self.load().await?;

        let mut matched = None;
        for (index, row) in table.rows().iter().enumerate() {
            if &Identifier::new(table.cell(row, COL_UTILIZADOR)?) == identifier {
                matched = Some(index);
                break;
            }
        }

        let Some(index) = matched else {
            return Err(StoreError::NotFound(format!("utilizador {identifier}")));
        };

        table.set_cell(index, COL_ESTADO, AccountStatus::Active.as_str().to_string())?;
        self.store.write_table(&table).await
    }
}

fn parse_credential(table: &Table, row: &[String]) -> Result<Credential, StoreError> {
    let nivel: Role = table
        .cell(row, COL_NIVEL)?
        .parse()
        .map_err(|e| StoreError::Data {
            worksheet: USERS_WORKSHEET,
            detail: format!("{e}"),
        })?;

    let estado = AccountStatus::parse(table.cell(row, COL_ESTADO)?).map_err(|e| StoreError::Data {
        worksheet: USERS_WORKSHEET,
        detail: format!("{e}"),
    })?;

    let email_cell = table.cell(row, COL_EMAIL)?;
    let email = if email_cell.trim().is_empty() {
        None
    } else {
        Some(Email::parse(email_cell).map_err(|e| StoreError::Data {
            worksheet: USERS_WORKSHEET,
            detail: format!("invalid email: {e}"),
        })?)
    };

    Ok(Credential {
        utilizador: table.cell(row, COL_UTILIZADOR)?.to_string(),
        senha: table.cell(row, COL_SENHA)?.to_string(),
        nivel,
        estado,
        email,
    })
}

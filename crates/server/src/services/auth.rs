//! Authentication: login, self-registration, and account approval.
//!
//! All identifier comparisons go through the canonical normalization in
//! `validade-core`; secrets compare byte-exact. Store failures keep their
//! own error variant so "the user worksheet is unreadable" is never
//! reported as "wrong password".

use thiserror::Error;
use validade_core::{AccountStatus, Email, EmailError, Identifier};

use crate::models::CurrentUser;
use crate::store::{Store, StoreError};

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier or wrong secret. One variant for both, so a
    /// response cannot reveal which identifiers exist.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but has not been approved yet.
    #[error("account pending approval")]
    AccountPending,

    /// Empty identifier or secret; rejected before any store call.
    #[error("identifier and secret are required")]
    MissingInput,

    /// Malformed email on registration; rejected before any store call.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Registration for an identifier that already exists.
    #[error("identifier already registered")]
    AlreadyRegistered,

    /// The credential store itself failed; distinct from a mismatch.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validate credentials against the user worksheet.
///
/// # Errors
///
/// [`AuthError::MissingInput`] for empty input (no store call is made);
/// [`AuthError::InvalidCredentials`] for unknown identifiers or a wrong
/// secret; [`AuthError::AccountPending`] for unapproved accounts;
/// [`AuthError::Store`] when the worksheet cannot be read.
pub async fn login(store: &Store, utilizador: &str, senha: &str) -> Result<CurrentUser, AuthError> {
    let identifier = Identifier::new(utilizador);
    if identifier.is_empty() || senha.is_empty() {
        return Err(AuthError::MissingInput);
    }

    let credential = store
        .users()
        .find_by_identifier(&identifier)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !credential.secret_matches(senha) {
        return Err(AuthError::InvalidCredentials);
    }

    if credential.estado == AccountStatus::Pending {
        return Err(AuthError::AccountPending);
    }

    Ok(CurrentUser {
        utilizador: identifier,
        nome: credential.utilizador,
        nivel: credential.nivel,
    })
}

/// Self-register an account; it stays `pendente` until approved.
///
/// The email is validated structurally before the store is touched.
///
/// # Errors
///
/// [`AuthError::MissingInput`] / [`AuthError::InvalidEmail`] for bad input;
/// [`AuthError::AlreadyRegistered`] when the normalized identifier exists;
/// [`AuthError::Store`] for store failures.
pub async fn register(
    store: &Store,
    utilizador: &str,
    email: &str,
    senha: &str,
) -> Result<(), AuthError> {
    let identifier = Identifier::new(utilizador);
    if identifier.is_empty() || senha.is_empty() {
        return Err(AuthError::MissingInput);
    }
    let email = Email::parse(email)?;

    match store.users().register(utilizador, &email, senha).await {
        Ok(()) => Ok(()),
        Err(StoreError::Conflict(_)) => Err(AuthError::AlreadyRegistered),
        Err(other) => Err(AuthError::Store(other)),
    }
}

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding. Route handlers that do not redirect on failure
//! return `Result<T, AppError>`.
//!
//! Store connectivity/schema failures map to 502 with a generic banner,
//! credential mismatches map to 401, and malformed input maps to 400.
//! A broken worksheet is never reported as a wrong password.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::{AuthError, ReportError};
use crate::store::StoreError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The tabular store failed or its schema is broken.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Report delivery failed.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when this error means the external store itself failed.
    fn is_store_failure(&self) -> bool {
        match self {
            Self::Store(e) => e.is_store_failure(),
            Self::Auth(AuthError::Store(e)) => e.is_store_failure(),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if self.is_store_failure() || matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = if self.is_store_failure() {
            StatusCode::BAD_GATEWAY
        } else {
            match &self {
                Self::Store(StoreError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
                Self::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
                Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                Self::Auth(err) => match err {
                    AuthError::InvalidCredentials | AuthError::AccountPending => {
                        StatusCode::UNAUTHORIZED
                    }
                    AuthError::AlreadyRegistered => StatusCode::CONFLICT,
                    AuthError::MissingInput | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                    AuthError::Store(_) => StatusCode::BAD_GATEWAY,
                },
                Self::Report(err) => match err {
                    ReportError::NoRecipients | ReportError::InvalidRecipient(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    _ => StatusCode::BAD_GATEWAY,
                },
                Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                Self::Forbidden(_) => StatusCode::FORBIDDEN,
                Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            }
        };

        // Don't expose internal error details to clients
        let message = if self.is_store_failure() {
            "Erro de ligação ao armazenamento externo. Tente novamente.".to_string()
        } else {
            match &self {
                Self::Store(_) | Self::Internal(_) => "Erro interno".to_string(),
                Self::Auth(err) => match err {
                    AuthError::InvalidCredentials => "Credenciais incorretas".to_string(),
                    AuthError::AccountPending => "Conta pendente de aprovação".to_string(),
                    AuthError::MissingInput => "Preencha todos os campos".to_string(),
                    AuthError::InvalidEmail(_) => "Email inválido".to_string(),
                    AuthError::AlreadyRegistered => "Utilizador já registado".to_string(),
                    AuthError::Store(_) => {
                        "Erro de ligação ao armazenamento externo. Tente novamente.".to_string()
                    }
                },
                Self::Report(err) => match err {
                    ReportError::NoRecipients => "Indique pelo menos um email".to_string(),
                    ReportError::InvalidRecipient(addr) => format!("Email inválido: {addr}"),
                    _ => "Falha no envio do relatório".to_string(),
                },
                _ => self.to_string(),
            }
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::SheetsError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("produto".to_string());
        assert_eq!(err.to_string(), "not found: produto");

        let err = AppError::BadRequest("data inválida".to_string());
        assert_eq!(err.to_string(), "bad request: data inválida");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("x".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("x".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_failure_maps_to_bad_gateway() {
        let err = AppError::Store(StoreError::Sheets(SheetsError::WorksheetNotFound(
            "utilizadores".to_string(),
        )));
        assert_eq!(get_status(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_store_failure_inside_auth_is_not_unauthorized() {
        // A broken worksheet must never read as "wrong password".
        let err = AppError::Auth(AuthError::Store(StoreError::EmptyWorksheet("utilizadores")));
        assert_eq!(get_status(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_credential_mismatch_is_unauthorized() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::AccountPending)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_malformed_input_is_bad_request() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::MissingInput)),
            StatusCode::BAD_REQUEST
        );
    }
}

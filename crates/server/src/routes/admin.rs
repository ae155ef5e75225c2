//! Administration route handlers: pending-account approval.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use validade_core::Identifier;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::auth::MessageQuery;
use crate::state::AppState;
use crate::store::StoreError;

/// Pending account display data.
pub struct PendingView {
    pub utilizador: String,
    pub email: String,
}

/// Administration page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub nome: String,
    pub pending: Vec<PendingView>,
    pub error: String,
    pub success: String,
}

/// Approval form data.
#[derive(Debug, Deserialize)]
pub struct ApproveForm {
    pub utilizador: String,
}

fn error_message(code: &str) -> &'static str {
    match code {
        "naoencontrado" => "Utilizador não encontrado.",
        _ => "Ocorreu um erro. Tente novamente.",
    }
}

fn success_message(code: &str) -> &'static str {
    match code {
        "aprovado" => "Conta aprovada.",
        _ => "Operação concluída.",
    }
}

/// Display pending accounts. Admin only.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<AdminTemplate> {
    let pending = state.store().users().list_pending().await?;

    let pending = pending
        .into_iter()
        .map(|c| PendingView {
            utilizador: c.utilizador,
            email: c.email.map(|e| e.to_string()).unwrap_or_default(),
        })
        .collect();

    Ok(AdminTemplate {
        nome: user.nome,
        pending,
        error: query
            .error
            .as_deref()
            .map(error_message)
            .unwrap_or_default()
            .to_string(),
        success: query
            .success
            .as_deref()
            .map(success_message)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Approve a pending account. Admin only.
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Form(form): Form<ApproveForm>,
) -> Result<Response> {
    let identifier = Identifier::new(&form.utilizador);
    if identifier.is_empty() {
        return Err(AppError::BadRequest("Indique o utilizador".to_string()));
    }

    match state.store().users().approve(&identifier).await {
        Ok(()) => {
            tracing::info!(utilizador = %identifier, "account approved");
            Ok(Redirect::to("/admin?success=aprovado").into_response())
        }
        Err(StoreError::NotFound(_)) => {
            Ok(Redirect::to("/admin?error=naoencontrado").into_response())
        }
        Err(e) => Err(AppError::Store(e)),
    }
}

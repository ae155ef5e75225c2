//! Expiry-record route handlers: the main page of the application.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use validade_core::{ExpiryRecord, ExpiryStatus};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::auth::MessageQuery;
use crate::services::ReportOutcome;
use crate::state::AppState;
use crate::store::{DATE_FORMAT, TIME_FORMAT};

// =============================================================================
// View Types
// =============================================================================

/// Record display data for templates. Dates come preformatted.
pub struct RecordView {
    pub produto: String,
    pub data_validade: String,
    pub hora_registo: String,
    pub registado_por: String,
    pub estado: &'static str,
    pub classe: &'static str,
}

/// Product option for the submission form.
pub struct ProductOption {
    pub nome: String,
}

/// Record list page template.
#[derive(Template, WebTemplate)]
#[template(path = "records/index.html")]
pub struct RecordsTemplate {
    pub nome: String,
    pub is_admin: bool,
    pub records: Vec<RecordView>,
    pub products: Vec<ProductOption>,
    pub error: String,
    pub success: String,
}

// =============================================================================
// Form Types
// =============================================================================

/// Expiry record submission form.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    pub produto: String,
    pub data_validade: String,
    pub hora_registo: Option<String>,
}

/// Report submission form.
#[derive(Debug, Deserialize)]
pub struct ReportForm {
    pub destinatarios: String,
}

fn success_message(code: &str) -> &'static str {
    match code {
        "registado" => "Registo adicionado.",
        "relatorio" => "Relatório enviado.",
        "relatorio_log" => "Relatório gerado (modo de teste: ver logs do servidor).",
        _ => "Operação concluída.",
    }
}

const fn status_class(status: ExpiryStatus) -> &'static str {
    match status {
        ExpiryStatus::Valid => "valido",
        ExpiryStatus::ExpiringSoon => "a-expirar",
        ExpiryStatus::Expired => "caducado",
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the record list with derived expiry status.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<RecordsTemplate> {
    let records = state.store().records().list().await?;
    let products = state.store().products().list().await?;
    let today = Utc::now().date_naive();

    let records = records
        .iter()
        .map(|r| {
            let status = r.status(today);
            RecordView {
                produto: r.produto.clone(),
                data_validade: r.data_validade.format("%d/%m/%Y").to_string(),
                hora_registo: r
                    .hora_registo
                    .map(|h| h.format(TIME_FORMAT).to_string())
                    .unwrap_or_default(),
                registado_por: r.registado_por.clone(),
                estado: status.label(),
                classe: status_class(status),
            }
        })
        .collect();

    let products = products
        .iter()
        .map(|p| ProductOption {
            nome: p.nome.clone(),
        })
        .collect();

    Ok(RecordsTemplate {
        nome: user.nome,
        is_admin: user.is_admin(),
        records,
        products,
        error: query.error.as_deref().unwrap_or_default().to_string(),
        success: query
            .success
            .as_deref()
            .map(success_message)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Append an expiry record.
///
/// Input is validated before the store is touched; the append itself runs
/// under the store's writer lock.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<RecordForm>,
) -> Result<Response> {
    let produto = form.produto.trim();
    if produto.is_empty() {
        return Err(AppError::BadRequest("Escolha um produto".to_string()));
    }

    let data_validade = NaiveDate::parse_from_str(form.data_validade.trim(), DATE_FORMAT)
        .map_err(|_| AppError::BadRequest(format!("Data inválida: {}", form.data_validade)))?;

    let hora_registo = match form
        .hora_registo
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
    {
        Some(h) => Some(
            NaiveTime::parse_from_str(h, TIME_FORMAT)
                .map_err(|_| AppError::BadRequest(format!("Hora inválida: {h}")))?,
        ),
        None => None,
    };

    let record = ExpiryRecord {
        produto: produto.to_string(),
        data_validade,
        hora_registo,
        registado_por: user.utilizador.to_string(),
        registado_em: Utc::now(),
    };

    state.store().records().append(&record).await?;
    tracing::info!(produto, "expiry record appended");

    Ok(Redirect::to("/validades?success=registado").into_response())
}

/// Email a report of the current records.
pub async fn send_report(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<ReportForm>,
) -> Result<Response> {
    let records = state.store().records().list().await?;
    let today = Utc::now().date_naive();

    let outcome = state
        .mailer()
        .send_report(&form.destinatarios, &records, today)
        .await?;

    let code = match outcome {
        ReportOutcome::Sent { .. } => "relatorio",
        ReportOutcome::Logged => "relatorio_log",
    };
    Ok(Redirect::to(&format!("/validades?success={code}")).into_response())
}

//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use validade_core::Product;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::routes::auth::MessageQuery;
use crate::state::AppState;

/// Product display data for templates.
pub struct ProductView {
    pub nome: String,
    pub imagem_url: String,
    pub tempo_vida_dias: String,
    pub descricao: String,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub nome: String,
    pub is_admin: bool,
    pub products: Vec<ProductView>,
    pub error: String,
    pub success: String,
}

/// Product creation form (admin only).
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub nome: String,
    pub imagem_url: String,
    pub tempo_vida_dias: Option<String>,
    pub descricao: Option<String>,
}

fn success_message(code: &str) -> &'static str {
    match code {
        "criado" => "Produto criado.",
        _ => "Operação concluída.",
    }
}

/// Display the product list. The creation form renders for admins only.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<ProductsTemplate> {
    let products = state.store().products().list().await?;

    let products = products
        .iter()
        .map(|p| ProductView {
            nome: p.nome.clone(),
            imagem_url: p.imagem_url.clone(),
            tempo_vida_dias: p
                .tempo_vida_dias
                .map(|d| format!("{d} dias"))
                .unwrap_or_default(),
            descricao: p.descricao.clone().unwrap_or_default(),
        })
        .collect();

    Ok(ProductsTemplate {
        nome: user.nome,
        is_admin: user.is_admin(),
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

/// Create a product. Admin only.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let nome = form.nome.trim();
    if nome.is_empty() {
        return Err(AppError::BadRequest("Indique o nome do produto".to_string()));
    }

    let tempo_vida_dias = match form
        .tempo_vida_dias
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        Some(d) => Some(d.parse::<u32>().map_err(|_| {
            AppError::BadRequest(format!("Tempo de vida inválido: {d}"))
        })?),
        None => None,
    };

    let product = Product {
        nome: nome.to_string(),
        imagem_url: form.imagem_url.trim().to_string(),
        tempo_vida_dias,
        descricao: form
            .descricao
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ToString::to_string),
    };

    state.store().products().add(&product).await?;
    tracing::info!(nome, "product created");

    Ok(Redirect::to("/produtos?success=criado").into_response())
}

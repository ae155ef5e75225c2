//! Authentication route handlers.
//!
//! Handles login, self-registration, and logout against the credential
//! worksheet. Failures redirect back with an error code in the query
//! string; the page maps codes to banner text. The code for a store
//! failure (`ligacao`) is distinct from a credential mismatch
//! (`credenciais`) - the two must never blur together.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::services::{AuthError, auth};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub utilizador: String,
    pub senha: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub utilizador: String,
    pub email: String,
    pub senha: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: String,
    pub success: String,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: String,
}

// =============================================================================
// Banner Messages
// =============================================================================

fn error_message(code: &str) -> &'static str {
    match code {
        "credenciais" => "Credenciais incorretas.",
        "pendente" => "Conta pendente de aprovação por um administrador.",
        "ligacao" => "Erro de ligação ao armazenamento externo. Tente novamente.",
        "campos" => "Preencha todos os campos.",
        "email" => "Email inválido.",
        "existe" => "Esse utilizador já está registado.",
        "sessao" => "Não foi possível iniciar a sessão. Tente novamente.",
        _ => "Ocorreu um erro. Tente novamente.",
    }
}

fn success_message(code: &str) -> &'static str {
    match code {
        "registado" => "Registo criado. Aguarde aprovação de um administrador.",
        _ => "Operação concluída.",
    }
}

fn error_code(err: &AuthError) -> &'static str {
    match err {
        AuthError::InvalidCredentials => "credenciais",
        AuthError::AccountPending => "pendente",
        AuthError::MissingInput => "campos",
        AuthError::InvalidEmail(_) => "email",
        AuthError::AlreadyRegistered => "existe",
        AuthError::Store(_) => "ligacao",
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
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
    }
}

/// Handle login form submission.
///
/// Validates credentials against the user worksheet and stores the user in
/// the session on success.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match auth::login(state.store(), &form.utilizador, &form.senha).await {
        Ok(user) => {
            if let Err(e) = set_current_user(&session, &user).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth/login?error=sessao").into_response();
            }
            Redirect::to("/validades").into_response()
        }
        Err(e) => {
            if matches!(e, AuthError::Store(_)) {
                tracing::error!("Login blocked by store failure: {}", e);
            } else {
                tracing::warn!("Login failed: {}", e);
            }
            Redirect::to(&format!("/auth/login?error={}", error_code(&e))).into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: query
            .error
            .as_deref()
            .map(error_message)
            .unwrap_or_default()
            .to_string(),
    }
}

/// Handle registration form submission.
///
/// Creates a `pendente` account; an administrator must approve it before
/// the first login.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    match auth::register(state.store(), &form.utilizador, &form.email, &form.senha).await {
        Ok(()) => Redirect::to("/auth/login?success=registado").into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            Redirect::to(&format!("/auth/register?error={}", error_code(&e))).into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the user and destroys the whole session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/auth/login").into_response()
}

//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to records (or login)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (probes the store)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Registration page
//! POST /auth/register          - Self-registration (pending approval)
//! POST /auth/logout            - Logout action
//!
//! # Expiry records (requires auth)
//! GET  /validades              - Record list with derived status
//! POST /validades              - Append an expiry record
//! POST /validades/relatorio    - Email a report of current records
//!
//! # Products (requires auth; creation requires admin)
//! GET  /produtos               - Product list
//! POST /produtos               - Create product (admin)
//!
//! # Administration (requires admin)
//! GET  /admin                  - Pending accounts
//! POST /admin/aprovar          - Approve a pending account
//! ```

pub mod admin;
pub mod auth;
pub mod home;
pub mod products;
pub mod records;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the expiry-record routes router.
pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(records::index).post(records::create))
        .route("/relatorio", post(records::send_report))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", get(products::index).post(products::create))
}

/// Create the administration routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/aprovar", post(admin::approve))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/auth", auth_routes())
        .nest("/validades", record_routes())
        .nest("/produtos", product_routes())
        .nest("/admin", admin_routes())
}

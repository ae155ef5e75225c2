//! Integration test harness for Validade Control.
//!
//! Tests run the real application router against an in-process mock of the
//! tabular store's HTTP API. Both listen on ephemeral loopback ports, so
//! every test owns an isolated store and an isolated session store.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = spawn_mock_store(seed_worksheets()).await;
//! let app = spawn_app(store).await;
//! let client = client();
//!
//! let resp = login(&client, &app, "ricardo", "123").await;
//! assert_eq!(resp.status(), 303);
//! ```

#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use secrecy::SecretString;
use tokio::sync::Mutex;

use validade_server::config::{ServerConfig, SheetsConfig};
use validade_server::state::AppState;

/// Shared worksheet storage for the mock store.
pub type Worksheets = Arc<Mutex<HashMap<String, Vec<Vec<String>>>>>;

#[derive(Clone)]
struct MockStoreState {
    sheets: Worksheets,
}

/// A running mock tabular-store server.
pub struct MockStore {
    /// Endpoint to point `SheetsConfig` at.
    pub endpoint: String,
    /// Live handle to the worksheet data; tests inspect and mutate freely.
    pub sheets: Worksheets,
}

/// Start a mock tabular store with the given worksheets.
///
/// Implements the same contract as the real store: full-table GET, and PUT
/// replaces the whole worksheet. Unknown worksheets return 404. Each
/// request is atomic, which is exactly what makes interleaved
/// read-modify-write cycles lose rows.
pub async fn spawn_mock_store(initial: HashMap<String, Vec<Vec<String>>>) -> MockStore {
    let sheets: Worksheets = Arc::new(Mutex::new(initial));
    let state = MockStoreState {
        sheets: Arc::clone(&sheets),
    };

    let app = Router::new()
        .route(
            "/api/documents/{document}/worksheets/{worksheet}/values",
            get(read_values).put(write_values),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock store");
    let addr = listener.local_addr().expect("mock store addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock store server");
    });

    MockStore {
        endpoint: format!("http://{addr}/api"),
        sheets,
    }
}

async fn read_values(
    State(state): State<MockStoreState>,
    Path((_document, worksheet)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let sheets = state.sheets.lock().await;
    sheets
        .get(&worksheet)
        .map(|values| Json(serde_json::json!({ "values": values })))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn write_values(
    State(state): State<MockStoreState>,
    Path((_document, worksheet)): Path<(String, String)>,
    Json(payload): Json<serde_json::Value>,
) -> Result<StatusCode, StatusCode> {
    let values: Vec<Vec<String>> =
        serde_json::from_value(payload.get("values").cloned().unwrap_or_default())
            .map_err(|_| StatusCode::BAD_REQUEST)?;

    let mut sheets = state.sheets.lock().await;
    match sheets.get_mut(&worksheet) {
        Some(slot) => {
            *slot = values;
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// A running application instance.
pub struct TestApp {
    /// Base URL of the application server.
    pub base_url: String,
    /// The mock store behind it.
    pub store: MockStore,
}

/// Tabular-store config pointing at a mock endpoint.
#[must_use]
pub fn sheets_config(endpoint: &str) -> SheetsConfig {
    SheetsConfig {
        endpoint: endpoint.to_string(),
        document: "doc-test".to_string(),
        api_token: SecretString::from("tok-test-9f3k2m"),
    }
}

/// Start the real application against a mock store.
pub async fn spawn_app(store: MockStore) -> TestApp {
    let config = ServerConfig {
        host: "127.0.0.1".parse().expect("host"),
        port: 0,
        base_url: "http://localhost".to_string(),
        sheets: sheets_config(&store.endpoint),
        smtp: None,
        sentry_dsn: None,
    };

    let state = AppState::new(config).expect("app state");
    let app = validade_server::app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind app");
    let addr = listener.local_addr().expect("app addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("app server");
    });

    TestApp {
        base_url: format!("http://{addr}"),
        store,
    }
}

/// HTTP client with a cookie store and redirects disabled, so tests can
/// assert on `Location` headers.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

/// Submit the login form.
pub async fn login(
    client: &reqwest::Client,
    app: &TestApp,
    utilizador: &str,
    senha: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/auth/login", app.base_url))
        .form(&[("utilizador", utilizador), ("senha", senha)])
        .send()
        .await
        .expect("login request")
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// Seed Data
// =============================================================================

fn to_rows(header: &[&str], rows: &[&[&str]]) -> Vec<Vec<String>> {
    std::iter::once(header.iter().map(ToString::to_string).collect())
        .chain(
            rows.iter()
                .map(|row| row.iter().map(ToString::to_string).collect()),
        )
        .collect()
}

/// A `utilizadores` worksheet with the given rows
/// (`utilizador`, `senha`, `nivel`, `estado`, `email`).
#[must_use]
pub fn users_sheet(rows: &[&[&str]]) -> Vec<Vec<String>> {
    to_rows(&["utilizador", "senha", "nivel", "estado", "email"], rows)
}

/// A `produtos` worksheet with the given rows
/// (`nome`, `imagem_url`, `tempo_vida_dias`, `descricao`).
#[must_use]
pub fn products_sheet(rows: &[&[&str]]) -> Vec<Vec<String>> {
    to_rows(&["nome", "imagem_url", "tempo_vida_dias", "descricao"], rows)
}

/// A `registos` worksheet with the given rows
/// (`produto`, `data_validade`, `hora_registo`, `registado_por`,
/// `registado_em`).
#[must_use]
pub fn records_sheet(rows: &[&[&str]]) -> Vec<Vec<String>> {
    to_rows(
        &[
            "produto",
            "data_validade",
            "hora_registo",
            "registado_por",
            "registado_em",
        ],
        rows,
    )
}

/// Standard three-worksheet seed: one active admin (`ricardo`/`123`), one
/// active user (`maria`/`abc`), one product, no records.
#[must_use]
pub fn seed_worksheets() -> HashMap<String, Vec<Vec<String>>> {
    let mut sheets = HashMap::new();
    sheets.insert(
        "utilizadores".to_string(),
        users_sheet(&[
            &["ricardo", "123", "admin", "ativo", "ricardo@exemplo.pt"],
            &["maria", "abc", "user", "ativo", "maria@exemplo.pt"],
        ]),
    );
    sheets.insert(
        "produtos".to_string(),
        products_sheet(&[&["Milk", "https://cdn.exemplo.pt/milk.jpg", "7", ""]]),
    );
    sheets.insert("registos".to_string(), records_sheet(&[]));
    sheets
}

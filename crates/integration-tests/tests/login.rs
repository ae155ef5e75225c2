//! Login flow: normalization, failure modes, and the distinction between
//! credential mismatches and store failures.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::StatusCode;
use tokio::sync::Mutex;
use validade_integration_tests::{
    MockStore, client, location, login, seed_worksheets, spawn_app, spawn_mock_store, users_sheet,
};

#[tokio::test]
async fn login_with_normalized_identifier_succeeds() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();

    // Padded, uppercased identifier still matches the stored "ricardo".
    let resp = login(&client, &app, "RICARDO ", "123").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/validades");

    // The stored role came along: ricardo is an admin.
    let page = client
        .get(format!("{}/admin", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_with_wrong_secret_fails() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();

    let resp = login(&client, &app, "ricardo", "124").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?error=credenciais");
}

#[tokio::test]
async fn login_secret_is_not_normalized() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();

    // Identifiers tolerate padding; secrets compare byte-exact.
    let resp = login(&client, &app, "ricardo", " 123").await;
    assert_eq!(location(&resp), "/auth/login?error=credenciais");
}

#[tokio::test]
async fn login_with_unknown_identifier_fails() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();

    let resp = login(&client, &app, "intruso", "123").await;
    assert_eq!(location(&resp), "/auth/login?error=credenciais");
}

#[tokio::test]
async fn login_with_empty_fields_is_rejected_before_any_store_call() {
    // No worksheets at all: if validation ran after the store call this
    // would surface as a connection error instead.
    let store = spawn_mock_store(HashMap::new()).await;
    let app = spawn_app(store).await;
    let client = client();

    let resp = login(&client, &app, "ricardo", "").await;
    assert_eq!(location(&resp), "/auth/login?error=campos");
}

#[tokio::test]
async fn unreachable_store_is_a_connection_error_not_bad_credentials() {
    // Point the app at a port nothing listens on.
    let dead_store = MockStore {
        endpoint: "http://127.0.0.1:9/api".to_string(),
        sheets: Arc::new(Mutex::new(HashMap::new())),
    };
    let app = spawn_app(dead_store).await;
    let client = client();

    let resp = login(&client, &app, "ricardo", "123").await;
    assert_eq!(location(&resp), "/auth/login?error=ligacao");
}

#[tokio::test]
async fn missing_column_is_a_connection_error_not_bad_credentials() {
    // A users worksheet without the "senha" column is a schema problem.
    let mut sheets = seed_worksheets();
    sheets.insert(
        "utilizadores".to_string(),
        vec![
            vec!["utilizador".to_string(), "nivel".to_string()],
            vec!["ricardo".to_string(), "admin".to_string()],
        ],
    );
    let app = spawn_app(spawn_mock_store(sheets).await).await;
    let client = client();

    let resp = login(&client, &app, "ricardo", "123").await;
    assert_eq!(location(&resp), "/auth/login?error=ligacao");
}

#[tokio::test]
async fn protected_pages_redirect_anonymous_users_to_login() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();

    for path in ["/validades", "/produtos", "/admin"] {
        let resp = client
            .get(format!("{}{path}", app.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(location(&resp), "/auth/login", "path {path}");
    }
}

#[tokio::test]
async fn logout_clears_the_session() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();

    login(&client, &app, "maria", "abc").await;
    let page = client
        .get(format!("{}/validades", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);

    let resp = client
        .post(format!("{}/auth/logout", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/auth/login");

    let page = client
        .get(format!("{}/validades", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn empty_status_cell_is_treated_as_active() {
    // Accounts created before the estado column carried data can log in.
    let mut sheets = seed_worksheets();
    sheets.insert(
        "utilizadores".to_string(),
        users_sheet(&[&["antigo", "xyz", "user", "", ""]]),
    );
    let app = spawn_app(spawn_mock_store(sheets).await).await;
    let client = client();

    let resp = login(&client, &app, "antigo", "xyz").await;
    assert_eq!(location(&resp), "/validades");
}

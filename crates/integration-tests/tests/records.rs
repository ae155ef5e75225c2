//! Expiry-record workflow: listing, appending, validation, and reports.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use validade_integration_tests::{
    client, location, login, records_sheet, seed_worksheets, spawn_app, spawn_mock_store,
};

async fn append_record(
    client: &reqwest::Client,
    base_url: &str,
    produto: &str,
    data: &str,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/validades"))
        .form(&[("produto", produto), ("data_validade", data)])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn submitting_an_expiry_adds_exactly_one_row() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();
    login(&client, &app, "maria", "abc").await;

    let resp = append_record(&client, &app.base_url, "Milk", "2025-01-01").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/validades?success=registado");

    let sheets = app.store.sheets.lock().await;
    let registos = sheets.get("registos").unwrap();
    // Header plus exactly one new row.
    assert_eq!(registos.len(), 2);
    assert_eq!(registos[1][0], "Milk");
    assert_eq!(registos[1][1], "2025-01-01");
    assert_eq!(registos[1][3], "maria");
}

#[tokio::test]
async fn sequential_appends_keep_all_rows_in_order() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();
    login(&client, &app, "maria", "abc").await;

    for (produto, data) in [
        ("Milk", "2025-01-01"),
        ("Bread", "2025-02-01"),
        ("Sauce", "2025-03-01"),
    ] {
        let resp = append_record(&client, &app.base_url, produto, data).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    let sheets = app.store.sheets.lock().await;
    let registos = sheets.get("registos").unwrap();
    assert_eq!(registos.len(), 4);
    let produtos: Vec<&str> = registos[1..].iter().map(|r| r[0].as_str()).collect();
    assert_eq!(produtos, vec!["Milk", "Bread", "Sauce"]);
}

#[tokio::test]
async fn record_page_shows_derived_status() {
    let mut sheets = seed_worksheets();
    sheets.insert(
        "registos".to_string(),
        records_sheet(&[
            // Long expired and far in the future.
            &["Milk", "2020-01-01", "", "maria", "2020-01-01T08:00:00+00:00"],
            &["Bread", "2099-01-01", "10:30", "maria", "2024-01-01T08:00:00+00:00"],
        ]),
    );
    let app = spawn_app(spawn_mock_store(sheets).await).await;
    let client = client();
    login(&client, &app, "maria", "abc").await;

    let page = client
        .get(format!("{}/validades", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    let body = page.text().await.unwrap();
    assert!(body.contains("Caducado"));
    assert!(body.contains("OK"));
    assert!(body.contains("10:30"));
}

#[tokio::test]
async fn invalid_date_is_rejected_before_any_store_write() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();
    login(&client, &app, "maria", "abc").await;

    let resp = append_record(&client, &app.base_url, "Milk", "not-a-date").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let sheets = app.store.sheets.lock().await;
    assert_eq!(sheets.get("registos").unwrap().len(), 1, "no row written");
}

#[tokio::test]
async fn record_listing_fails_with_bad_gateway_when_store_is_broken() {
    let mut sheets = seed_worksheets();
    sheets.remove("registos");
    let app = spawn_app(spawn_mock_store(sheets).await).await;
    let client = client();
    login(&client, &app, "maria", "abc").await;

    let page = client
        .get(format!("{}/validades", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn report_without_smtp_runs_in_mock_mode() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();
    login(&client, &app, "maria", "abc").await;

    let resp = client
        .post(format!("{}/validades/relatorio", app.base_url))
        .form(&[("destinatarios", "chefe@exemplo.pt, loja@exemplo.pt")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/validades?success=relatorio_log");
}

#[tokio::test]
async fn report_with_invalid_recipient_is_rejected() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();
    login(&client, &app, "maria", "abc").await;

    let resp = client
        .post(format!("{}/validades/relatorio", app.base_url))
        .form(&[("destinatarios", "chefe@exemplo.pt, not-an-email")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

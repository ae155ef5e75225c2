//! The lost-update race: demonstrated on the raw client, eliminated by the
//! serialized append path.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use validade_integration_tests::{
    client, login, seed_worksheets, sheets_config, spawn_app, spawn_mock_store,
};
use validade_server::sheets::SheetsClient;

fn row(produto: &str) -> Vec<String> {
    vec![
        produto.to_string(),
        "2025-01-01".to_string(),
        String::new(),
        "maria".to_string(),
        "2024-12-01T08:00:00+00:00".to_string(),
    ]
}

#[tokio::test]
async fn interleaved_raw_appends_lose_a_row() {
    let store = spawn_mock_store(seed_worksheets()).await;
    let sheets = SheetsClient::new(&sheets_config(&store.endpoint)).unwrap();

    // Two writers snapshot the same state...
    let snapshot_a = sheets.read_values("registos").await.unwrap();
    let snapshot_b = sheets.read_values("registos").await.unwrap();

    // ...each appends its own row to its own snapshot...
    let mut a = snapshot_a.clone();
    a.push(row("Milk"));
    let mut b = snapshot_b.clone();
    b.push(row("Bread"));

    // ...and the second write erases the first one's row.
    sheets.write_values("registos", &a).await.unwrap();
    sheets.write_values("registos", &b).await.unwrap();

    let final_rows = store.sheets.lock().await.get("registos").unwrap().clone();
    assert_eq!(final_rows.len(), 2, "one of the two appended rows was lost");
    assert_eq!(final_rows[1][0], "Bread");
    assert!(!final_rows.iter().any(|r| r.first().map(String::as_str) == Some("Milk")));
}

#[tokio::test]
async fn concurrent_appends_through_the_app_lose_nothing() {
    let app = spawn_app(spawn_mock_store(seed_worksheets()).await).await;
    let client = client();
    login(&client, &app, "maria", "abc").await;

    let post = |produto: &'static str| {
        let client = client.clone();
        let url = format!("{}/validades", app.base_url);
        async move {
            client
                .post(url)
                .form(&[("produto", produto), ("data_validade", "2025-01-01")])
                .send()
                .await
                .unwrap()
        }
    };

    // Same interleaving pressure as above, but the append path holds the
    // writer lock across its read-modify-write.
    let (first, second) = tokio::join!(post("Milk"), post("Bread"));
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(second.status(), StatusCode::SEE_OTHER);

    let final_rows = app.store.sheets.lock().await.get("registos").unwrap().clone();
    assert_eq!(final_rows.len(), 3, "both appended rows survived");

    let mut produtos: Vec<&str> = final_rows[1..].iter().map(|r| r[0].as_str()).collect();
    produtos.sort_unstable();
    assert_eq!(produtos, vec!["Bread", "Milk"]);
}

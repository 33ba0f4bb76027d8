mod common;

use serde_json::{Value, json};

#[tokio::test]
async fn test_clean_smart_keeps_functional_params() {
    let app = common::create_test_app().await;
    let server = app.server();

    let response = server
        .post("/api/clean")
        .json(&json!({
            "url": "https://shop.example.com/item?id=9&utm_source=x&fbclid=y",
            "mode": "smart"
        }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["cleaned"], "https://shop.example.com/item?id=9");
    assert_eq!(json["changed"], true);
    assert_eq!(json["mode"], "smart");
}

#[tokio::test]
async fn test_clean_aggressive_drops_query_and_fragment() {
    let app = common::create_test_app().await;
    let server = app.server();

    let response = server
        .post("/api/clean")
        .json(&json!({
            "url": "https://example.com/a?id=9#section",
            "mode": "aggressive"
        }))
        .await;

    assert_eq!(response.json::<Value>()["cleaned"], "https://example.com/a");
}

#[tokio::test]
async fn test_clean_leaves_unparseable_input() {
    let app = common::create_test_app().await;
    let server = app.server();

    let response = server
        .post("/api/clean")
        .json(&json!({ "url": "not a url?utm_source=x" }))
        .await;

    let json = response.json::<Value>();
    assert_eq!(json["cleaned"], "not a url?utm_source=x");
    assert_eq!(json["changed"], false);
}

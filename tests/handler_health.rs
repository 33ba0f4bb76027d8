mod common;

use serde_json::Value;

#[tokio::test]
async fn test_health_reports_components() {
    let app = common::create_test_app().await;
    let server = app.server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert_eq!(json["checks"]["analytics_queue"]["message"], "Disabled");
    assert!(json["version"].is_string());
}

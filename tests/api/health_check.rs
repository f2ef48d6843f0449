use crate::helpers::TestApp;

#[tokio::test]
async fn health_check_reports_service_and_transport() {
    let test_app = TestApp::spawn_app().await;
    let client = reqwest::Client::new();
    let url = format!("{}/health", test_app.address);
    let response = client
        .get(url)
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], test_app.config.application.service_name.as_str());
    assert_eq!(body["transport"], "brevo");
    assert_eq!(body["transportConfigured"], true);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn ping_answers_pong() {
    let test_app = TestApp::spawn_app().await;
    let response = reqwest::get(format!("{}/ping", test_app.address))
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "pong");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn cross_origin_requests_are_allowed_from_any_origin() {
    let test_app = TestApp::spawn_app().await;
    let response = reqwest::Client::new()
        .get(format!("{}/ping", test_app.address))
        .header("Origin", "https://some-other-site.test")
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

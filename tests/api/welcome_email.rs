use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{error_message, TestApp};

async fn mock_email_api(test_app: &TestApp, status: u16) {
    Mock::given(path("/v3/smtp/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&test_app.email_server)
        .await;
}

#[tokio::test]
async fn welcome_email_returns_200_and_greets_the_subscriber() {
    let test_app = TestApp::spawn_app().await;
    mock_email_api(&test_app, 201).await;

    let response = test_app
        .post_welcome_email(serde_json::json!({ "email": "emily@poems.test", "name": "Emily" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let sent = test_app.sent_emails().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "emily@poems.test");
    assert_eq!(sent[0].subject, "Welcome to the Poetry Community!");
    assert!(sent[0].html.contains("Welcome to Poetry Community, Emily!"));
}

#[tokio::test]
async fn welcome_email_adds_a_new_subscriber_to_the_mailing_list() {
    let test_app = TestApp::spawn_app().await;
    mock_email_api(&test_app, 201).await;

    test_app
        .post_welcome_email(serde_json::json!({ "email": "emily@poems.test", "name": "Emily" }))
        .await;

    let entries = test_app.mailing_list.entries_for("emily@poems.test");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Emily");
    assert!(entries[0].subscribed);
}

#[tokio::test]
async fn welcome_email_without_name_stores_an_empty_name() {
    let test_app = TestApp::spawn_app().await;
    mock_email_api(&test_app, 201).await;

    let response = test_app
        .post_welcome_email(serde_json::json!({ "email": "reader@poems.test" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let entries = test_app.mailing_list.entries_for("reader@poems.test");
    assert_eq!(entries[0].name, "");

    let sent = test_app.sent_emails().await;
    assert!(sent[0].html.contains("Welcome to Poetry Community!"));
}

#[tokio::test]
async fn repeated_welcome_email_resubscribes_without_duplicating() {
    let test_app = TestApp::spawn_app().await;
    mock_email_api(&test_app, 201).await;
    test_app
        .mailing_list
        .seed("emily@poems.test", "Emily", false);

    let response = test_app
        .post_welcome_email(serde_json::json!({ "email": "emily@poems.test", "name": "Emily" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let entries = test_app.mailing_list.entries_for("emily@poems.test");
    assert_eq!(entries.len(), 1);
    assert!(entries[0].subscribed);
}

#[tokio::test]
async fn welcome_email_accepts_free_text_names_and_escapes_markup() {
    let test_app = TestApp::spawn_app().await;
    mock_email_api(&test_app, 201).await;

    let response = test_app
        .post_welcome_email(serde_json::json!({
            "email": "emily@poems.test",
            "name": "<b>Emily</b> (Em)"
        }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let sent = test_app.sent_emails().await;
    assert!(sent[0]
        .html
        .contains("Welcome to Poetry Community, &lt;b&gt;Emily&lt;/b&gt; (Em)!"));
    assert!(!sent[0].html.contains("<b>Emily</b>"));

    let entries = test_app.mailing_list.entries_for("emily@poems.test");
    assert_eq!(entries[0].name, "<b>Emily</b> (Em)");
}

#[tokio::test]
async fn welcome_email_returns_400_when_email_is_missing_or_invalid() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let test_cases = vec![
        (serde_json::json!({}), "missing body parameters"),
        (serde_json::json!({ "name": "Emily" }), "missing email"),
        (serde_json::json!({ "email": "  " }), "blank email"),
        (serde_json::json!({ "email": "poems.test" }), "invalid email"),
    ];

    for (invalid_body, error_message_case) in test_cases {
        let response = test_app.post_welcome_email(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message_case
        );
    }

    assert!(test_app.mailing_list.entries().is_empty());
}

#[tokio::test]
async fn welcome_email_reports_missing_email() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_welcome_email(serde_json::json!({ "name": "Emily" }))
        .await;

    assert_eq!(error_message(response).await, "Missing email");
}

#[tokio::test]
async fn welcome_email_returns_500_and_skips_the_mailing_list_when_sending_fails() {
    let test_app = TestApp::spawn_app().await;
    mock_email_api(&test_app, 500).await;

    let response = test_app
        .post_welcome_email(serde_json::json!({ "email": "emily@poems.test" }))
        .await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(error_message(response).await, "Failed to send welcome email");
    assert!(test_app.mailing_list.entries().is_empty());
}

#[tokio::test]
async fn welcome_email_returns_500_when_the_mailing_list_fails() {
    let test_app = TestApp::spawn_app().await;
    mock_email_api(&test_app, 201).await;
    test_app.mailing_list.fail_requests();

    let response = test_app
        .post_welcome_email(serde_json::json!({ "email": "emily@poems.test" }))
        .await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(error_message(response).await, "Failed to send welcome email");
}

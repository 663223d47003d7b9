use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{email_recipient, TestApp};

async fn mount_email_mock(test_app: &TestApp) {
    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;
}

#[tokio::test]
async fn subscribe_returns_200_when_body_is_valid() {
    let test_app = TestApp::spawn_app().await;
    mount_email_mock(&test_app).await;

    let response = test_app
        .post_subscribe(&json!({"email": "j@x.com", "name": "J"}))
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Response was not JSON.");

    assert_eq!(body["success"], true);
    assert_eq!(body["subscriber"]["email"], "j@x.com");
    assert_eq!(body["subscriber"]["name"], "J");
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    let test_app = TestApp::spawn_app().await;
    mount_email_mock(&test_app).await;

    test_app
        .post_subscribe(&json!({"email": "j@x.com", "name": "J"}))
        .await;

    let subscriber = test_app
        .fetch_subscriber("j@x.com")
        .await
        .expect("Subscriber was not stored.");

    assert_eq!(subscriber.email, "j@x.com");
    assert_eq!(subscriber.name.as_deref(), Some("J"));
    assert!(!subscriber.unsubscribed);
}

#[tokio::test]
async fn repeated_subscribe_leaves_a_single_row() {
    let test_app = TestApp::spawn_app().await;
    mount_email_mock(&test_app).await;

    let body = json!({"email": "j@x.com", "name": "J"});
    let first = test_app.post_subscribe(&body).await;
    let second = test_app.post_subscribe(&body).await;

    assert_eq!(200, first.status().as_u16());
    assert_eq!(200, second.status().as_u16());
    assert_eq!(1, test_app.subscriber_count().await);
}

#[tokio::test]
async fn subscribe_normalizes_email_case_and_whitespace() {
    let test_app = TestApp::spawn_app().await;
    mount_email_mock(&test_app).await;

    test_app
        .post_subscribe(&json!({"email": "A@Example.com"}))
        .await;
    test_app
        .post_subscribe(&json!({"email": " a@example.com "}))
        .await;

    assert_eq!(1, test_app.subscriber_count().await);

    let subscriber = test_app
        .fetch_subscriber("a@example.com")
        .await
        .expect("Subscriber was not stored.");

    assert_eq!(subscriber.email, "a@example.com");
}

#[tokio::test]
async fn subscribe_after_unsubscribe_reactivates_the_original_row() {
    let test_app = TestApp::spawn_app().await;
    mount_email_mock(&test_app).await;

    test_app
        .post_subscribe(&json!({"email": "j@x.com", "name": "J"}))
        .await;
    let original = test_app.fetch_subscriber("j@x.com").await.unwrap();

    test_app.post_unsubscribe(&json!({"email": "j@x.com"})).await;

    let response = test_app.post_subscribe(&json!({"email": "j@x.com"})).await;
    assert_eq!(200, response.status().as_u16());

    let reactivated = test_app.fetch_subscriber("j@x.com").await.unwrap();

    assert_eq!(1, test_app.subscriber_count().await);
    assert_eq!(original.id, reactivated.id);
    assert_eq!(original.subscribed_at, reactivated.subscribed_at);
    // Name survives a reactivation that did not provide one
    assert_eq!(reactivated.name.as_deref(), Some("J"));
    assert!(!reactivated.unsubscribed);
}

#[tokio::test]
async fn subscribe_returns_400_for_invalid_emails_and_stores_nothing() {
    let test_app = TestApp::spawn_app().await;

    let test_cases = vec![
        (json!({}), "missing email"),
        (json!({"email": ""}), "empty email"),
        (json!({"email": "notanemail"}), "email without @"),
        (json!({"email": "@x.com"}), "email without local part"),
        (json!({"name": "J"}), "name only"),
    ];

    for (invalid_body, description) in test_cases {
        let response = test_app.post_subscribe(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            description
        );

        let body: serde_json::Value = response.json().await.expect("Response was not JSON.");
        assert!(body["error"].is_string());
    }

    assert_eq!(0, test_app.subscriber_count().await);
}

#[tokio::test]
async fn subscribe_sends_a_welcome_and_an_admin_email() {
    let test_app = TestApp::spawn_app().await;
    mount_email_mock(&test_app).await;

    test_app
        .post_subscribe(&json!({"email": "j@x.com", "name": "J"}))
        .await;

    let requests = test_app.wait_for_email_requests(2).await;
    let recipients: Vec<String> = requests.iter().map(email_recipient).collect();
    let notify_email = test_app
        .config
        .email_client
        .notify_email
        .clone()
        .expect("Test configuration has no notification address.");

    assert_eq!(requests.len(), 2);
    assert!(recipients.contains(&"j@x.com".to_owned()));
    assert!(recipients.contains(&notify_email));
}

#[tokio::test]
async fn welcome_email_contains_an_unsubscribe_link() {
    let test_app = TestApp::spawn_app().await;
    mount_email_mock(&test_app).await;

    test_app
        .post_subscribe(&json!({"email": "j@x.com", "name": "J"}))
        .await;

    let requests = test_app.wait_for_email_requests(2).await;
    let welcome = requests
        .iter()
        .find(|request| email_recipient(request) == "j@x.com")
        .expect("No welcome email was sent.");
    let body: serde_json::Value = serde_json::from_slice(&welcome.body).unwrap();
    let html = body["content"][1]["value"].as_str().unwrap();

    let links: Vec<String> = linkify::LinkFinder::new()
        .links(html)
        .map(|link| link.as_str().to_owned())
        .collect();
    let unsubscribe_link = links
        .iter()
        .find(|link| link.contains("/unsubscribe"))
        .expect("Welcome email has no unsubscribe link.");

    assert!(unsubscribe_link.contains("email=j%40x.com"));
}

#[tokio::test]
async fn subscribe_succeeds_even_when_the_mail_service_is_down() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_subscribe(&json!({"email": "j@x.com", "name": "J"}))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(1, test_app.subscriber_count().await);
}

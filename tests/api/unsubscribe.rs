use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

async fn subscribe_test_address(test_app: &TestApp) {
    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;

    test_app
        .post_subscribe(&json!({"email": "j@x.com", "name": "J"}))
        .await;
}

#[tokio::test]
async fn unsubscribe_marks_the_subscriber_inactive() {
    let test_app = TestApp::spawn_app().await;
    subscribe_test_address(&test_app).await;

    let response = test_app.post_unsubscribe(&json!({"email": "j@x.com"})).await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Response was not JSON.");
    assert_eq!(body["success"], true);

    let subscriber = test_app.fetch_subscriber("j@x.com").await.unwrap();
    assert!(subscriber.unsubscribed);
}

#[tokio::test]
async fn unsubscribe_is_idempotent() {
    let test_app = TestApp::spawn_app().await;
    subscribe_test_address(&test_app).await;

    let first = test_app.post_unsubscribe(&json!({"email": "j@x.com"})).await;
    let second = test_app.post_unsubscribe(&json!({"email": "j@x.com"})).await;

    assert_eq!(200, first.status().as_u16());
    assert_eq!(200, second.status().as_u16());

    let subscriber = test_app.fetch_subscriber("j@x.com").await.unwrap();
    assert!(subscriber.unsubscribed);
    assert_eq!(1, test_app.subscriber_count().await);
}

#[tokio::test]
async fn unsubscribe_normalizes_the_email_before_matching() {
    let test_app = TestApp::spawn_app().await;
    subscribe_test_address(&test_app).await;

    let response = test_app
        .post_unsubscribe(&json!({"email": " J@X.COM "}))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert!(test_app.fetch_subscriber("j@x.com").await.unwrap().unsubscribed);
}

#[tokio::test]
async fn unsubscribe_returns_404_for_an_unknown_email() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_unsubscribe(&json!({"email": "ghost@x.com"}))
        .await;

    assert_eq!(404, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Response was not JSON.");
    assert!(body["error"].is_string());
    // A failed unsubscribe must not create a row
    assert_eq!(0, test_app.subscriber_count().await);
}

#[tokio::test]
async fn unsubscribe_returns_400_when_email_is_missing() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.post_unsubscribe(&json!({})).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn subscribe_then_unsubscribe_twice_matches_the_expected_scenario() {
    let test_app = TestApp::spawn_app().await;
    subscribe_test_address(&test_app).await;

    let subscriber = test_app.fetch_subscriber("j@x.com").await.unwrap();
    assert!(!subscriber.unsubscribed);

    let first = test_app.post_unsubscribe(&json!({"email": "j@x.com"})).await;
    assert_eq!(200, first.status().as_u16());
    assert!(test_app.fetch_subscriber("j@x.com").await.unwrap().unsubscribed);

    let second = test_app.post_unsubscribe(&json!({"email": "j@x.com"})).await;
    assert_eq!(200, second.status().as_u16());

    let row = test_app.fetch_subscriber("j@x.com").await.unwrap();
    assert_eq!(row.id, subscriber.id);
    assert!(row.unsubscribed);
}

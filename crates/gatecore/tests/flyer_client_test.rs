//! Flyer client against a wiremock server.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use gatecore::check::{CheckError, CheckService, FlyerClient};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> FlyerClient {
    FlyerClient::new(server.uri(), SecretString::from("regular-key"), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_sends_key_user_and_language() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .and(body_json(json!({
            "key": "regular-key",
            "user_id": 42,
            "language_code": "ru"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"skip": true})))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).check(42, "ru").await.unwrap());
}

#[tokio::test]
async fn test_skip_false_means_not_passed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"skip": false, "warning": "subscribe first"})))
        .mount(&server)
        .await;

    assert!(!client(&server).check(42, "en").await.unwrap());
}

#[tokio::test]
async fn test_error_without_verdict_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "invalid key"})))
        .mount(&server)
        .await;

    let err = client(&server).check(42, "ru").await.unwrap_err();
    assert!(matches!(err, CheckError::Api(ref msg) if msg == "invalid key"));
}

#[tokio::test]
async fn test_server_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client(&server).check(42, "ru").await.unwrap_err();
    assert!(matches!(err, CheckError::Status(status) if status.as_u16() == 502));
}

#[tokio::test]
async fn test_undecodable_body_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).check(42, "ru").await.unwrap_err();
    assert!(matches!(err, CheckError::Http(_)));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/check"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"skip": true}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = FlyerClient::new(server.uri(), SecretString::from("k"), Duration::from_millis(200)).unwrap();
    let err = client.check(42, "ru").await.unwrap_err();
    assert!(matches!(err, CheckError::Http(ref e) if e.is_timeout()));
}

use eodhd_rs::EodError;
use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use reqwest::Method;
use serde_json::json;

use crate::common::client_for;

#[tokio::test]
async fn get_appends_the_token_and_parses_json() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/exchanges-list/")
            .query_param("fmt", "json")
            .query_param("api_token", "process-token");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"Code":"US"},{"Code":"LSE"}]"#);
    });

    let client = client_for(&server);
    let url = url::Url::parse(&format!("{}/api/exchanges-list/?fmt=json", server.base_url())).unwrap();
    let value = client.request_json(Method::GET, url, None).await.unwrap();

    mock.assert();
    assert_eq!(value, json!([{"Code": "US"}, {"Code": "LSE"}]));
}

#[tokio::test]
async fn post_sends_the_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/screener")
            .json_body(json!({"limit": 5}));
        then.status(200).body(r#"{"data":[]}"#);
    });

    let client = client_for(&server);
    let url = url::Url::parse(&format!("{}/api/screener", server.base_url())).unwrap();
    let value = client
        .request_json(Method::POST, url, Some(&json!({"limit": 5})))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(value, json!({"data": []}));
}

#[tokio::test]
async fn unsupported_method_is_rejected_locally() {
    let server = MockServer::start();
    let client = client_for(&server);
    let url = url::Url::parse(&format!("{}/api/x", server.base_url())).unwrap();

    let err = client.request_json(Method::PATCH, url, None).await.unwrap_err();
    assert!(matches!(err, EodError::InvalidParams(ref m) if m.contains("PATCH")), "{err:?}");
}

#[tokio::test]
async fn non_success_status_keeps_a_truncated_body_and_hides_the_token() {
    let server = MockServer::start();
    let long_body = "x".repeat(2500);
    server.mock(|when, then| {
        when.method(GET).path("/api/eod/AAPL.US");
        then.status(403).body(long_body.clone());
    });

    let client = client_for(&server);
    let url = url::Url::parse(&format!("{}/api/eod/AAPL.US", server.base_url())).unwrap();
    let err = client.request_json(Method::GET, url, None).await.unwrap_err();

    match err {
        EodError::Status { status, url, body } => {
            assert_eq!(status, 403);
            assert_eq!(body.chars().count(), 2001);
            assert!(body.ends_with('…'));
            assert!(!url.contains("process-token"), "{url}");
            assert!(url.contains("api_token=***"), "{url}");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn error_envelope_and_garbage_bodies() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/envelope");
        then.status(200).body(r#"{"error":"Invalid API token."}"#);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/garbage");
        then.status(200).body("<html>maintenance</html>");
    });

    let client = client_for(&server);

    let url = url::Url::parse(&format!("{}/api/envelope", server.base_url())).unwrap();
    let err = client.request_json(Method::GET, url, None).await.unwrap_err();
    assert!(matches!(err, EodError::Api(ref m) if m == "Invalid API token."), "{err:?}");
    assert_eq!(err.to_envelope()["kind"], "transport");

    let url = url::Url::parse(&format!("{}/api/garbage", server.base_url())).unwrap();
    let err = client.request_json(Method::GET, url, None).await.unwrap_err();
    assert!(matches!(err, EodError::Data(_)), "{err:?}");
}

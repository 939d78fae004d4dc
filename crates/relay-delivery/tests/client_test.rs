//! Integration tests for the delivery HTTP client.

use relay_core::Event;
use relay_delivery::{ClientConfig, DeliveryClient, DeliveryError};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn sample_event() -> Event {
    Event {
        bucket_name: "b1".to_string(),
        matched_rule_name: "r1".to_string(),
        payload: serde_json::json!({"key": "object.txt", "size": 42}),
    }
}

#[tokio::test]
async fn success_response_is_reported_as_success() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/hook"))
        .and(matchers::header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = DeliveryClient::with_defaults().unwrap();
    let response =
        client.deliver(&format!("{}/hook", server.uri()), &sample_event()).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert!(response.is_success);
}

#[tokio::test]
async fn non_success_statuses_are_returned_not_errored() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = DeliveryClient::with_defaults().unwrap();
    let response =
        client.deliver(&format!("{}/hook", server.uri()), &sample_event()).await.unwrap();

    assert_eq!(response.status_code, 500);
    assert!(!response.is_success);
}

#[tokio::test]
async fn connection_failure_is_a_network_error() {
    let client = DeliveryClient::with_defaults().unwrap();
    let result = client.deliver("http://127.0.0.1:1/hook", &sample_event()).await;

    assert!(matches!(result, Err(DeliveryError::Network { .. })));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        timeout: std::time::Duration::from_millis(100),
        ..ClientConfig::default()
    };
    let client = DeliveryClient::new(config).unwrap();
    let result = client.deliver(&format!("{}/hook", server.uri()), &sample_event()).await;

    assert!(matches!(result, Err(DeliveryError::Timeout { .. })));
}

//! Control-plane routing tests driven through the router.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use relay_api::{create_router, AppState};
use relay_core::{MemoryStore, Registry};
use relay_delivery::{DeliveryEngine, EngineConfig};
use tower::ServiceExt;

fn test_app() -> (Router, Arc<Registry>) {
    let registry = Arc::new(Registry::new(Arc::new(MemoryStore::new())));
    let engine = Arc::new(
        DeliveryEngine::new(Arc::clone(&registry), EngineConfig::default())
            .expect("engine creation should succeed"),
    );
    let state = AppState {
        registry: Arc::clone(&registry),
        engine,
        max_delivery_attempts: 5,
        shared_secret: None,
    };
    (create_router(state, Duration::from_secs(5)), registry)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (app, _) = test_app();

    let response =
        app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_returns_uuid_id_and_get_round_trips() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/subscriptions/b1/r1",
            serde_json::json!({"url": "https://ex.com/hook"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let created = body_json(response).await;
    let id = created["id"].as_str().expect("id should be a string");
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/subscriptions/b1/r1/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["url"], "https://ex.com/hook");
}

#[tokio::test]
async fn create_rejects_invalid_url_with_400() {
    let (app, registry) = test_app();

    let response = app
        .oneshot(post_json("/subscriptions/b1/r1", serde_json::json!({"url": "not-absolute"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(registry.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_body_without_url_field() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_json("/subscriptions/b1/r1", serde_json::json!({"target": "x"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reads_return_404_for_absent_resources() {
    let (app, registry) = test_app();
    registry.create("b1", "r1", "https://ex.com/hook").await.unwrap();

    let uris = vec![
        "/subscriptions/missing".to_string(),
        "/subscriptions/b1/missing".to_string(),
        format!("/subscriptions/b1/r1/{}", uuid::Uuid::new_v4()),
    ];
    for uri in uris {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {uri}");
    }
}

#[tokio::test]
async fn malformed_subscription_id_is_a_400() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/subscriptions/b1/r1/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_returns_deleted_value_then_bucket_404s() {
    let (app, registry) = test_app();
    let id = registry.create("b1", "r1", "https://ex.com/hook").await.unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/subscriptions/b1/r1/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["url"], "https://ex.com/hook");

    let response = app
        .oneshot(Request::builder().uri("/subscriptions/b1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn replace_rule_validates_keys() {
    let (app, registry) = test_app();
    registry.create("b1", "r1", "https://ex.com/hook").await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/subscriptions/b1/r1")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({"not-a-uuid": {"url": "https://ex.com/x"}}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    // prior state untouched
    assert_eq!(registry.rule("b1", "r1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_method_on_known_path_is_405() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/subscriptions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn responses_carry_request_id_header() {
    let (app, _) = test_app();

    let response =
        app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert!(response.headers().contains_key("X-Request-Id"));
}

//! Router tests driven through `tower::ServiceExt::oneshot`

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use embedding_gateway::embedding::{ContentType, EmbeddingGateway};
use embedding_gateway::config::Config;
use embedding_gateway::observability::{HealthChecker, MetricsCollector};
use embedding_gateway::server::{create_router, ServerState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn state() -> ServerState {
    let metrics = Arc::new(MetricsCollector::new());
    let gateway = Arc::new(
        EmbeddingGateway::new(Arc::new(Config::default_config().provider))
            .unwrap()
            .with_metrics(metrics.clone()),
    );

    ServerState {
        health_checker: Arc::new(HealthChecker::new().with_gateway(gateway)),
        metrics_collector: metrics,
    }
}

async fn get(state: ServerState, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = create_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_ping_returns_pong() {
    let (status, body) = get(state(), "/ping").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value, serde_json::json!({"message": "pong"}));
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let (status, _) = get(state(), "/health/liveness").await;
    assert_eq!(status, StatusCode::OK);

    // Unconfigured databases only degrade health
    let (status, _) = get(state(), "/health/readiness").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_reports_components() {
    let (status, body) = get(state(), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], "degraded");

    let components = value["components"].as_array().unwrap();
    let gateway = components
        .iter()
        .find(|c| c["name"] == "embedding_gateway")
        .unwrap();
    assert_eq!(gateway["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_exported_as_prometheus_text() {
    let state = state();
    state.metrics_collector.record_request(ContentType::Text);

    let (status, body) = get(state, "/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("embedding_requests_total{content_type=\"text\"} 1"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = get(state(), "/embeddings").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

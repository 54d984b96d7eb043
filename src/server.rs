//! HTTP server for ping, health checks and metrics

use crate::observability::{HealthChecker, MetricsCollector, SystemHealth};
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Server state
#[derive(Clone)]
pub struct ServerState {
    pub health_checker: Arc<HealthChecker>,
    pub metrics_collector: Arc<MetricsCollector>,
}

/// Create HTTP server router
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health_check))
        .route("/health/liveness", get(liveness_check))
        .route("/health/readiness", get(readiness_check))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// Full health check endpoint
async fn health_check(State(state): State<ServerState>) -> Json<SystemHealth> {
    Json(state.health_checker.check_health().await)
}

/// Liveness check endpoint
async fn liveness_check(State(state): State<ServerState>) -> StatusCode {
    if state.health_checker.liveness() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Readiness check endpoint
async fn readiness_check(State(state): State<ServerState>) -> StatusCode {
    if state.health_checker.readiness().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Metrics endpoint (Prometheus format)
async fn metrics(State(state): State<ServerState>) -> String {
    state.metrics_collector.export_prometheus()
}

/// Start HTTP server, stopping when `shutdown` resolves
pub async fn start_server<F>(
    addr: &str,
    state: ServerState,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_router_creation() {
        let state = ServerState {
            health_checker: Arc::new(HealthChecker::new()),
            metrics_collector: Arc::new(MetricsCollector::new()),
        };

        let _router = create_router(state);
    }
}

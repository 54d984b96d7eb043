//! Embedding Gateway server binary
//!
//! Loads configuration, verifies the vector and graph databases, builds the
//! embedding gateway and serves the health endpoints until shutdown.

use anyhow::Context;
use embedding_gateway::{
    config::Config,
    embedding::EmbeddingGateway,
    graph_db::GraphDbClient,
    observability::{init_observability, HealthChecker, MetricsCollector},
    server::{start_server, ServerState},
    shutdown::ShutdownCoordinator,
    vector_db::VectorDbClient,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::from_file_with_env(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path))?;

    init_observability(&config.logging.level, &config.logging.format);
    info!("Starting Embedding Gateway");
    info!("Configuration loaded and validated from {}", config_path);

    let vector_db = Arc::new(
        VectorDbClient::new(config.vector_db.clone())
            .await
            .context("vector database connection failed")?,
    );
    vector_db.initialize().await.context("vector database init failed")?;
    info!("Vector database initialized");

    let graph_db = Arc::new(
        GraphDbClient::connect(&config.graph_db)
            .await
            .context("graph database init failed")?,
    );
    info!("Graph database initialized at {}", graph_db.uri());

    let metrics = Arc::new(MetricsCollector::new());
    let gateway = Arc::new(
        EmbeddingGateway::new(Arc::new(config.provider.clone()))
            .context("embedding gateway init failed")?
            .with_metrics(metrics.clone()),
    );

    let health_checker = Arc::new(
        HealthChecker::new()
            .with_gateway(gateway)
            .with_vector_db(vector_db)
            .with_graph_db(graph_db),
    );

    let state = ServerState {
        health_checker,
        metrics_collector: metrics,
    };

    let coordinator = Arc::new(ShutdownCoordinator::new());
    let signal = coordinator.clone();
    let addr = format!("{}:{}", config.server.host, config.server.port);

    start_server(&addr, state, async move { signal.wait_for_signal().await }).await?;

    Ok(())
}

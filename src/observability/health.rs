//! Health check endpoints and monitoring

use crate::embedding::EmbeddingGateway;
use crate::graph_db::GraphStore;
use crate::vector_db::VectorStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Health status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Component health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,

    /// Health status
    pub status: HealthStatus,

    /// Optional message
    pub message: Option<String>,

    /// Response time in milliseconds
    pub response_time_ms: Option<u64>,
}

impl ComponentHealth {
    fn not_configured(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: HealthStatus::Degraded,
            message: Some("Not configured".to_string()),
            response_time_ms: None,
        }
    }
}

/// Overall system health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealth {
    /// Overall status
    pub status: HealthStatus,

    /// Uptime in seconds
    pub uptime_secs: u64,

    /// Component health checks
    pub components: Vec<ComponentHealth>,

    /// Timestamp
    pub timestamp: i64,
}

/// Cached health check result
#[derive(Debug, Clone)]
struct CachedHealth {
    result: SystemHealth,
    cached_at: Instant,
}

/// Health checker with caching
pub struct HealthChecker {
    start_time: Instant,
    gateway: Option<Arc<EmbeddingGateway>>,
    vector_db: Option<Arc<dyn VectorStore>>,
    graph_db: Option<Arc<dyn GraphStore>>,
    cached_result: Arc<RwLock<Option<CachedHealth>>>,
    cache_ttl: Duration,
}

impl HealthChecker {
    /// Create a new health checker with default 30-second cache TTL
    pub fn new() -> Self {
        Self::with_cache_ttl(Duration::from_secs(30))
    }

    /// Create a new health checker with custom cache TTL
    pub fn with_cache_ttl(cache_ttl: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            gateway: None,
            vector_db: None,
            graph_db: None,
            cached_result: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    pub fn with_gateway(mut self, gateway: Arc<EmbeddingGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_vector_db(mut self, vector_db: Arc<dyn VectorStore>) -> Self {
        self.vector_db = Some(vector_db);
        self
    }

    pub fn with_graph_db(mut self, graph_db: Arc<dyn GraphStore>) -> Self {
        self.graph_db = Some(graph_db);
        self
    }

    /// Check overall system health with caching
    pub async fn check_health(&self) -> SystemHealth {
        {
            let cached = self.cached_result.read().await;
            if let Some(cached_health) = &*cached {
                if cached_health.cached_at.elapsed() < self.cache_ttl {
                    debug!("Returning cached health check result");
                    return cached_health.result.clone();
                }
            }
        }

        debug!("Performing fresh health check");
        let health = self.perform_health_check().await;

        let mut cached = self.cached_result.write().await;
        *cached = Some(CachedHealth {
            result: health.clone(),
            cached_at: Instant::now(),
        });

        health
    }

    /// Perform actual health check (uncached)
    async fn perform_health_check(&self) -> SystemHealth {
        let components = vec![
            self.check_gateway(),
            self.check_vector_db().await,
            self.check_graph_db().await,
        ];

        let status = if components.iter().all(|c| c.status == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else if components.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Degraded
        };

        SystemHealth {
            status,
            uptime_secs: self.start_time.elapsed().as_secs(),
            components,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Static check of the gateway configuration; never calls a provider
    fn check_gateway(&self) -> ComponentHealth {
        let Some(gateway) = &self.gateway else {
            return ComponentHealth::not_configured("embedding_gateway");
        };

        let config = gateway.config();
        let (status, message) = if config.dimensions > 0 {
            (
                HealthStatus::Healthy,
                format!(
                    "text={}, multimodal={}, dim={}",
                    config.text_model, config.multimodal_model, config.dimensions
                ),
            )
        } else {
            (HealthStatus::Unhealthy, "Invalid embedding dimension".to_string())
        };

        ComponentHealth {
            name: "embedding_gateway".to_string(),
            status,
            message: Some(message),
            response_time_ms: Some(0),
        }
    }

    async fn check_vector_db(&self) -> ComponentHealth {
        let Some(db) = &self.vector_db else {
            return ComponentHealth::not_configured("vector_database");
        };

        let start = Instant::now();
        let (status, message) = match tokio::time::timeout(CHECK_TIMEOUT, db.health_check()).await {
            Ok(Ok(())) => (HealthStatus::Healthy, "Database operational".to_string()),
            Ok(Err(e)) => (HealthStatus::Unhealthy, format!("Database error: {}", e)),
            Err(_) => (HealthStatus::Unhealthy, "Health check timeout".to_string()),
        };

        ComponentHealth {
            name: "vector_database".to_string(),
            status,
            message: Some(message),
            response_time_ms: Some(start.elapsed().as_millis() as u64),
        }
    }

    async fn check_graph_db(&self) -> ComponentHealth {
        let Some(db) = &self.graph_db else {
            return ComponentHealth::not_configured("graph_database");
        };

        let start = Instant::now();
        let check = tokio::time::timeout(CHECK_TIMEOUT, db.verify_connectivity());
        let (status, message) = match check.await {
            Ok(Ok(())) => (HealthStatus::Healthy, "Database operational".to_string()),
            Ok(Err(e)) => (HealthStatus::Unhealthy, format!("Database error: {}", e)),
            Err(_) => (HealthStatus::Unhealthy, "Health check timeout".to_string()),
        };

        ComponentHealth {
            name: "graph_database".to_string(),
            status,
            message: Some(message),
            response_time_ms: Some(start.elapsed().as_millis() as u64),
        }
    }

    /// Simple liveness check
    pub fn liveness(&self) -> bool {
        true
    }

    /// Readiness check
    pub async fn readiness(&self) -> bool {
        let health = self.check_health().await;
        health.status != HealthStatus::Unhealthy
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

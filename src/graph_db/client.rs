//! Neo4j client using the neo4rs driver

use super::GraphStore;
use crate::config::GraphDbConfig;
use crate::error::{GraphDbError, Result};
use async_trait::async_trait;
use neo4rs::{query, Graph};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, info};

/// Verified connection to the Neo4j graph database
pub struct GraphDbClient {
    uri: String,
    graph: Arc<Graph>,
}

impl GraphDbClient {
    /// Connect and verify connectivity; fails fast if the server does not answer
    pub async fn connect(config: &GraphDbConfig) -> Result<Self> {
        info!("Connecting to Neo4j at {} as user {}", config.uri, config.username);

        let graph = Graph::new(&config.uri, &config.username, config.password.expose_secret())
            .await
            .map_err(|e| GraphDbError::ConnectionError(e.to_string()))?;

        let client = Self {
            uri: config.uri.clone(),
            graph: Arc::new(graph),
        };

        client.verify_connectivity().await?;
        info!("Neo4j connectivity verified");

        Ok(client)
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

#[async_trait]
impl GraphStore for GraphDbClient {
    async fn verify_connectivity(&self) -> Result<()> {
        debug!("Verifying Neo4j connectivity at {}", self.uri);

        self.graph
            .run(query("RETURN 1"))
            .await
            .map_err(|e| GraphDbError::VerificationFailed(e.to_string()))?;

        Ok(())
    }
}

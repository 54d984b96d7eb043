//! Graph database bootstrap for Neo4j

pub mod client;

pub use client::GraphDbClient;

use async_trait::async_trait;
use crate::error::Result;

/// Trait for the graph store operations the service needs at startup
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run a trivial query to confirm the server answers
    async fn verify_connectivity(&self) -> Result<()>;
}

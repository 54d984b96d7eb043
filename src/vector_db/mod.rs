//! Vector database bootstrap for Qdrant

pub mod client;
pub mod schema;

pub use client::VectorDbClient;
pub use schema::RecallCollection;

use async_trait::async_trait;
use crate::error::Result;

/// Trait for the vector store operations the service needs at startup
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Check the server is reachable and healthy
    async fn health_check(&self) -> Result<()>;

    /// Whether a collection exists
    async fn collection_exists(&self, name: &str) -> Result<bool>;

    /// Create the collection if missing. Returns true when it was created.
    async fn ensure_collection(&self, collection: RecallCollection) -> Result<bool>;
}

//! Embedding Gateway - text and multimodal embeddings behind one result type
//!
//! The gateway accepts plain text, a single image URL, or a list of image
//! URLs and returns one canonical [`embedding::EmbeddingResult`]. Text goes to
//! an OpenAI-compatible `/embeddings` endpoint; images go to a JSON
//! multimodal endpoint. The service binary also bootstraps a Qdrant vector
//! database and a Neo4j graph database and exposes health endpoints.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use embedding_gateway::prelude::*;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_file("config.toml")?;
//!     let gateway = EmbeddingGateway::new(Arc::new(config.provider))?;
//!
//!     let cancel = CancellationToken::new();
//!     let result = gateway
//!         .embed(EmbeddingRequest::image("https://example.com/cat.jpg"), &cancel)
//!         .await?;
//!
//!     println!("{} vectors from {}", result.vectors.len(), result.model);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod graph_db;
pub mod observability;
pub mod server;
pub mod shutdown;
pub mod vector_db;

pub use config::Config;
pub use error::{EmbeddingError, GatewayError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ProviderConfig};
    pub use crate::embedding::{ContentType, EmbeddingGateway, EmbeddingRequest, EmbeddingResult};
    pub use crate::error::{EmbedResult, EmbeddingError, GatewayError, Result};
    pub use crate::graph_db::{GraphDbClient, GraphStore};
    pub use crate::observability::{HealthChecker, MetricsCollector};
    pub use crate::vector_db::{VectorDbClient, VectorStore};
}

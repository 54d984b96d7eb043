//! Qdrant client implementation

use super::schema::{RecallCollection, TAG_FIELD};
use super::VectorStore;
use crate::config::{Distance, VectorDbConfig};
use crate::error::{Result, VectorDbError};
use async_trait::async_trait;
use qdrant_client::qdrant::vectors_config::Config;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, FieldType, VectorParamsBuilder,
    VectorsConfig,
};
use qdrant_client::Qdrant;
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, info};

/// Client for the Qdrant vector database
pub struct VectorDbClient {
    config: VectorDbConfig,
    client: Qdrant,
}

impl VectorDbClient {
    /// Create a new vector database client
    pub async fn new(config: VectorDbConfig) -> Result<Self> {
        info!("Connecting to Qdrant at {}", config.url);

        let mut builder =
            Qdrant::from_url(&config.url).timeout(Duration::from_secs(config.timeout_secs));
        if let Some(api_key) = &config.api_key {
            builder = builder.api_key(api_key.expose_secret().clone());
        }

        let client = builder
            .build()
            .map_err(|e| VectorDbError::ConnectionError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Verify the server and make sure every recall collection exists
    pub async fn initialize(&self) -> Result<()> {
        self.health_check().await?;

        info!("Initializing recall collections in database {}", self.config.database);
        for collection in RecallCollection::ALL {
            self.ensure_collection(collection).await?;
        }

        Ok(())
    }

    /// Get the collection name for a recall collection
    pub fn collection_name(&self, collection: RecallCollection) -> String {
        collection.name(&self.config.database)
    }

    /// Convert Distance enum to Qdrant Distance
    fn to_qdrant_distance(&self) -> qdrant_client::qdrant::Distance {
        match self.config.distance {
            Distance::Cosine => qdrant_client::qdrant::Distance::Cosine,
            Distance::Euclidean => qdrant_client::qdrant::Distance::Euclid,
            Distance::Dot => qdrant_client::qdrant::Distance::Dot,
        }
    }

    async fn create_collection(&self, name: &str, collection: RecallCollection) -> Result<()> {
        debug!("Creating collection {} ({})", name, collection.description());

        let vector_params = VectorParamsBuilder::new(
            self.config.vector_size as u64,
            self.to_qdrant_distance(),
        )
        .build();

        self.client
            .create_collection(CreateCollectionBuilder::new(name).vectors_config(VectorsConfig {
                config: Some(Config::Params(vector_params)),
            }))
            .await
            .map_err(|e| VectorDbError::CollectionCreation {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        self.client
            .create_field_index(CreateFieldIndexCollectionBuilder::new(
                name,
                TAG_FIELD,
                FieldType::Keyword,
            ))
            .await
            .map_err(|e| VectorDbError::IndexCreation {
                collection: name.to_string(),
                field: TAG_FIELD.to_string(),
                reason: e.to_string(),
            })?;

        info!("Collection created: {} (dim: {})", name, self.config.vector_size);
        Ok(())
    }
}

#[async_trait]
impl VectorStore for VectorDbClient {
    async fn health_check(&self) -> Result<()> {
        let reply = self
            .client
            .health_check()
            .await
            .map_err(|e| VectorDbError::HealthCheckFailed(e.to_string()))?;

        debug!("Qdrant healthy (version {})", reply.version);
        Ok(())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let exists = self
            .client
            .collection_exists(name)
            .await
            .map_err(|e| VectorDbError::QdrantError(e.to_string()))?;

        Ok(exists)
    }

    async fn ensure_collection(&self, collection: RecallCollection) -> Result<bool> {
        let name = self.collection_name(collection);

        if self.collection_exists(&name).await? {
            debug!("Collection already exists: {}", name);
            return Ok(false);
        }

        self.create_collection(&name, collection).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_collection_name_uses_database() {
        let mut config = Config::default_config().vector_db;
        config.database = "sea".to_string();

        let client = VectorDbClient::new(config).await.unwrap();
        assert_eq!(client.collection_name(RecallCollection::Precise), "sea_recall_precise");
    }

    #[tokio::test]
    #[ignore] // Requires Qdrant running
    async fn test_initialize_creates_collections() {
        let client = VectorDbClient::new(Config::default_config().vector_db).await.unwrap();
        client.initialize().await.unwrap();

        for collection in RecallCollection::ALL {
            let name = client.collection_name(collection);
            assert!(client.collection_exists(&name).await.unwrap());
        }
    }
}

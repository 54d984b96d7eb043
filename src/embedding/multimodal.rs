//! Client for the multimodal (image) embedding API

use super::models::{ContentItem, EmbeddingResult, MultimodalRequest, MultimodalResponse};
use super::{post_json, MultimodalEmbeddingProvider};
use crate::config::ProviderConfig;
use crate::error::{EmbedResult, EmbeddingError, ProviderKind};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, error};

/// Sends one content item per call to the configured multimodal endpoint
pub struct MultimodalEmbeddingClient {
    config: Arc<ProviderConfig>,
    http_client: Client,
}

impl MultimodalEmbeddingClient {
    pub fn new(config: Arc<ProviderConfig>, http_client: Client) -> Self {
        Self { config, http_client }
    }

    /// Build the request envelope for one content item
    pub fn build_request(&self, item: ContentItem) -> MultimodalRequest {
        MultimodalRequest::new(self.config.multimodal_model.clone(), item, self.config.dimensions)
    }
}

#[async_trait]
impl MultimodalEmbeddingProvider for MultimodalEmbeddingClient {
    async fn embed_content(&self, item: ContentItem) -> EmbedResult<EmbeddingResult> {
        let request = self.build_request(item);

        let body = serde_json::to_vec(&request).map_err(|e| {
            error!("Failed to marshal multimodal request: {}", e);
            EmbeddingError::EncodingFailure(e)
        })?;

        let raw = post_json(
            &self.http_client,
            &self.config.multimodal_base_url,
            &self.config.api_key,
            body,
            ProviderKind::Multimodal,
        )
        .await?;

        let response: MultimodalResponse = serde_json::from_str(&raw).map_err(|e| {
            error!("Failed to unmarshal multimodal response: {}", e);
            EmbeddingError::decode_failure(ProviderKind::Multimodal, e.to_string(), &raw)
        })?;

        debug!("Received {} multimodal embeddings", response.output.embeddings.len());
        response
            .into_result(&self.config.multimodal_model)
            .map_err(|e| e.with_body(&raw))
    }
}

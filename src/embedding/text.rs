//! Client for the OpenAI-compatible text embedding API

use super::models::{EmbeddingResult, EncodingFormat, TextEmbeddingRequest, TextEmbeddingResponse};
use super::{post_json, TextEmbeddingProvider};
use crate::config::ProviderConfig;
use crate::error::{EmbedResult, EmbeddingError, ProviderKind};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, error};

/// Calls `POST {base_url}/embeddings` with one input string
pub struct TextEmbeddingClient {
    config: Arc<ProviderConfig>,
    http_client: Client,
}

impl TextEmbeddingClient {
    pub fn new(config: Arc<ProviderConfig>, http_client: Client) -> Self {
        Self { config, http_client }
    }

    /// Embeddings endpoint derived from the configured base URL
    pub fn endpoint(&self) -> String {
        format!("{}/embeddings", self.config.base_url.trim_end_matches('/'))
    }

    pub fn build_request(&self, input: &str) -> TextEmbeddingRequest {
        TextEmbeddingRequest {
            input: input.to_string(),
            model: self.config.text_model.clone(),
            dimensions: self.config.dimensions,
            encoding_format: EncodingFormat::Float,
            user: self.config.user_tag.clone(),
        }
    }
}

#[async_trait]
impl TextEmbeddingProvider for TextEmbeddingClient {
    async fn embed_text(&self, input: &str) -> EmbedResult<EmbeddingResult> {
        let request = self.build_request(input);

        let body = serde_json::to_vec(&request).map_err(|e| {
            error!("Failed to marshal text embedding request: {}", e);
            EmbeddingError::EncodingFailure(e)
        })?;

        let raw = post_json(
            &self.http_client,
            &self.endpoint(),
            &self.config.api_key,
            body,
            ProviderKind::Text,
        )
        .await?;

        let response: TextEmbeddingResponse = serde_json::from_str(&raw).map_err(|e| {
            error!("Failed to unmarshal text embedding response: {}", e);
            EmbeddingError::decode_failure(ProviderKind::Text, e.to_string(), &raw)
        })?;

        debug!("Received {} text embeddings", response.data.len());
        response
            .into_result(&self.config.text_model)
            .map_err(|e| e.with_body(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let mut config = Config::default_config().provider;
        config.base_url = "https://api.example.com/v1/".to_string();

        let client = TextEmbeddingClient::new(Arc::new(config), Client::new());
        assert_eq!(client.endpoint(), "https://api.example.com/v1/embeddings");
    }

    #[test]
    fn test_build_request_uses_config() {
        let config = Config::default_config().provider;
        let client = TextEmbeddingClient::new(Arc::new(config), Client::new());

        let request = client.build_request("hello");
        assert_eq!(request.model, "text-embedding-v4");
        assert_eq!(request.dimensions, 2048);
        assert_eq!(request.user, "user-neo");
        assert_eq!(request.encoding_format, EncodingFormat::Float);
    }
}

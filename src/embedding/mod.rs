//! Embedding gateway: normalizes text and image content into one result type
//! across an OpenAI-compatible text API and a JSON multimodal API

pub mod gateway;
pub mod models;
pub mod multimodal;
pub mod request;
pub mod text;

pub use gateway::EmbeddingGateway;
pub use models::{
    ContentItem, EmbeddingResult, MultimodalRequest, MultimodalResponse, TextEmbeddingRequest,
    TextEmbeddingResponse,
};
pub use multimodal::MultimodalEmbeddingClient;
pub use request::{ContentType, EmbeddingRequest};
pub use text::TextEmbeddingClient;

use crate::error::{EmbedResult, EmbeddingError, ProviderKind};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use tracing::{debug, error};

/// Provider for plain text embeddings
#[async_trait]
pub trait TextEmbeddingProvider: Send + Sync {
    /// Embed a single string
    async fn embed_text(&self, input: &str) -> EmbedResult<EmbeddingResult>;
}

/// Provider for image and image-list embeddings
#[async_trait]
pub trait MultimodalEmbeddingProvider: Send + Sync {
    /// Embed one content item
    async fn embed_content(&self, item: ContentItem) -> EmbedResult<EmbeddingResult>;
}

/// POST an already-encoded JSON body with bearer auth and return the raw
/// response body. Non-2xx statuses keep the body verbatim.
pub(crate) async fn post_json(
    http_client: &Client,
    url: &str,
    api_key: &Secret<String>,
    body: Vec<u8>,
    provider: ProviderKind,
) -> EmbedResult<String> {
    debug!("Sending {} embedding request to {} ({} bytes)", provider, url, body.len());

    let response = http_client
        .post(url)
        .bearer_auth(api_key.expose_secret())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| {
            error!("Failed to execute {} embedding request: {}", provider, e);
            EmbeddingError::provider_call(provider, e)
        })?;

    let status = response.status();

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) if !status.is_success() => {
            error!("Embedding API error {} with unreadable body: {}", status, e);
            return Err(EmbeddingError::provider_status(
                provider,
                status.as_u16(),
                format!("<unreadable body: {}>", e),
            ));
        }
        Err(e) => {
            error!("Failed to read {} embedding response body: {}", provider, e);
            return Err(EmbeddingError::provider_call(provider, e));
        }
    };

    if !status.is_success() {
        error!("Embedding API error {}: {}", status, text);
        return Err(EmbeddingError::provider_status(provider, status.as_u16(), text));
    }

    Ok(text)
}

//! Single entry point that dispatches content to the right provider

use super::models::{ContentItem, EmbeddingResult};
use super::request::{ContentType, EmbeddingRequest};
use super::{
    MultimodalEmbeddingClient, MultimodalEmbeddingProvider, TextEmbeddingClient,
    TextEmbeddingProvider,
};
use crate::config::ProviderConfig;
use crate::error::{EmbedResult, EmbeddingError, GatewayError, Result};
use crate::observability::MetricsCollector;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Stateless gateway over the text and multimodal providers.
///
/// Each call makes one round trip to exactly one provider. There is no
/// retry, batching across calls, or caching; callers own fan-out and
/// backoff. Cancellation is driven by the caller's token.
pub struct EmbeddingGateway {
    config: Arc<ProviderConfig>,
    text: Arc<dyn TextEmbeddingProvider>,
    multimodal: Arc<dyn MultimodalEmbeddingProvider>,
    metrics: Option<Arc<MetricsCollector>>,
}

impl EmbeddingGateway {
    /// Create a gateway with HTTP clients for both providers
    pub fn new(config: Arc<ProviderConfig>) -> Result<Self> {
        let http_client = Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| GatewayError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_http_client(config, http_client))
    }

    /// Create a gateway sharing a custom HTTP client between both providers
    pub fn with_http_client(config: Arc<ProviderConfig>, http_client: Client) -> Self {
        let text = Arc::new(TextEmbeddingClient::new(config.clone(), http_client.clone()));
        let multimodal = Arc::new(MultimodalEmbeddingClient::new(config.clone(), http_client));

        info!(
            "Initialized embedding gateway (text_model={}, multimodal_model={}, dimensions={})",
            config.text_model, config.multimodal_model, config.dimensions
        );

        Self::with_providers(config, text, multimodal)
    }

    /// Create a gateway over arbitrary provider implementations
    pub fn with_providers(
        config: Arc<ProviderConfig>,
        text: Arc<dyn TextEmbeddingProvider>,
        multimodal: Arc<dyn MultimodalEmbeddingProvider>,
    ) -> Self {
        Self {
            config,
            text,
            multimodal,
            metrics: None,
        }
    }

    /// Record call counts, failures and latency
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Embed one request. Returns `Cancelled` as soon as `cancel` fires,
    /// dropping any in-flight provider call.
    pub async fn embed(
        &self,
        request: EmbeddingRequest,
        cancel: &CancellationToken,
    ) -> EmbedResult<EmbeddingResult> {
        let content_type = request.content_type();
        let start = Instant::now();

        if let Some(metrics) = &self.metrics {
            metrics.record_request(content_type);
        }

        debug!("Dispatching {} embedding request", content_type);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("{} embedding request cancelled by caller", content_type);
                Err(EmbeddingError::Cancelled)
            }
            result = self.dispatch(request) => result,
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_embedding_latency(start.elapsed());
            if let Err(e) = &outcome {
                metrics.record_error(e);
            }
        }

        if let Ok(result) = &outcome {
            self.check_dimensions(content_type, result);
        }

        outcome
    }

    /// String calling convention: discriminator plus payload. For
    /// `multi_images` the payload must be a JSON array of URLs.
    pub async fn embed_content(
        &self,
        content_type: &str,
        payload: &str,
        cancel: &CancellationToken,
    ) -> EmbedResult<EmbeddingResult> {
        let request = EmbeddingRequest::from_parts(content_type, payload).map_err(|e| {
            warn!("Rejected {} embedding request before dispatch: {}", content_type, e);
            if let Some(metrics) = &self.metrics {
                metrics.record_rejected(&e);
            }
            e
        })?;

        self.embed(request, cancel).await
    }

    async fn dispatch(&self, request: EmbeddingRequest) -> EmbedResult<EmbeddingResult> {
        match request {
            EmbeddingRequest::Text(content) => self.text.embed_text(&content).await,
            EmbeddingRequest::Image(url) => {
                self.multimodal.embed_content(ContentItem::Image(url)).await
            }
            EmbeddingRequest::MultiImage(urls) => {
                self.multimodal.embed_content(ContentItem::MultiImages(urls)).await
            }
        }
    }

    fn check_dimensions(&self, content_type: ContentType, result: &EmbeddingResult) {
        let expected = self.config.dimensions;
        for (index, vector) in result.vectors.iter().enumerate() {
            if !vector.is_empty() && vector.len() != expected {
                warn!(
                    "{} embedding at index {} has {} dimensions, expected {}",
                    content_type,
                    index,
                    vector.len(),
                    expected
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingText {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextEmbeddingProvider for RecordingText {
        async fn embed_text(&self, input: &str) -> EmbedResult<EmbeddingResult> {
            self.inputs.lock().unwrap().push(input.to_string());
            Ok(EmbeddingResult {
                vectors: vec![vec![0.5; 4]],
                model: "text-model".to_string(),
                prompt_tokens: 2,
                total_tokens: 2,
            })
        }
    }

    #[derive(Default)]
    struct RecordingMultimodal {
        items: Mutex<Vec<ContentItem>>,
    }

    #[async_trait]
    impl MultimodalEmbeddingProvider for RecordingMultimodal {
        async fn embed_content(&self, item: ContentItem) -> EmbedResult<EmbeddingResult> {
            self.items.lock().unwrap().push(item);
            Ok(EmbeddingResult {
                vectors: vec![vec![0.25; 4]],
                model: "multimodal-model".to_string(),
                prompt_tokens: 7,
                total_tokens: 7,
            })
        }
    }

    struct PendingMultimodal;

    #[async_trait]
    impl MultimodalEmbeddingProvider for PendingMultimodal {
        async fn embed_content(&self, _item: ContentItem) -> EmbedResult<EmbeddingResult> {
            std::future::pending().await
        }
    }

    fn gateway() -> (EmbeddingGateway, Arc<RecordingText>, Arc<RecordingMultimodal>, Arc<MetricsCollector>) {
        let mut provider = Config::default_config().provider;
        provider.dimensions = 4;

        let text = Arc::new(RecordingText::default());
        let multimodal = Arc::new(RecordingMultimodal::default());
        let metrics = Arc::new(MetricsCollector::new());
        let gateway = EmbeddingGateway::with_providers(Arc::new(provider), text.clone(), multimodal.clone())
            .with_metrics(metrics.clone());

        (gateway, text, multimodal, metrics)
    }

    #[tokio::test]
    async fn test_text_dispatches_to_text_provider_only() {
        let (gateway, text, multimodal, _) = gateway();

        let result = gateway
            .embed(EmbeddingRequest::text("hello"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.model, "text-model");
        assert_eq!(*text.inputs.lock().unwrap(), vec!["hello".to_string()]);
        assert!(multimodal.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_image_wraps_single_url() {
        let (gateway, text, multimodal, _) = gateway();

        gateway
            .embed(EmbeddingRequest::image("https://x/y.jpg"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(text.inputs.lock().unwrap().is_empty());
        assert_eq!(
            *multimodal.items.lock().unwrap(),
            vec![ContentItem::Image("https://x/y.jpg".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_multi_image_reaches_provider() {
        let (gateway, text, multimodal, _) = gateway();

        gateway
            .embed_content("multi_images", "[]", &CancellationToken::new())
            .await
            .unwrap();

        assert!(text.inputs.lock().unwrap().is_empty());
        assert_eq!(*multimodal.items.lock().unwrap(), vec![ContentItem::MultiImages(Vec::new())]);
    }

    #[tokio::test]
    async fn test_unsupported_type_makes_no_provider_call() {
        let (gateway, text, multimodal, metrics) = gateway();

        let err = gateway
            .embed_content("video", "https://example.com/video.mp4", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, EmbeddingError::UnsupportedContentType(_)));
        assert!(text.inputs.lock().unwrap().is_empty());
        assert!(multimodal.items.lock().unwrap().is_empty());

        let snapshot = metrics.get_metrics();
        assert_eq!(snapshot.total_errors, 1);
        assert_eq!(snapshot.total_requests, 1);
        assert_eq!(snapshot.rejected_requests, 1);
        assert!(snapshot.requests_by_type.iter().all(|(_, n)| *n == 0));
    }

    #[tokio::test]
    async fn test_malformed_multi_images_makes_no_provider_call() {
        let (gateway, _, multimodal, _) = gateway();

        let err = gateway
            .embed_content("multi_images", "invalid json", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, EmbeddingError::MalformedInput { .. }));
        assert!(multimodal.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_skips_dispatch() {
        let (gateway, text, _, metrics) = gateway();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = gateway.embed(EmbeddingRequest::text("hello"), &cancel).await.unwrap_err();

        assert!(matches!(err, EmbeddingError::Cancelled));
        assert!(text.inputs.lock().unwrap().is_empty());
        assert!(metrics.get_metrics().errors_by_kind.contains(&("cancelled", 1)));
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_call() {
        let provider = Arc::new(Config::default_config().provider);
        let gateway = EmbeddingGateway::with_providers(
            provider,
            Arc::new(RecordingText::default()),
            Arc::new(PendingMultimodal),
        );
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = gateway
            .embed(EmbeddingRequest::image("https://x/y.jpg"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, EmbeddingError::Cancelled));
    }
}

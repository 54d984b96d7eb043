//! Wire formats for both providers and the canonical result type

use crate::error::{EmbedResult, EmbeddingError, ProviderKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Upper bound on a provider-reported batch index
pub const MAX_BATCH_INDEX: usize = 4096;

/// Canonical embedding result returned for every content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResult {
    /// One vector per input item, at the provider-reported index
    pub vectors: Vec<Vec<f32>>,

    /// Model that produced the vectors
    pub model: String,

    pub prompt_tokens: u64,

    pub total_tokens: u64,
}

/// A vector tagged with its position in the input batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedEmbedding {
    pub index: usize,
    pub embedding: Vec<f32>,
}

/// One multimodal content item: `{"image": url}` or `{"multi_images": [url, ...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentItem {
    Image(String),
    MultiImages(Vec<String>),
}

/// Request envelope for the multimodal provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultimodalRequest {
    pub model: String,
    pub input: MultimodalInput,
    pub parameters: MultimodalParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultimodalInput {
    pub contents: Vec<ContentItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultimodalParameters {
    /// Target dimensionality, sent as a string
    pub dimension: String,
}

impl MultimodalRequest {
    /// Envelope carrying exactly one content item
    pub fn new(model: impl Into<String>, item: ContentItem, dimensions: usize) -> Self {
        Self {
            model: model.into(),
            input: MultimodalInput { contents: vec![item] },
            parameters: MultimodalParameters {
                dimension: dimensions.to_string(),
            },
        }
    }
}

/// Response body of the multimodal provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultimodalResponse {
    pub output: MultimodalOutput,

    #[serde(default)]
    pub usage: MultimodalUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultimodalOutput {
    #[serde(default)]
    pub embeddings: Vec<IndexedEmbedding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultimodalUsage {
    #[serde(default)]
    pub total_tokens: u64,
}

impl MultimodalResponse {
    /// Normalize into the canonical result. The provider only reports a
    /// total, so it is mirrored into both token fields.
    pub fn into_result(self, model: &str) -> EmbedResult<EmbeddingResult> {
        let vectors = place_by_index(ProviderKind::Multimodal, self.output.embeddings)?;

        Ok(EmbeddingResult {
            vectors,
            model: model.to_string(),
            prompt_tokens: self.usage.total_tokens,
            total_tokens: self.usage.total_tokens,
        })
    }
}

/// Float is the only encoding the gateway requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingFormat {
    #[default]
    Float,
}

/// OpenAI-compatible text embedding request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEmbeddingRequest {
    pub input: String,
    pub model: String,
    pub dimensions: usize,
    pub encoding_format: EncodingFormat,
    pub user: String,
}

/// OpenAI-compatible text embedding response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEmbeddingResponse {
    pub data: Vec<IndexedEmbedding>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub usage: TextUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextUsage {
    #[serde(default)]
    pub prompt_tokens: u64,

    #[serde(default)]
    pub total_tokens: u64,
}

impl TextEmbeddingResponse {
    /// Normalize into the canonical result. One text input always yields
    /// at least one vector, so an empty `data` list is rejected.
    pub fn into_result(self, fallback_model: &str) -> EmbedResult<EmbeddingResult> {
        if self.data.is_empty() {
            return Err(EmbeddingError::decode_failure(
                ProviderKind::Text,
                "response contains no embeddings",
                "",
            ));
        }

        let vectors = place_by_index(ProviderKind::Text, self.data)?;

        Ok(EmbeddingResult {
            vectors,
            model: self
                .model
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback_model.to_string()),
            prompt_tokens: self.usage.prompt_tokens,
            total_tokens: self.usage.total_tokens,
        })
    }
}

/// Place each embedding at its reported index. The index is authoritative:
/// it may arrive reordered or sparse, gaps stay empty.
pub fn place_by_index(
    provider: ProviderKind,
    items: Vec<IndexedEmbedding>,
) -> EmbedResult<Vec<Vec<f32>>> {
    let Some(max_index) = items.iter().map(|item| item.index).max() else {
        return Ok(Vec::new());
    };

    if max_index >= MAX_BATCH_INDEX {
        return Err(EmbeddingError::decode_failure(
            provider,
            format!("embedding index {} exceeds maximum {}", max_index, MAX_BATCH_INDEX - 1),
            "",
        ));
    }

    let mut vectors = vec![Vec::new(); max_index + 1];
    let mut seen = vec![false; max_index + 1];

    for item in items {
        if seen[item.index] {
            warn!(
                "Duplicate embedding index {} from {} provider, keeping the last one",
                item.index, provider
            );
        }
        seen[item.index] = true;
        vectors[item.index] = item.embedding;
    }

    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_content_item_wire_shape() {
        let item = ContentItem::Image("https://x/y.jpg".to_string());
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value, json!({"image": "https://x/y.jpg"}));

        let parsed: ContentItem = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_multi_images_content_item_wire_shape() {
        let item = ContentItem::MultiImages(vec![
            "https://example.com/image1.jpg".to_string(),
            "https://example.com/image2.jpg".to_string(),
        ]);

        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"multi_images": ["https://example.com/image1.jpg", "https://example.com/image2.jpg"]})
        );
    }

    #[test]
    fn test_multimodal_request_envelope() {
        let request = MultimodalRequest::new(
            "qwen2.5-vl-embedding",
            ContentItem::Image("https://example.com/image.jpg".to_string()),
            2048,
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "qwen2.5-vl-embedding",
                "input": {"contents": [{"image": "https://example.com/image.jpg"}]},
                "parameters": {"dimension": "2048"}
            })
        );
    }

    #[test]
    fn test_text_request_wire_shape() {
        let request = TextEmbeddingRequest {
            input: "hello".to_string(),
            model: "text-embedding-v4".to_string(),
            dimensions: 2048,
            encoding_format: EncodingFormat::Float,
            user: "user-neo".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "input": "hello",
                "model": "text-embedding-v4",
                "dimensions": 2048,
                "encoding_format": "float",
                "user": "user-neo"
            })
        );
    }

    #[test]
    fn test_multimodal_response_out_of_order_indices() {
        let body = r#"{
            "output": {"embeddings": [
                {"index": 1, "embedding": [1.0, 1.0]},
                {"index": 0, "embedding": [0.0, 0.5]}
            ]},
            "usage": {"total_tokens": 150}
        }"#;

        let response: MultimodalResponse = serde_json::from_str(body).unwrap();
        let result = response.into_result("qwen2.5-vl-embedding").unwrap();

        assert_eq!(result.vectors, vec![vec![0.0, 0.5], vec![1.0, 1.0]]);
        assert_eq!(result.model, "qwen2.5-vl-embedding");
        assert_eq!(result.prompt_tokens, 150);
        assert_eq!(result.total_tokens, 150);
    }

    #[test]
    fn test_multimodal_response_without_usage_defaults_to_zero() {
        let body = r#"{"output": {"embeddings": [{"index": 0, "embedding": [0.25]}]}}"#;

        let response: MultimodalResponse = serde_json::from_str(body).unwrap();
        let result = response.into_result("qwen2.5-vl-embedding").unwrap();

        assert_eq!(result.prompt_tokens, 0);
        assert_eq!(result.total_tokens, 0);
        assert_eq!(result.vectors.len(), 1);
    }

    #[test]
    fn test_multimodal_response_missing_output_fails() {
        let result = serde_json::from_str::<MultimodalResponse>(r#"{"usage": {"total_tokens": 1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_sparse_indices_leave_gaps_empty() {
        let vectors = place_by_index(
            ProviderKind::Multimodal,
            vec![
                IndexedEmbedding { index: 2, embedding: vec![2.0] },
                IndexedEmbedding { index: 0, embedding: vec![0.0] },
            ],
        )
        .unwrap();

        assert_eq!(vectors, vec![vec![0.0], Vec::new(), vec![2.0]]);
    }

    #[test]
    fn test_index_out_of_bounds_is_decode_failure() {
        let err = place_by_index(
            ProviderKind::Text,
            vec![IndexedEmbedding { index: MAX_BATCH_INDEX, embedding: vec![0.0] }],
        )
        .unwrap_err();

        assert!(matches!(err, EmbeddingError::DecodeFailure { provider: ProviderKind::Text, .. }));
    }

    #[test]
    fn test_text_response_ignores_extra_fields() {
        let body = r#"{
            "object": "list",
            "data": [{"object": "embedding", "index": 0, "embedding": [0.1, 0.2]}],
            "model": "text-embedding-v4",
            "usage": {"prompt_tokens": 3, "total_tokens": 3}
        }"#;

        let response: TextEmbeddingResponse = serde_json::from_str(body).unwrap();
        let result = response.into_result("fallback").unwrap();

        assert_eq!(result.model, "text-embedding-v4");
        assert_eq!(result.prompt_tokens, 3);
        assert_eq!(result.vectors, vec![vec![0.1, 0.2]]);
    }

    #[test]
    fn test_text_response_with_empty_data_is_decode_failure() {
        let body = r#"{"data": [], "model": "text-embedding-v4", "usage": {"prompt_tokens": 1, "total_tokens": 1}}"#;

        let response: TextEmbeddingResponse = serde_json::from_str(body).unwrap();
        let err = response.into_result("fallback").unwrap_err();

        assert!(matches!(
            err,
            EmbeddingError::DecodeFailure { provider: ProviderKind::Text, ref reason, .. }
                if reason.contains("no embeddings")
        ));
    }

    #[test]
    fn test_text_response_without_model_uses_fallback() {
        let body = r#"{"data": [{"index": 0, "embedding": [0.1]}]}"#;

        let response: TextEmbeddingResponse = serde_json::from_str(body).unwrap();
        let result = response.into_result("text-embedding-v4").unwrap();

        assert_eq!(result.model, "text-embedding-v4");
        assert_eq!(result.total_tokens, 0);
    }
}

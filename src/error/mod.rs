//! Error types for the embedding gateway

use std::fmt;
use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Result type alias for a single embedding call
pub type EmbedResult<T> = std::result::Result<T, EmbeddingError>;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector database error: {0}")]
    VectorDb(#[from] VectorDbError),

    #[error("Graph database error: {0}")]
    GraphDb(#[from] GraphDbError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Upstream provider an embedding call was routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Text,
    Multimodal,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Text => f.write_str("text"),
            ProviderKind::Multimodal => f.write_str("multimodal"),
        }
    }
}

/// Errors produced by a single embedding call
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("unsupported content type: {0}. Supported types: text, image, multi_images")]
    UnsupportedContentType(String),

    #[error("malformed {content_type} payload: {reason}")]
    MalformedInput {
        content_type: String,
        reason: String,
    },

    #[error("failed to encode provider request: {0}")]
    EncodingFailure(#[source] serde_json::Error),

    #[error("{provider} provider failure: {}", failure_detail(.status, .body))]
    ProviderFailure {
        provider: ProviderKind,
        status: Option<u16>,
        body: String,
    },

    #[error("failed to decode {provider} provider response: {reason}{}", body_excerpt(.body))]
    DecodeFailure {
        provider: ProviderKind,
        reason: String,
        /// Raw response body, truncated to `DECODE_BODY_LIMIT` bytes
        body: String,
    },

    #[error("embedding call cancelled")]
    Cancelled,
}

/// Longest response body excerpt kept on a decode failure
pub const DECODE_BODY_LIMIT: usize = 1024;

fn body_excerpt(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(", body: {}", body)
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= DECODE_BODY_LIMIT {
        return body.to_string();
    }

    let mut end = DECODE_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

fn failure_detail(status: &Option<u16>, body: &str) -> String {
    match status {
        Some(code) => format!("status {}, body: {}", code, body),
        None => body.to_string(),
    }
}

impl EmbeddingError {
    /// Non-success HTTP status from a provider, body kept verbatim
    pub fn provider_status(provider: ProviderKind, status: u16, body: impl Into<String>) -> Self {
        EmbeddingError::ProviderFailure {
            provider,
            status: Some(status),
            body: body.into(),
        }
    }

    /// Call-level failure (connect, TLS, body read) with no HTTP status
    pub fn provider_call(provider: ProviderKind, message: impl fmt::Display) -> Self {
        EmbeddingError::ProviderFailure {
            provider,
            status: None,
            body: message.to_string(),
        }
    }

    /// Response that arrived but does not match the expected schema
    pub fn decode_failure(provider: ProviderKind, reason: impl Into<String>, body: &str) -> Self {
        EmbeddingError::DecodeFailure {
            provider,
            reason: reason.into(),
            body: truncate_body(body),
        }
    }

    /// Attach the raw response body to a decode failure raised without one
    pub fn with_body(self, raw: &str) -> Self {
        match self {
            EmbeddingError::DecodeFailure { provider, reason, body } if body.is_empty() => {
                Self::decode_failure(provider, reason, raw)
            }
            other => other,
        }
    }

    /// Stable label for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            EmbeddingError::UnsupportedContentType(_) => "unsupported_content_type",
            EmbeddingError::MalformedInput { .. } => "malformed_input",
            EmbeddingError::EncodingFailure(_) => "encoding_failure",
            EmbeddingError::ProviderFailure { .. } => "provider_failure",
            EmbeddingError::DecodeFailure { .. } => "decode_failure",
            EmbeddingError::Cancelled => "cancelled",
        }
    }
}

/// Errors related to vector database bootstrap
#[derive(Error, Debug)]
pub enum VectorDbError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Failed to create collection {name}: {reason}")]
    CollectionCreation { name: String, reason: String },

    #[error("Failed to create payload index on {collection}.{field}: {reason}")]
    IndexCreation {
        collection: String,
        field: String,
        reason: String,
    },

    #[error("Qdrant client error: {0}")]
    QdrantError(String),
}

/// Errors related to graph database bootstrap
#[derive(Error, Debug)]
pub enum GraphDbError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Connectivity check failed: {0}")]
    VerificationFailed(String),
}

impl From<config::ConfigError> for GatewayError {
    fn from(err: config::ConfigError) -> Self {
        GatewayError::Config(err.to_string())
    }
}

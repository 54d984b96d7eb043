//! Caller-facing request shape and content-type discriminator

use crate::error::{EmbedResult, EmbeddingError};
use std::fmt;
use std::str::FromStr;

/// Discriminator selecting which provider path a request takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Text,
    Image,
    MultiImages,
}

impl ContentType {
    pub const ALL: [ContentType; 3] =
        [ContentType::Text, ContentType::Image, ContentType::MultiImages];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::MultiImages => "multi_images",
        }
    }

    /// Whether this content goes to the multimodal provider
    pub fn is_multimodal(&self) -> bool {
        !matches!(self, ContentType::Text)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentType::Text),
            "image" => Ok(ContentType::Image),
            "multi_images" => Ok(ContentType::MultiImages),
            other => Err(EmbeddingError::UnsupportedContentType(other.to_string())),
        }
    }
}

/// Content to embed. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingRequest {
    Text(String),
    Image(String),
    MultiImage(Vec<String>),
}

impl EmbeddingRequest {
    pub fn text(content: impl Into<String>) -> Self {
        EmbeddingRequest::Text(content.into())
    }

    pub fn image(url: impl Into<String>) -> Self {
        EmbeddingRequest::Image(url.into())
    }

    pub fn multi_image<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EmbeddingRequest::MultiImage(urls.into_iter().map(Into::into).collect())
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            EmbeddingRequest::Text(_) => ContentType::Text,
            EmbeddingRequest::Image(_) => ContentType::Image,
            EmbeddingRequest::MultiImage(_) => ContentType::MultiImages,
        }
    }

    /// Build a request from the string calling convention: a discriminator
    /// plus a payload. For `multi_images` the payload is a JSON array of URLs.
    pub fn from_parts(content_type: &str, payload: &str) -> EmbedResult<Self> {
        match content_type.parse::<ContentType>()? {
            ContentType::Text => Ok(EmbeddingRequest::Text(payload.to_string())),
            ContentType::Image => Ok(EmbeddingRequest::Image(payload.to_string())),
            ContentType::MultiImages => {
                let urls: Vec<String> = serde_json::from_str(payload).map_err(|e| {
                    EmbeddingError::MalformedInput {
                        content_type: ContentType::MultiImages.to_string(),
                        reason: format!("expected a JSON array of URLs: {}", e),
                    }
                })?;
                Ok(EmbeddingRequest::MultiImage(urls))
            }
        }
    }
}

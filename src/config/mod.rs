//! Configuration management for the embedding gateway

use serde::{Deserialize, Serialize};
use std::path::Path;
use secrecy::{Secret, ExposeSecret};

pub mod loader;
pub mod validation;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    pub vector_db: VectorDbConfig,
    pub graph_db: GraphDbConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Embedding provider settings, shared read-only by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Bearer token for both providers (secured)
    #[serde(serialize_with = "serialize_secret", deserialize_with = "deserialize_secret")]
    pub api_key: Secret<String>,

    /// OpenAI-compatible base URL for text embeddings
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Full endpoint URL for multimodal embeddings
    #[serde(default = "default_multimodal_base_url")]
    pub multimodal_base_url: String,

    #[serde(default = "default_text_model")]
    pub text_model: String,

    #[serde(default = "default_multimodal_model")]
    pub multimodal_model: String,

    /// Target vector dimensionality
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Caller identity tag sent with text embedding calls
    #[serde(default = "default_user_tag")]
    pub user_tag: String,
}

/// Configuration for the Qdrant vector database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDbConfig {
    /// Qdrant server URL
    #[serde(default = "default_vector_db_url")]
    pub url: String,

    /// API key (optional, secured)
    #[serde(default, serialize_with = "serialize_optional_secret", deserialize_with = "deserialize_optional_secret")]
    pub api_key: Option<Secret<String>>,

    /// Logical database name, used as the collection name prefix
    #[serde(default = "default_database")]
    pub database: String,

    /// Vector dimension of the recall collections
    #[serde(default = "default_dimensions")]
    pub vector_size: usize,

    /// Distance metric
    #[serde(default)]
    pub distance: Distance,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Distance metrics supported
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Distance {
    #[default]
    Cosine,
    Euclidean,
    Dot,
}

/// Configuration for the Neo4j graph database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDbConfig {
    /// Bolt or neo4j URI
    #[serde(default = "default_graph_uri")]
    pub uri: String,

    #[serde(default = "default_graph_user")]
    pub username: String,

    #[serde(serialize_with = "serialize_secret", deserialize_with = "deserialize_secret")]
    pub password: Secret<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Server host
    #[serde(default = "default_server_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            host: default_server_host(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json, compact or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_base_url() -> String { "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string() }
fn default_multimodal_base_url() -> String {
    "https://dashscope.aliyuncs.com/api/v1/services/embeddings/multimodal-embedding/multimodal-embedding".to_string()
}
fn default_text_model() -> String { "text-embedding-v4".to_string() }
fn default_multimodal_model() -> String { "qwen2.5-vl-embedding".to_string() }
fn default_dimensions() -> usize { 2048 }
fn default_user_tag() -> String { "user-neo".to_string() }
fn default_vector_db_url() -> String { "http://localhost:6334".to_string() }
fn default_database() -> String { "default".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_graph_uri() -> String { "neo4j://localhost:7687".to_string() }
fn default_graph_user() -> String { "neo4j".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }
fn default_server_port() -> u16 { 8080 }
fn default_server_host() -> String { "0.0.0.0".to_string() }

impl Config {
    /// Load configuration from a TOML or YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let config = loader::load_config_with_env(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Validate this configuration
    pub fn validate(&self) -> crate::error::Result<()> {
        validation::validate_config(self)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                api_key: Secret::new(std::env::var("DASHSCOPE_API_KEY").unwrap_or_default()),
                base_url: default_base_url(),
                multimodal_base_url: default_multimodal_base_url(),
                text_model: default_text_model(),
                multimodal_model: default_multimodal_model(),
                dimensions: default_dimensions(),
                user_tag: default_user_tag(),
            },
            vector_db: VectorDbConfig {
                url: default_vector_db_url(),
                api_key: None,
                database: default_database(),
                vector_size: default_dimensions(),
                distance: Distance::default(),
                timeout_secs: default_timeout(),
            },
            graph_db: GraphDbConfig {
                uri: default_graph_uri(),
                username: default_graph_user(),
                password: Secret::new(String::new()),
            },
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Custom serializer for Secret<String>
fn serialize_secret<S>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(secret.expose_secret())
}

/// Custom deserializer for Secret<String>
fn deserialize_secret<'de, D>(deserializer: D) -> Result<Secret<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(Secret::new(s))
}

/// Custom serializer for Option<Secret<String>>
fn serialize_optional_secret<S>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Custom deserializer for Option<Secret<String>>
fn deserialize_optional_secret<'de, D>(deserializer: D) -> Result<Option<Secret<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.map(Secret::new))
}

//! Configuration validation

use super::*;
use crate::error::{GatewayError, Result};

const MAX_DIMENSIONS: usize = 4096;
const GRAPH_URI_SCHEMES: &[&str] = &["bolt", "bolt+s", "bolt+ssc", "neo4j", "neo4j+s", "neo4j+ssc"];

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_provider_config(&config.provider)?;
    validate_vector_db_config(&config.vector_db)?;
    validate_graph_db_config(&config.graph_db)?;
    validate_server_config(&config.server)?;

    if config.vector_db.vector_size != config.provider.dimensions {
        return Err(GatewayError::Config(format!(
            "Vector size {} does not match provider dimensions {}",
            config.vector_db.vector_size, config.provider.dimensions
        )));
    }

    Ok(())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Validate embedding provider configuration
pub fn validate_provider_config(config: &ProviderConfig) -> Result<()> {
    if config.api_key.expose_secret().is_empty() {
        return Err(GatewayError::Config(
            "Provider API key is required".to_string()
        ));
    }

    if !is_http_url(&config.base_url) {
        return Err(GatewayError::Config(
            "Text embedding base URL must start with http:// or https://".to_string()
        ));
    }

    if !is_http_url(&config.multimodal_base_url) {
        return Err(GatewayError::Config(
            "Multimodal embedding URL must start with http:// or https://".to_string()
        ));
    }

    if config.text_model.trim().is_empty() || config.multimodal_model.trim().is_empty() {
        return Err(GatewayError::Config(
            "Text and multimodal model identifiers cannot be empty".to_string()
        ));
    }

    if config.dimensions == 0 {
        return Err(GatewayError::Config(
            "Embedding dimensions must be greater than 0".to_string()
        ));
    }

    if config.dimensions > MAX_DIMENSIONS {
        return Err(GatewayError::Config(
            format!("Embedding dimensions too large (max: {})", MAX_DIMENSIONS)
        ));
    }

    Ok(())
}

/// Validate vector database configuration
fn validate_vector_db_config(config: &VectorDbConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(GatewayError::Config(
            "Vector database URL cannot be empty".to_string()
        ));
    }

    if !is_http_url(&config.url) {
        return Err(GatewayError::Config(
            "Vector database URL must start with http:// or https://".to_string()
        ));
    }

    if config.database.trim().is_empty() {
        return Err(GatewayError::Config(
            "Vector database name cannot be empty".to_string()
        ));
    }

    if config.vector_size == 0 || config.vector_size > MAX_DIMENSIONS {
        return Err(GatewayError::Config(
            format!("Vector size must be between 1 and {}", MAX_DIMENSIONS)
        ));
    }

    if config.timeout_secs == 0 {
        return Err(GatewayError::Config(
            "Database timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate graph database configuration
fn validate_graph_db_config(config: &GraphDbConfig) -> Result<()> {
    let scheme = config.uri.split("://").next().unwrap_or_default();
    if !config.uri.contains("://") || !GRAPH_URI_SCHEMES.contains(&scheme) {
        return Err(GatewayError::Config(format!(
            "Graph database URI must use one of: {}",
            GRAPH_URI_SCHEMES.join(", ")
        )));
    }

    if config.username.is_empty() {
        return Err(GatewayError::Config(
            "Graph database username cannot be empty".to_string()
        ));
    }

    Ok(())
}

/// Validate server configuration
pub fn validate_server_config(config: &ServerConfig) -> Result<()> {
    if config.port == 0 {
        return Err(GatewayError::Config(
            "Server port cannot be 0".to_string()
        ));
    }

    if config.host.is_empty() {
        return Err(GatewayError::Config(
            "Server host cannot be empty".to_string()
        ));
    }

    Ok(())
}

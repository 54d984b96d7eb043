//! Configuration loader with environment variable support

use super::Config;
use crate::error::Result;
use config::{Environment, File};
use std::path::Path;
use tracing::debug;

/// Environment variable prefix, e.g. `EMBEDDING_GATEWAY__PROVIDER__API_KEY`
pub const ENV_PREFIX: &str = "EMBEDDING_GATEWAY";

/// Load configuration from a file; the format follows the extension (toml, yaml)
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    debug!("Loading configuration from {}", path.as_ref().display());

    let config = config::Config::builder()
        .add_source(File::from(path.as_ref()))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    Ok(cfg)
}

/// Load configuration from a file with environment variable overrides
pub fn load_config_with_env<P: AsRef<Path>>(path: P) -> Result<Config> {
    debug!("Loading configuration from {} with {} overrides", path.as_ref().display(), ENV_PREFIX);

    let config = config::Config::builder()
        .add_source(File::from(path.as_ref()))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
        )
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    Ok(cfg)
}

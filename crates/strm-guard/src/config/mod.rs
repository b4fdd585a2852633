//! Configuration types for strm-guard.

mod error_handler;
mod listen;
mod upstream;

use std::path::Path;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub use error_handler::{
    default_error_mappings, ErrorHandlerConfig, ErrorMapping, DEFAULT_STRM_PATH,
    DEFAULT_VIDEO_PATH,
};
pub use listen::ListenConfig;
pub use upstream::{ConnectionPoolConfig, UpstreamConfig};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub listen: ListenConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub connection_pool: ConnectionPoolConfig,
    /// Error-video interception settings; hot-reloadable
    #[serde(default)]
    pub error_handler: ErrorHandlerConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upstream.validate()?;
        self.error_handler.validate()?;
        Ok(())
    }
}

//! Error types for configuration loading and upstream forwarding.

use std::path::PathBuf;

/// Errors raised while loading or validating configuration.
///
/// Any of these prevents a configuration snapshot from being activated.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("error_mapping entry {index} has an empty pattern")]
    EmptyPattern { index: usize },
    #[error("error_mapping entry '{pattern}' has an empty video filename")]
    EmptyVideo { pattern: String },
    #[error("Invalid upstream URL '{url}': {reason}")]
    InvalidUpstream { url: String, reason: String },
    #[error("Failed to build error pattern matcher: {0}")]
    Matcher(#[from] aho_corasick::BuildError),
}

/// Errors raised by the upstream forwarder.
///
/// These surface through the middleware untouched and are turned into a
/// 502 by the server.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Failed to build upstream request for '{uri}': {source}")]
    InvalidRequest {
        uri: String,
        #[source]
        source: hyper::http::Error,
    },
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

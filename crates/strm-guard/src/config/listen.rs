//! Listener configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    /// Address to bind (default: all interfaces)
    #[serde(default = "default_listen_host")]
    pub host: String,
    pub port: u16,
}

fn default_listen_host() -> String {
    "0.0.0.0".to_string()
}

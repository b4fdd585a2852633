//! Upstream and connection pool configuration.

use crate::error::ConfigError;
use hyper::Uri;
use serde::{Deserialize, Serialize};

/// The backend serving the STRM endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL, e.g. `http://zurg:9999`. Request path and query are appended.
    pub url: String,
}

impl UpstreamConfig {
    /// Base URL without a trailing slash, ready for `{base}{path_and_query}`.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Validate that the URL has a supported scheme and an authority
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidUpstream {
            url: self.url.clone(),
            reason: reason.to_string(),
        };

        let uri: Uri = self.url.parse().map_err(|_| invalid("not a valid URI"))?;
        match uri.scheme_str() {
            Some("http") | Some("https") => {}
            Some(other) => {
                return Err(invalid(&format!(
                    "unsupported scheme '{other}', expected http or https"
                )))
            }
            None => return Err(invalid("missing scheme")),
        }
        if uri.authority().is_none() {
            return Err(invalid("missing host"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionPoolConfig {
    #[serde(default = "default_pool_max_idle_per_host")]
    pub max_idle_per_host: usize,

    #[serde(default = "default_pool_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_keepalive_timeout")]
    pub keepalive_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: default_pool_max_idle_per_host(),
            idle_timeout_secs: default_pool_idle_timeout(),
            keepalive_timeout_secs: default_keepalive_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_pool_max_idle_per_host() -> usize {
    32
}

fn default_pool_idle_timeout() -> u64 {
    90
}

fn default_keepalive_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(url: &str) -> UpstreamConfig {
        UpstreamConfig {
            url: url.to_string(),
        }
    }

    #[test]
    fn test_valid_upstreams() {
        assert!(upstream("http://zurg:9999").validate().is_ok());
        assert!(upstream("https://debrid.example.com").validate().is_ok());
    }

    #[test]
    fn test_missing_scheme_rejected() {
        assert!(matches!(
            upstream("zurg:9999").validate(),
            Err(ConfigError::InvalidUpstream { .. })
        ));
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        let err = upstream("ftp://zurg").validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        assert_eq!(upstream("http://zurg:9999/").base_url(), "http://zurg:9999");
    }
}

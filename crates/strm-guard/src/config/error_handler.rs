//! Error-video handler configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Directory redirects point into when `video_path` is not set.
pub const DEFAULT_VIDEO_PATH: &str = "/etc/zurg/zurg.git/error_videos";

/// Prefix intercepted when `strm_paths` is not set.
pub const DEFAULT_STRM_PATH: &str = "/strm/";

/// Built-in pattern table, evaluated top to bottom.
const DEFAULT_ERROR_MAPPINGS: &[(&str, &str)] = &[
    ("all tokens are expired", "token_expired.mp4"),
    ("bytes_limit_reached", "quota_exceeded.mp4"),
    ("invalid_download_code", "expired_link.mp4"),
    ("failed_generation", "generation_failed.mp4"),
    ("traffic_exhausted", "traffic_limit.mp4"),
    ("unrestrict link request failed", "network_error.mp4"),
    ("unreadable body", "server_error.mp4"),
    ("undecodable response", "server_error.mp4"),
    ("timeout", "timeout_error.mp4"),
    ("connection reset by peer", "network_error.mp4"),
    ("EOF", "network_error.mp4"),
    ("broken pipe", "network_error.mp4"),
];

/// A single `pattern -> video` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorMapping {
    /// Substring searched for (case-insensitive) in a 500 response body
    pub pattern: String,
    /// Video filename, relative to `video_path`
    pub video: String,
}

impl ErrorMapping {
    pub fn new(pattern: impl Into<String>, video: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            video: video.into(),
        }
    }
}

/// Settings for the error-video middleware.
///
/// Every field is optional. `None` means "use the built-in default", while an
/// explicitly empty `strm_paths` list disables interception entirely.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ErrorHandlerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strm_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_mapping: Option<Vec<ErrorMapping>>,
}

impl ErrorHandlerConfig {
    /// Base path for redirect targets. An empty string counts as unset.
    pub fn video_path(&self) -> &str {
        match self.video_path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => DEFAULT_VIDEO_PATH,
        }
    }

    pub fn strm_paths(&self) -> Vec<String> {
        self.strm_paths
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_STRM_PATH.to_string()])
    }

    pub fn error_mappings(&self) -> Vec<ErrorMapping> {
        self.error_mapping
            .clone()
            .unwrap_or_else(default_error_mappings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, mapping) in self.error_mappings().iter().enumerate() {
            if mapping.pattern.is_empty() {
                return Err(ConfigError::EmptyPattern { index });
            }
            if mapping.video.trim().is_empty() {
                return Err(ConfigError::EmptyVideo {
                    pattern: mapping.pattern.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The built-in mapping table, in evaluation order.
pub fn default_error_mappings() -> Vec<ErrorMapping> {
    DEFAULT_ERROR_MAPPINGS
        .iter()
        .map(|(pattern, video)| ErrorMapping::new(*pattern, *video))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = ErrorHandlerConfig::default();
        assert_eq!(config.video_path(), DEFAULT_VIDEO_PATH);
        assert_eq!(config.strm_paths(), vec!["/strm/".to_string()]);
        assert_eq!(config.error_mappings().len(), 12);
        assert_eq!(
            config.error_mappings()[0],
            ErrorMapping::new("all tokens are expired", "token_expired.mp4")
        );
    }

    #[test]
    fn test_empty_video_path_uses_default() {
        let config = ErrorHandlerConfig {
            video_path: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.video_path(), DEFAULT_VIDEO_PATH);
    }

    #[test]
    fn test_explicit_empty_strm_paths_is_kept() {
        let config = ErrorHandlerConfig {
            strm_paths: Some(vec![]),
            ..Default::default()
        };
        assert!(config.strm_paths().is_empty());
    }

    #[test]
    fn test_configured_mappings_replace_defaults() {
        let config = ErrorHandlerConfig {
            error_mapping: Some(vec![ErrorMapping::new("quota", "quota.mp4")]),
            ..Default::default()
        };
        assert_eq!(
            config.error_mappings(),
            vec![ErrorMapping::new("quota", "quota.mp4")]
        );
    }

    #[test]
    fn test_validate_rejects_empty_pattern() {
        let config = ErrorHandlerConfig {
            error_mapping: Some(vec![
                ErrorMapping::new("ok", "ok.mp4"),
                ErrorMapping::new("", "blank.mp4"),
            ]),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyPattern { index: 1 })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_video() {
        let config = ErrorHandlerConfig {
            error_mapping: Some(vec![ErrorMapping::new("timeout", "  ")]),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyVideo { .. })
        ));
    }

    #[test]
    fn test_default_table_is_valid() {
        assert!(ErrorHandlerConfig::default().validate().is_ok());
    }
}

//! Error handler hot-reload.
//!
//! On `SIGHUP` the configuration file is read again and only its
//! `error_handler` section is applied; listener and upstream changes need a
//! restart. An unreadable or invalid file leaves the running snapshot in place.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::error::ConfigError;
use crate::intercept::SharedSnapshot;

/// Re-read `config_path` and swap the error handler snapshot.
pub fn reload_error_handler(
    snapshot: &SharedSnapshot,
    config_path: &Path,
) -> Result<(), ConfigError> {
    let config = Config::from_file(config_path)?;
    snapshot.replace(&config.error_handler)?;
    info!("Error handler reloaded from {}", config_path.display());
    Ok(())
}

/// Spawn a task that reloads on every `SIGHUP`.
#[cfg(unix)]
pub fn spawn_sighup_reload(
    config_path: PathBuf,
    snapshot: SharedSnapshot,
) -> std::io::Result<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    Ok(tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            info!("SIGHUP received, reloading error handler...");
            if let Err(e) = reload_error_handler(&snapshot, &config_path) {
                warn!("Error handler reload failed (keeping current rules): {}", e);
            }
        }
    }))
}

/// SIGHUP does not exist here; reloads are unavailable.
#[cfg(not(unix))]
pub fn spawn_sighup_reload(
    _config_path: PathBuf,
    _snapshot: SharedSnapshot,
) -> std::io::Result<tokio::task::JoinHandle<()>> {
    Ok(tokio::spawn(async {}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorHandlerConfig;

    fn write_config(file: &tempfile::NamedTempFile, error_handler: &str) {
        let yaml = format!(
            r#"
listen:
  port: 8080
upstream:
  url: "http://zurg:9999"
{error_handler}
"#
        );
        std::fs::write(file.path(), yaml).unwrap();
    }

    #[test]
    fn test_reload_swaps_rules() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let snapshot = SharedSnapshot::from_config(&ErrorHandlerConfig::default()).unwrap();

        write_config(
            &file,
            r#"error_handler:
  video_path: /videos
  error_mapping:
    - pattern: "bandwidth"
      video: bandwidth.mp4"#,
        );
        reload_error_handler(&snapshot, file.path()).unwrap();

        let current = snapshot.load();
        assert_eq!(current.video_path, "/videos");
        assert_eq!(current.classifier.len(), 1);
    }

    #[test]
    fn test_invalid_reload_keeps_previous() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_config(
            &file,
            r#"error_handler:
  error_mapping:
    - pattern: ""
      video: nothing.mp4"#,
        );
        let snapshot = SharedSnapshot::from_config(&ErrorHandlerConfig::default()).unwrap();

        let result = reload_error_handler(&snapshot, file.path());
        assert!(matches!(result, Err(ConfigError::EmptyPattern { .. })));
        assert_eq!(snapshot.load().classifier.len(), 12);
    }

    #[test]
    fn test_missing_file_keeps_previous() {
        let snapshot = SharedSnapshot::from_config(&ErrorHandlerConfig::default()).unwrap();
        let result = reload_error_handler(&snapshot, Path::new("/nonexistent/strm-guard.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
        assert_eq!(
            snapshot.load().video_path,
            "/etc/zurg/zurg.git/error_videos"
        );
    }
}

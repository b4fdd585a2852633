//! Immutable interception settings and their hot-swappable holder.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use super::classifier::ErrorClassifier;
use super::paths::PathPrefixSet;
use crate::config::ErrorHandlerConfig;
use crate::error::ConfigError;

/// Everything a request needs to decide and act, compiled once.
#[derive(Debug)]
pub struct InterceptSnapshot {
    pub prefixes: PathPrefixSet,
    pub classifier: ErrorClassifier,
    pub video_path: String,
}

impl InterceptSnapshot {
    pub fn from_config(config: &ErrorHandlerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            prefixes: PathPrefixSet::new(config.strm_paths()),
            classifier: ErrorClassifier::new(&config.error_mappings())?,
            video_path: config.video_path().to_string(),
        })
    }
}

/// Shared handle to the live snapshot.
///
/// Readers take a full `Arc` per request and never block; `replace` builds the
/// new snapshot first and publishes it in one atomic store, so a request sees
/// either the old rule set or the new one, never a mix.
#[derive(Debug, Clone)]
pub struct SharedSnapshot {
    current: Arc<ArcSwap<InterceptSnapshot>>,
}

impl SharedSnapshot {
    pub fn new(snapshot: InterceptSnapshot) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(snapshot)),
        }
    }

    pub fn from_config(config: &ErrorHandlerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(InterceptSnapshot::from_config(config)?))
    }

    pub fn load(&self) -> Arc<InterceptSnapshot> {
        self.current.load_full()
    }

    /// Compile `config` and swap it in. On error the live snapshot is untouched.
    pub fn replace(&self, config: &ErrorHandlerConfig) -> Result<(), ConfigError> {
        let snapshot = InterceptSnapshot::from_config(config)?;
        info!(
            rules = snapshot.classifier.len(),
            prefixes = ?snapshot.prefixes.as_slice(),
            video_path = %snapshot.video_path,
            "Error handler configuration swapped"
        );
        self.current.store(Arc::new(snapshot));
        Ok(())
    }
}

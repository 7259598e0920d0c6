//! Shared, atomically-swappable pipeline configuration handle.

use crate::config::PipelineConfig;
use crate::error::{ConfigResult, QueryError, QueryResult};
use std::sync::{Arc, RwLock};
use tracing::info;

/// Cloneable handle to the currently-loaded pipeline configuration.
///
/// A reload builds the replacement configuration completely before
/// taking the write lock, so the lock is held only for the pointer swap.
/// Readers take a snapshot `Arc` and keep querying the configuration
/// they started with even if a reload lands mid-flight; a partially
/// populated registry is never observable.
#[derive(Debug, Clone, Default)]
pub struct SharedPipelineConfig {
    current: Arc<RwLock<Option<Arc<PipelineConfig>>>>,
}

impl SharedPipelineConfig {
    /// Creates a handle with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the loaded configuration with one built from `text`.
    ///
    /// On error the previously-loaded configuration stays in place and
    /// remains queryable.
    pub fn load_json_str(&self, text: &str) -> ConfigResult<()> {
        let cfg = Arc::new(PipelineConfig::from_json_str(text)?);
        info!(
            tables = cfg.tables.len(),
            actions = cfg.actions.len(),
            "pipeline configuration swapped in"
        );
        // The guard only ever brackets this one assignment, so a
        // poisoned lock still holds a fully-swapped pointer.
        match self.current.write() {
            Ok(mut guard) => *guard = Some(cfg),
            Err(poisoned) => *poisoned.into_inner() = Some(cfg),
        }
        Ok(())
    }

    /// Snapshot of the currently-loaded configuration.
    ///
    /// Fails with [`QueryError::NotLoaded`] until the first successful
    /// load.
    pub fn snapshot(&self) -> QueryResult<Arc<PipelineConfig>> {
        let guard = match self.current.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone().ok_or(QueryError::NotLoaded)
    }

    /// Returns true once a configuration has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_ok()
    }
}

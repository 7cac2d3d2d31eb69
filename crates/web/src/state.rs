//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::PollsConfig;
use crate::db::PollStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PollsConfig,
    store: PollStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: PollsConfig, store: impl Into<PollStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: store.into(),
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &PollsConfig {
        &self.inner.config
    }

    /// Get a reference to the poll store.
    #[must_use]
    pub fn store(&self) -> &PollStore {
        &self.inner.store
    }
}

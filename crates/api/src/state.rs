//! Application state shared across handlers.

use std::sync::Arc;

use crate::store::Store;

/// Application state shared across all handlers.
///
/// Cheaply cloneable; every clone points at the same store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn Store>,
}

impl AppState {
    /// Create a new application state around a store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Get the store services should run against.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }
}

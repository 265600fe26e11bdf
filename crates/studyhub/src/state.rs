//! Application state shared across HTTP handlers

use studyhub_core::{PageNumberPagination, Store};

use crate::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database handle
    pub store: Store,
    /// Pagination policy for list endpoints; `None` disables paging
    pub pagination: Option<PageNumberPagination>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store,
            pagination: config.pagination.strategy(),
        }
    }
}

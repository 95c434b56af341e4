//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::store::UserStore;

/// Shared application state passed to all handlers.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn UserStore>) -> Self {
        Self { config, store }
    }
}

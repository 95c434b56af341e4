pub mod memory_store;

pub use memory_store::MemoryUserStore;

use std::sync::Arc;

use axum::Router;

use crate::config::{Config, DatabaseConfig, LoggingConfig};
use crate::store::UserStore;
use crate::AppState;

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3000,
        database: DatabaseConfig {
            url: "mem://".to_string(),
            namespace: "test".to_string(),
            database: "test".to_string(),
            username: None,
            password: None,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}

/// Application state over the given store.
pub fn create_test_state(store: Arc<dyn UserStore>) -> Arc<AppState> {
    Arc::new(AppState::new(test_config(), store))
}

/// Full application router backed by a fresh in-memory store.
pub fn test_app() -> (Router, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let app = crate::app(create_test_state(store.clone()));
    (app, store)
}

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;
pub mod store;
pub mod test_util;

pub use config::{Config, DatabaseConfig, LoggingConfig};
pub use error::{ApiError, ErrorResponse};
pub use state::AppState;
pub use store::{StoreError, SurrealUserStore, UserStore};

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::users::router(state.clone()))
        .merge(routes::health::router())
        .merge(routes::docs::router(&state.config))
        .layer(middleware::from_fn(logging::request_logger))
        .layer(TraceLayer::new_for_http())
}

//! Users API - CRUD over user records stored in SurrealDB.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use user_api_backend::{logging, AppState, Config, SurrealUserStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Check config.toml and USER_API__* environment variables.",
            e
        )
    })?;

    logging::init_tracing(&config.logging.level);
    tracing::info!("Starting Users API");

    // The server listens even if the database is unreachable; requests
    // then fail individually until a connection exists.
    let store = Arc::new(SurrealUserStore::new(config.database.clone()));
    {
        let store = store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.connect().await {
                tracing::error!("Failed to connect to database: {}", e);
            }
        });
    }

    let state = Arc::new(AppState::new(config.clone(), store));
    let app = user_api_backend::app(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Dropping the router released the last handle on the database client.
    tracing::info!("Server stopped, database connection closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

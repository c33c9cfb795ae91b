use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todos_api::config::{ServerConfig, StoreBackend, StoreConfig};
use todos_api::router::build_app_router;
use todos_api::state::AppState;
use todos_core::clock::SystemClock;
use todos_db::repositories::{InMemoryTodoRepo, ScyllaTodoRepo, TodoRepo};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    init_tracing(config.log_json);
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let todos = open_store(&config.store).await;

    // --- App state ---
    let state = AppState {
        todos: Arc::clone(&todos),
        clock: Arc::new(SystemClock),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, closing store");
    todos.close().await;

    tracing::info!("Graceful shutdown complete");
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "todos_api=debug,todos_db=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Open the configured store. Any failure here aborts startup; there is no
/// degraded mode without a store.
async fn open_store(config: &StoreConfig) -> Arc<dyn TodoRepo> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            Arc::new(InMemoryTodoRepo::new())
        }
        StoreBackend::Scylla => {
            let session = todos_db::create_session(
                &config.nodes,
                &config.keyspace,
                Duration::from_secs(config.connect_timeout_secs),
            )
            .await
            .expect("Failed to connect to store");
            tracing::info!(nodes = ?config.nodes, keyspace = %config.keyspace, "Connected to store");

            todos_db::health_check(&session)
                .await
                .expect("Store health check failed");

            let repo = ScyllaTodoRepo::new(session)
                .await
                .expect("Failed to prepare store statements");
            Arc::new(repo)
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

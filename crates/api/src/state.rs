use std::sync::Arc;

use todos_core::clock::Clock;
use todos_db::repositories::TodoRepo;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The store. One long-lived handle shared by every request.
    pub todos: Arc<dyn TodoRepo>,
    /// Source of server-assigned timestamps.
    pub clock: Arc<dyn Clock>,
    /// Server configuration; the router reads CORS and timeout settings here.
    pub config: Arc<ServerConfig>,
}

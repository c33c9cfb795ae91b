//! Store layer for the todo service.
//!
//! Owns the CQL session lifecycle and the [`repositories::TodoRepo`] seam the
//! HTTP layer talks to. Two implementations are provided: one backed by a
//! ScyllaDB/Cassandra cluster and one in memory for tests and local runs.

use std::time::Duration;

use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;

pub mod error;
pub mod models;
pub mod repositories;

pub use error::StoreError;

/// Open a session against the given contact points, bound to `keyspace`.
pub async fn create_session(
    nodes: &[String],
    keyspace: &str,
    connect_timeout: Duration,
) -> Result<Session, StoreError> {
    let session = SessionBuilder::new()
        .known_nodes(nodes)
        .connection_timeout(connect_timeout)
        .use_keyspace(keyspace, false)
        .build()
        .await?;
    Ok(session)
}

/// Run a trivial query to confirm the cluster answers.
pub async fn health_check(session: &Session) -> Result<(), StoreError> {
    session
        .query_unpaged("SELECT release_version FROM system.local", ())
        .await?;
    Ok(())
}

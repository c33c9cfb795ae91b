//! Repository for the `todos` table on ScyllaDB / Cassandra.
//!
//! All statements are prepared once at construction and executed with bound
//! values; no user input is ever spliced into CQL text.
//!
//! Every write is a lightweight transaction (`IF NOT EXISTS`, `IF ...`,
//! `IF EXISTS`). Do not add plain writes: they are ordered by client
//! timestamp, not Paxos, and can resurrect a deleted row.

use async_trait::async_trait;
use scylla::client::session::Session;
use scylla::response::query_result::QueryResult;
use scylla::statement::prepared::PreparedStatement;
use scylla::value::{CqlValue, Row};
use scylla::DeserializeRow;
use tokio::sync::RwLock;
use todos_core::pagination::{Page, MAX_WINDOW};
use todos_core::types::{Timestamp, TodoId};

use crate::error::StoreError;
use crate::models::todo::{Todo, TodoChanges, TodoFilter};
use crate::repositories::TodoRepo;

/// Column list for `todos` queries.
const TODO_COLUMNS: &str = "id, user_id, title, description, status, created, updated";

/// Raw row shape. Text and counter columns may be null when rows were
/// written by other tools, so they decode as `Option` and default on the way
/// out.
#[derive(Debug, DeserializeRow)]
struct TodoRow {
    id: TodoId,
    user_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    created: Option<Timestamp>,
    updated: Option<Timestamp>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        let created = row.created.unwrap_or_default();
        Todo {
            id: row.id,
            user_id: row.user_id.unwrap_or_default(),
            title: row.title.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            status: row.status.unwrap_or_default(),
            created,
            updated: row.updated.unwrap_or(created),
        }
    }
}

struct Statements {
    insert: PreparedStatement,
    select_by_id: PreparedStatement,
    /// Conditional on `created <= updated` so the invariant holds even when
    /// this node's clock lags the one that created the row.
    update_not_before_created: PreparedStatement,
    update_if_exists: PreparedStatement,
    delete: PreparedStatement,
    list_all: PreparedStatement,
    list_by_status: PreparedStatement,
}

impl Statements {
    async fn prepare(session: &Session) -> Result<Self, StoreError> {
        Ok(Self {
            insert: session
                .prepare(format!(
                    "INSERT INTO todos ({TODO_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?) \
                     IF NOT EXISTS"
                ))
                .await?,
            select_by_id: session
                .prepare(format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?"))
                .await?,
            update_not_before_created: session
                .prepare(
                    "UPDATE todos SET title = ?, description = ?, status = ?, updated = ? \
                     WHERE id = ? IF created <= ?",
                )
                .await?,
            update_if_exists: session
                .prepare(
                    "UPDATE todos SET title = ?, description = ?, status = ?, updated = ? \
                     WHERE id = ? IF EXISTS",
                )
                .await?,
            delete: session
                .prepare("DELETE FROM todos WHERE id = ? IF EXISTS")
                .await?,
            list_all: session
                .prepare(format!("SELECT {TODO_COLUMNS} FROM todos LIMIT ?"))
                .await?,
            list_by_status: session
                .prepare(format!(
                    "SELECT {TODO_COLUMNS} FROM todos WHERE status = ? LIMIT ? ALLOW FILTERING"
                ))
                .await?,
        })
    }
}

/// Result of a lightweight-transaction write.
struct Conditional {
    applied: bool,
    /// Current `created` of the row when the condition failed, if returned.
    created: Option<Timestamp>,
}

impl Conditional {
    fn from_result(result: QueryResult) -> Result<Self, StoreError> {
        let rows = result.into_rows_result()?;
        let created_index = rows
            .column_specs()
            .iter()
            .position(|spec| spec.name() == "created");
        let row: Row = rows.first_row()?;

        let applied = matches!(row.columns.first(), Some(Some(CqlValue::Boolean(true))));
        let created = created_index
            .and_then(|index| row.columns.get(index))
            .and_then(|value| match value {
                Some(CqlValue::BigInt(created)) => Some(*created),
                _ => None,
            });

        Ok(Self { applied, created })
    }
}

/// [`TodoRepo`] backed by a CQL session.
///
/// The session sits behind a lock so [`TodoRepo::close`] can take and drop
/// it while in-flight queries finish under read guards.
pub struct ScyllaTodoRepo {
    session: RwLock<Option<Session>>,
    statements: Statements,
}

impl ScyllaTodoRepo {
    /// Prepare every statement against `session` and take ownership of it.
    pub async fn new(session: Session) -> Result<Self, StoreError> {
        let statements = Statements::prepare(&session).await?;
        tracing::debug!("Prepared todo statements");
        Ok(Self {
            session: RwLock::new(Some(session)),
            statements,
        })
    }
}

#[async_trait]
impl TodoRepo for ScyllaTodoRepo {
    async fn insert(&self, todo: &Todo) -> Result<(), StoreError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(StoreError::Closed)?;
        let result = session
            .execute_unpaged(
                &self.statements.insert,
                (
                    todo.id,
                    &todo.user_id,
                    &todo.title,
                    &todo.description,
                    &todo.status,
                    todo.created,
                    todo.updated,
                ),
            )
            .await?;
        if !Conditional::from_result(result)?.applied {
            return Err(StoreError::AlreadyExists(todo.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(StoreError::Closed)?;
        let row = session
            .execute_unpaged(&self.statements.select_by_id, (id,))
            .await?
            .into_rows_result()?
            .maybe_first_row::<TodoRow>()?;
        Ok(row.map(Todo::from))
    }

    async fn update(&self, id: TodoId, changes: &TodoChanges) -> Result<bool, StoreError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(StoreError::Closed)?;

        let first = session
            .execute_unpaged(
                &self.statements.update_not_before_created,
                (
                    &changes.title,
                    &changes.description,
                    &changes.status,
                    changes.updated,
                    id,
                    changes.updated,
                ),
            )
            .await?;
        let first = Conditional::from_result(first)?;
        if first.applied {
            return Ok(true);
        }

        // Either the row is absent, or it was created "after" our clock's
        // now. Pin `updated` to `created` in the latter case; IF EXISTS
        // settles which one it was.
        let updated = first.created.map_or(changes.updated, |created| {
            todos_core::todo::next_updated(created, changes.updated)
        });
        let second = session
            .execute_unpaged(
                &self.statements.update_if_exists,
                (
                    &changes.title,
                    &changes.description,
                    &changes.status,
                    updated,
                    id,
                ),
            )
            .await?;
        Ok(Conditional::from_result(second)?.applied)
    }

    async fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(StoreError::Closed)?;
        // Not applied just means there was nothing to delete.
        session
            .execute_unpaged(&self.statements.delete, (id,))
            .await?;
        Ok(())
    }

    async fn list(&self, filter: &TodoFilter, page: Page) -> Result<Vec<Todo>, StoreError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(StoreError::Closed)?;

        // CQL has no OFFSET: read through the end of the requested page and
        // drop the leading rows here. `Page` caps the window at MAX_WINDOW.
        let limit = page.window().unwrap_or(MAX_WINDOW) as i32;

        let result = match &filter.status {
            Some(status) => {
                session
                    .execute_unpaged(&self.statements.list_by_status, (status, limit))
                    .await?
            }
            None => {
                session
                    .execute_unpaged(&self.statements.list_all, (limit,))
                    .await?
            }
        };

        let todos = result
            .into_rows_result()?
            .rows::<TodoRow>()?
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .map(|row| row.map(Todo::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(todos)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let guard = self.session.read().await;
        let session = guard.as_ref().ok_or(StoreError::Closed)?;
        crate::health_check(session).await
    }

    async fn close(&self) {
        if let Some(session) = self.session.write().await.take() {
            drop(session);
            tracing::info!("Store session closed");
        }
    }
}

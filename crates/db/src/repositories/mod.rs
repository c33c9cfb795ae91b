//! Repository seam between the HTTP layer and the store.
//!
//! Handlers hold an `Arc<dyn TodoRepo>`; production wires in
//! [`ScyllaTodoRepo`], tests and `STORE_BACKEND=memory` wire in
//! [`InMemoryTodoRepo`].

use async_trait::async_trait;
use todos_core::pagination::Page;
use todos_core::types::TodoId;

use crate::error::StoreError;
use crate::models::todo::{Todo, TodoChanges, TodoFilter};

pub mod in_memory;
pub mod todo_repo;

pub use in_memory::InMemoryTodoRepo;
pub use todo_repo::ScyllaTodoRepo;

/// Persistence operations for todos.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait TodoRepo: Send + Sync {
    /// Persist a fully stamped todo. Never overwrites: an existing id fails
    /// with [`StoreError::AlreadyExists`].
    async fn insert(&self, todo: &Todo) -> Result<(), StoreError>;

    /// Fetch a todo by id. `Ok(None)` when no such row exists.
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StoreError>;

    /// Apply `changes` to an existing todo.
    ///
    /// Returns `false` (and writes nothing) when the row does not exist. The
    /// stored `updated` never ends up earlier than `created`.
    async fn update(&self, id: TodoId, changes: &TodoChanges) -> Result<bool, StoreError>;

    /// Remove a todo. Deleting an absent id is not an error.
    async fn delete(&self, id: TodoId) -> Result<(), StoreError>;

    /// One page of todos matching `filter`.
    async fn list(&self, filter: &TodoFilter, page: Page) -> Result<Vec<Todo>, StoreError>;

    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Release the store. Idempotent; later operations fail with
    /// [`StoreError::Closed`].
    async fn close(&self);
}

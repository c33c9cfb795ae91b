//! In-memory [`TodoRepo`] for tests and store-less local runs.
//!
//! Rows are kept in a `BTreeMap` keyed by id; since ids are time-ordered,
//! listing returns todos in creation order.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use todos_core::pagination::Page;
use todos_core::todo::next_updated;
use todos_core::types::TodoId;

use crate::error::StoreError;
use crate::models::todo::{Todo, TodoChanges, TodoFilter};
use crate::repositories::TodoRepo;

#[derive(Debug, Default)]
pub struct InMemoryTodoRepo {
    rows: RwLock<BTreeMap<TodoId, Todo>>,
    closed: AtomicBool,
}

impl InMemoryTodoRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl TodoRepo for InMemoryTodoRepo {
    async fn insert(&self, todo: &Todo) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut rows = self.rows.write().await;
        if rows.contains_key(&todo.id) {
            return Err(StoreError::AlreadyExists(todo.id));
        }
        rows.insert(todo.id, todo.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        self.ensure_open()?;
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update(&self, id: TodoId, changes: &TodoChanges) -> Result<bool, StoreError> {
        self.ensure_open()?;
        let mut rows = self.rows.write().await;
        let Some(todo) = rows.get_mut(&id) else {
            return Ok(false);
        };
        todo.title.clone_from(&changes.title);
        todo.description.clone_from(&changes.description);
        todo.status.clone_from(&changes.status);
        todo.updated = next_updated(todo.created, changes.updated);
        Ok(true)
    }

    async fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.rows.write().await.remove(&id);
        Ok(())
    }

    async fn list(&self, filter: &TodoFilter, page: Page) -> Result<Vec<Todo>, StoreError> {
        self.ensure_open()?;
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|todo| {
                filter
                    .status
                    .as_deref()
                    .is_none_or(|status| todo.status == status)
            })
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.ensure_open()
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::info!("In-memory store closed");
        }
    }
}

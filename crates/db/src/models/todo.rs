//! Todo entity and request payloads.

use serde::{Deserialize, Serialize};
use todos_core::types::{Timestamp, TodoId};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `todos` table, and the JSON shape returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created: Timestamp,
    pub updated: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Body of `POST /todos`.
///
/// Missing fields decode as empty strings so that required-field checks
/// produce a validation message instead of a decoder error. Any `id` or
/// timestamps sent by the client are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

impl CreateTodo {
    /// Stamp server-assigned fields onto the payload.
    pub fn into_todo(self, id: TodoId, now: Timestamp) -> Todo {
        Todo {
            id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            status: self.status,
            created: now,
            updated: now,
        }
    }
}

/// Body of `PUT /todos/{id}`. `user_id` and `created` are not updatable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    #[serde(default)]
    pub id: Option<TodoId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
}

/// Column values written by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: String,
    pub description: String,
    pub status: String,
    pub updated: Timestamp,
}

impl UpdateTodo {
    pub fn into_changes(self, updated: Timestamp) -> TodoChanges {
        TodoChanges {
            title: self.title,
            description: self.description,
            status: self.status,
            updated,
        }
    }
}

/// Query parameters for `GET /todos`.
///
/// Kept as raw strings; parsing happens in `todos_core::pagination`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoListParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
}

/// Row filter applied by the list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// Exact match on `status`; `None` selects every row.
    pub status: Option<String>,
}

impl TodoFilter {
    /// Build a filter from a raw query value; empty means "no filter".
    pub fn from_status(status: Option<&str>) -> Self {
        Self {
            status: status.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }
}

//! Validation rules for todo payloads.
//!
//! Every check here runs before the store is touched, so a rejected request
//! never leaves a partial record behind.

use crate::error::CoreError;
use crate::types::{Timestamp, TodoId};

/// Entity name used in not-found errors.
pub const ENTITY: &str = "Todo";

/// Parse a todo identifier taken from a request path.
pub fn parse_todo_id(raw: &str) -> Result<TodoId, CoreError> {
    TodoId::parse_str(raw.trim())
        .map_err(|_| CoreError::Validation(format!("Invalid todo ID: '{raw}'")))
}

/// Reject empty or whitespace-only values for a required field.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Validate the client-supplied fields of a new todo.
///
/// `title` is checked first so a body missing both fields reports the title.
pub fn validate_new_todo(user_id: &str, title: &str) -> Result<(), CoreError> {
    require_non_blank("title", title)?;
    require_non_blank("user_id", user_id)?;
    Ok(())
}

/// Validate an update payload against the identifier in the request path.
///
/// A body that carries its own `id` must name the same record as the path.
pub fn validate_update(
    path_id: TodoId,
    body_id: Option<TodoId>,
    title: &str,
) -> Result<(), CoreError> {
    if let Some(body_id) = body_id {
        if body_id != path_id {
            return Err(CoreError::Validation(format!(
                "Todo ID mismatch: path has {path_id}, body has {body_id}"
            )));
        }
    }
    require_non_blank("title", title)
}

/// Timestamp to store as `updated` when a record is modified.
///
/// Never earlier than `created`, even if the wall clock stepped backwards.
pub fn next_updated(created: Timestamp, now: Timestamp) -> Timestamp {
    now.max(created)
}

/// Todo primary keys are 128-bit time-ordered UUIDs (version 7).
pub type TodoId = uuid::Uuid;

/// Timestamps are whole seconds since the Unix epoch, UTC.
pub type Timestamp = i64;

/// Generate a fresh, time-ordered todo identifier.
pub fn new_todo_id() -> TodoId {
    uuid::Uuid::now_v7()
}

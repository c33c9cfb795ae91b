//! Route definitions for the todo resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::todos;
use crate::state::AppState;

/// Todo routes, mounted at the root.
///
/// ```text
/// POST   /todos        -> create_todo
/// GET    /todos        -> list_todos
/// GET    /todos/{id}   -> get_todo
/// PUT    /todos/{id}   -> update_todo
/// DELETE /todos/{id}   -> delete_todo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/todos/{id}",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
}

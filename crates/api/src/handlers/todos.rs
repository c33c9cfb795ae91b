//! Handlers for the todo resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use todos_core::error::CoreError;
use todos_core::pagination::Page;
use todos_core::todo::{parse_todo_id, validate_new_todo, validate_update, ENTITY};
use todos_core::types::{new_todo_id, TodoId};
use todos_db::models::todo::{CreateTodo, TodoFilter, TodoListParams, UpdateTodo};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::json_response;
use crate::state::AppState;

fn not_found(id: TodoId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// POST /todos
///
/// Validates the payload, stamps id and timestamps, and persists the record.
pub async fn create_todo(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateTodo>,
) -> AppResult<Response> {
    validate_new_todo(&input.user_id, &input.title)?;

    let todo = input.into_todo(new_todo_id(), state.clock.now());
    state.todos.insert(&todo).await?;

    tracing::info!(todo_id = %todo.id, user_id = %todo.user_id, "Todo created");

    json_response(StatusCode::CREATED, &todo)
}

/// GET /todos/{id}
pub async fn get_todo(
    State(state): State<AppState>,
    ApiPath(raw_id): ApiPath<String>,
) -> AppResult<Response> {
    let id = parse_todo_id(&raw_id)?;

    let todo = state
        .todos
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    json_response(StatusCode::OK, &todo)
}

/// PUT /todos/{id}
///
/// Replaces title, description and status. The record must already exist;
/// `user_id` and `created` are never touched.
pub async fn update_todo(
    State(state): State<AppState>,
    ApiPath(raw_id): ApiPath<String>,
    ApiJson(input): ApiJson<UpdateTodo>,
) -> AppResult<impl IntoResponse> {
    let id = parse_todo_id(&raw_id)?;
    validate_update(id, input.id, &input.title)?;

    let changes = input.into_changes(state.clock.now());
    if !state.todos.update(id, &changes).await? {
        return Err(not_found(id));
    }

    tracing::info!(todo_id = %id, "Todo updated");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /todos/{id}
///
/// Idempotent: deleting an unknown id still answers 204.
pub async fn delete_todo(
    State(state): State<AppState>,
    ApiPath(raw_id): ApiPath<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_todo_id(&raw_id)?;

    state.todos.delete(id).await?;

    tracing::info!(todo_id = %id, "Todo deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /todos?page=&size=&status=&sort=
///
/// `sort` is accepted for compatibility but does not affect ordering.
pub async fn list_todos(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TodoListParams>,
) -> AppResult<Response> {
    let page = Page::parse(params.page.as_deref(), params.size.as_deref())?;

    if let Some(sort) = params.sort.as_deref().filter(|s| !s.is_empty()) {
        tracing::debug!(sort, "Ignoring unsupported sort parameter");
    }

    let filter = TodoFilter::from_status(params.status.as_deref());
    let todos = state.todos.list(&filter, page).await?;

    json_response(StatusCode::OK, &todos)
}

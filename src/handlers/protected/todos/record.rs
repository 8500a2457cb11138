use axum::{
    extract::{Path, State},
    Extension,
};

use crate::database::models::Todo;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

/// GET /todos/:id - 404 if it does not exist, 403 if it is not the caller's
pub async fn todo_get(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    path: Path<String>,
) -> ApiResult<Todo> {
    let id = parse_id(path)?;
    let todo = state.todos.show(caller.user.id, id).await?;
    Ok(ApiResponse::success(todo))
}

/// PUT/PATCH /todos/:id - Partial update
///
/// Only the keys present in the body are written. `description` and
/// `due_date` accept `null` to clear them; `title` does not.
pub async fn todo_put(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    path: Path<String>,
    JsonBody(payload): JsonBody,
) -> ApiResult<Todo> {
    let id = parse_id(path)?;
    let todo = state.todos.update(caller.user.id, id, &payload).await?;
    Ok(ApiResponse::success(todo))
}

/// DELETE /todos/:id - 204 with an empty body
pub async fn todo_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    path: Path<String>,
) -> ApiResult<()> {
    let id = parse_id(path)?;
    state.todos.destroy(caller.user.id, id).await?;
    Ok(ApiResponse::no_content())
}

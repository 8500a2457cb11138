use axum::{extract::State, Extension};

use crate::database::models::Todo;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

/// GET /todos - Every todo the caller owns
///
/// Ordered by due date, latest first with undated todos last, then by
/// creation time, newest first. Not paginated.
pub async fn todos_get(State(state): State<AppState>, Extension(caller): Extension<AuthUser>) -> ApiResult<Vec<Todo>> {
    let todos = state.todos.list(caller.user.id).await?;
    Ok(ApiResponse::success(todos))
}

/// POST /todos - Create a todo owned by the caller
///
/// Expected Input:
/// ```json
/// {
///   "title": "string",           // Required, at most 255 characters
///   "description": "string",     // Optional, nullable
///   "completed": false,          // Optional, defaults to false
///   "due_date": "2025-08-15"     // Optional, nullable
/// }
/// ```
///
/// Responds 201 with the stored todo, or 422 with per-field `errors`.
pub async fn todos_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    JsonBody(payload): JsonBody,
) -> ApiResult<Todo> {
    let todo = state.todos.create(caller.user.id, &payload).await?;
    Ok(ApiResponse::created(todo))
}

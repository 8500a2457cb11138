// handlers/public/auth/register.rs - POST /auth/register handler

use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::AuthPayload;
use crate::state::AppState;

/// POST /auth/register - Create an account and log it in
///
/// Expected Input:
/// ```json
/// {
///   "name": "Test User",
///   "email": "user@example.com",
///   "password": "password123",
///   "password_confirmation": "password123"
/// }
/// ```
///
/// Responds 201 with `{ "user": {...}, "token": "..." }`. Validation failures,
/// including an email that is already registered, are 422.
pub async fn register_post(State(state): State<AppState>, JsonBody(payload): JsonBody) -> ApiResult<AuthPayload> {
    let session = state.auth.register(&payload).await?;
    Ok(ApiResponse::created(session))
}

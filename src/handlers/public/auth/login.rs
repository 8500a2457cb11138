// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::AuthPayload;
use crate::state::AppState;

/// POST /auth/login - Authenticate and receive a bearer token
///
/// Expected Input:
/// ```json
/// { "email": "user@example.com", "password": "password123" }
/// ```
///
/// Expected Output (200):
/// ```json
/// {
///   "user": { "id": 1, "name": "Test User", "email": "user@example.com", ... },
///   "token": "eyJhbGciOiJIUzI1NiI..."
/// }
/// ```
///
/// 422 when a field is missing, 401 "Invalid credentials" for an unknown
/// email or a wrong password.
pub async fn login_post(State(state): State<AppState>, JsonBody(payload): JsonBody) -> ApiResult<AuthPayload> {
    let session = state.auth.login(&payload).await?;
    Ok(ApiResponse::success(session))
}

use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /auth/user - The user behind the bearer token
pub async fn user_get(Extension(caller): Extension<AuthUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(caller.user))
}

/// POST /auth/logout - Revoke the bearer token used for this request
///
/// Other tokens held by the same user stay valid.
pub async fn logout_post(State(state): State<AppState>, Extension(caller): Extension<AuthUser>) -> ApiResult<Value> {
    state.auth.logout(&caller).await?;
    Ok(ApiResponse::success(json!({ "message": "Logged out successfully" })))
}

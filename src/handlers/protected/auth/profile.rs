use axum::{extract::State, Extension};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::state::AppState;

/// PUT /auth/user - Update name, email and/or password
///
/// Expected Input (every key optional):
/// ```json
/// {
///   "name": "New Name",
///   "email": "new@example.com",
///   "password": "new-password",
///   "password_confirmation": "new-password"
/// }
/// ```
///
/// Responds with the updated user. 422 when the email belongs to another
/// account or a field fails validation.
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    JsonBody(payload): JsonBody,
) -> ApiResult<User> {
    let user = state.auth.update_profile(&caller.user, &payload).await?;
    Ok(ApiResponse::success(user))
}

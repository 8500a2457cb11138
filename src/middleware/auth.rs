use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

pub use crate::services::AuthUser;

/// Bearer token middleware for protected routes. Resolves the token to a user
/// and injects an `AuthUser` into the request extensions.
pub async fn bearer_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthenticated)?;

    let auth_user = state.auth.authenticate(&token).await?;
    tracing::debug!("Authenticated user {}", auth_user.user.id);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Unauthenticated.")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    // The scheme name is case-insensitive
    let (scheme, token) = auth_str.split_once(' ').unwrap_or((auth_str, ""));
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err("Authorization header must use Bearer token format");
    }

    let token = token.trim();
    if token.is_empty() {
        return Err("Empty bearer token");
    }
    Ok(token.to_string())
}

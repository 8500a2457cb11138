// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (bearer token required). Protected handlers
// receive the caller as `Extension<AuthUser>`, injected by the auth middleware.
pub mod protected;
pub mod public;

use axum::extract::Path;

use crate::error::ApiError;

/// Parses a `{id}` path segment. Anything that is not a positive integer
/// cannot name a row, so it is reported as not found.
pub(crate) fn parse_id(Path(raw): Path<String>) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::not_found("Todo not found"))
}

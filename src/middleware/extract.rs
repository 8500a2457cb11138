use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::ApiError;

/// Request body as raw JSON, handed to the validation layer untouched.
///
/// An empty body reads as `null` so that it fails field validation (422)
/// rather than parsing (400). The Content-Type header is not checked.
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Oversized bodies keep their 413 from the limit layer
        let bytes = Bytes::from_request(req, state).await.map_err(IntoResponse::into_response)?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Null));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| ApiError::bad_request(format!("Malformed JSON body: {}", e)).into_response())
    }
}

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::state::AppState;

/// Header carrying the shared secret configured on the voice platform.
pub const VAPI_SECRET_HEADER: &str = "x-vapi-secret";

/// Constant-time comparison of a presented secret against the configured one.
pub fn secret_matches(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Rejects requests whose `X-VAPI-SECRET` header does not match `VAPI_SECRET`.
///
/// When no secret is configured every request passes.
pub async fn vapi_secret_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.vapi_secret.as_deref() else {
        return Ok(next.run(request).await);
    };

    let presented = request
        .headers()
        .get(VAPI_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(presented) if secret_matches(presented, expected) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "Rejected request with wrong secret");
            Err(AppError::Unauthorized("Invalid X-VAPI-SECRET".to_string()))
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "Rejected request without secret");
            Err(AppError::Unauthorized("Missing X-VAPI-SECRET header".to_string()))
        }
    }
}

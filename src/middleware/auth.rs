use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::AppState;

/// Authoritative session check for protected API routes.
///
/// Runs the external verifier on every request and injects the resulting
/// `Session` into request extensions for handlers to pick up. A missing
/// session or a verifier-internal failure both end the request with the 401
/// envelope - the edge gate upstream is only an optimization and this check
/// must never be skipped.
pub async fn session_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = match state.verifier.verify(request.headers()).await {
        Ok(Some(session)) => session,
        Ok(None) => return Err(ApiError::Unauthorized),
        Err(e) => return Err(ApiError::from(e)),
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

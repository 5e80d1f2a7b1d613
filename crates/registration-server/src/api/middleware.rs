//! Admin authentication and request logging middleware.

use super::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

/// Admin token check.
///
/// Verifies the bearer token and stores the resulting `AdminClaims` in the
/// request extensions. Any failure returns 401 without running the handler;
/// the specific reason is only logged.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match state.auth.verify_header(request.headers().get(AUTHORIZATION)) {
        Ok(claims) => {
            debug!(username = %claims.username, "Admin authenticated");
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(e) => {
            warn!(uri = %request.uri(), reason = %e, "Admin authentication failed");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Logging middleware for requests.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    debug!(%method, %uri, "Request started");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    } else {
        warn!(%method, %uri, %status, ?duration, "Request failed");
    }

    response
}

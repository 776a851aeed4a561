//! Stamps every request with its deadline.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::time::Instant;

use crate::extractors::RequestDeadline;
use crate::state::AppState;

/// Inserts a [`RequestDeadline`] `request_timeout_seconds` from now. The
/// extractors copy it into the request context, so it bounds every store
/// and cache call the handler makes.
pub async fn request_deadline(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    request
        .extensions_mut()
        .insert(RequestDeadline(Instant::now() + timeout));
    next.run(request).await
}

//! `Ctx` extractor: an anonymous request context carrying the deadline.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio::time::Instant;

use taskhub_core::context::RequestContext;

/// Deadline stamped on the request by the deadline middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDeadline(pub Instant);

/// Request context for public endpoints.
#[derive(Debug, Clone)]
pub struct Ctx(pub RequestContext);

impl Ctx {
    /// Builds the context from the request extensions.
    pub fn from_parts(parts: &Parts) -> RequestContext {
        match parts.extensions.get::<RequestDeadline>() {
            Some(RequestDeadline(deadline)) => RequestContext::background().with_deadline(*deadline),
            None => RequestContext::background(),
        }
    }
}

impl std::ops::Deref for Ctx {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Ctx {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Ctx(Self::from_parts(parts)))
    }
}

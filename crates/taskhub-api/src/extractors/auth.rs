//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header, validates it, and yields a context carrying the principal.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use taskhub_core::context::RequestContext;
use taskhub_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::context::Ctx;
use crate::state::AppState;

/// Authenticated request context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }

    /// Rejects non-admin principals.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        match self.0.principal_opt() {
            Some(principal) if principal.is_admin() => Ok(()),
            _ => Err(AppError::forbidden("Administrator access required").into()),
        }
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode_access_token(token)?;

        Ok(AuthUser(Ctx::from_parts(parts).with_principal(claims.principal())))
    }
}

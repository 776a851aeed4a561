//! Request-scoped context: the authenticated principal and the deadline.
//!
//! Every store and cache call takes a `&RequestContext` and runs its network
//! I/O through [`RequestContext::bounded`], so a request deadline set at the
//! HTTP boundary reaches the innermost await.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::error::AppError;
use crate::result::AppResult;

/// Role id reserved for the super administrator.
pub const ROLE_ID_SUPER_ADMIN: i64 = 1;

/// Role id given to self-registered accounts.
pub const ROLE_ID_USER: i64 = 2;

/// Actor id stamped on rows written by self-registration flows.
pub const SYSTEM_USER_ID: i64 = 0;

/// The verified identity performing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The authenticated user's id.
    pub user_id: i64,
    /// The user's role id at the time the token was issued.
    pub role_id: Option<i64>,
}

impl Principal {
    /// Creates a principal.
    pub fn new(user_id: i64, role_id: Option<i64>) -> Self {
        Self { user_id, role_id }
    }

    /// The reserved system identity.
    pub fn system() -> Self {
        Self {
            user_id: SYSTEM_USER_ID,
            role_id: None,
        }
    }

    /// Returns whether this principal holds the admin rank.
    pub fn is_admin(&self) -> bool {
        self.role_id == Some(ROLE_ID_SUPER_ADMIN)
    }

    /// The string written into `created_by` / `updated_by` / `deleted_by`.
    pub fn actor(&self) -> String {
        self.user_id.to_string()
    }
}

/// Context for the current request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    principal: Option<Principal>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no principal and no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Attaches an authenticated principal.
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the principal, if authenticated.
    pub fn principal_opt(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Returns the principal or an `Unauthorized` error.
    pub fn principal(&self) -> AppResult<&Principal> {
        self.principal
            .as_ref()
            .ok_or_else(|| AppError::unauthorized("No authenticated principal on the request"))
    }

    /// Runs `fut` under the request deadline.
    ///
    /// A deadline that has already passed fails before `fut` is polled;
    /// one that elapses while `fut` is pending drops it. Both surface as
    /// `DeadlineExceeded`.
    pub async fn bounded<F, T>(&self, operation: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let Some(deadline) = self.deadline else {
            return fut.await;
        };

        if Instant::now() >= deadline {
            return Err(AppError::deadline_exceeded(format!(
                "{operation}: request deadline already passed"
            )));
        }

        match tokio::time::timeout_at(deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::deadline_exceeded(format!(
                "{operation}: request deadline exceeded"
            ))),
        }
    }
}

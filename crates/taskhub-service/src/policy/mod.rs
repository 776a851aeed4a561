//! Per-entity access rules applied by the entity service.
//!
//! A policy sees every filter after the service has forced the active-only
//! option and before the filter reaches the store. Scoping is done by
//! narrowing the filter, so a principal asking for someone else's record
//! gets `RecordNotFound` on reads and a zero-row write on updates.

pub mod category;
pub mod role;
pub mod task;
pub mod user;

use std::fmt;

use taskhub_core::context::Principal;
use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_entity::record::Record;

pub use category::CategoryPolicy;
pub use role::RolePolicy;
pub use task::TaskPolicy;
pub use user::UserPolicy;

/// The kind of operation a filter is about to be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Single-record read.
    Read,
    /// Paginated listing.
    List,
    /// Update or soft delete.
    Write,
}

/// Access rules for one entity type.
pub trait EntityPolicy<E: Record>: fmt::Debug + Send + Sync + 'static {
    /// Checks and adjusts a create parameter before `created_by` is stamped.
    fn prepare_create(&self, _principal: &Principal, _param: &mut E::Create) -> AppResult<()> {
        Ok(())
    }

    /// Checks and narrows a filter for the given access.
    fn scope(&self, _principal: &Principal, _access: Access, _filter: &mut E::Param) -> AppResult<()> {
        Ok(())
    }
}

pub(crate) fn require_admin(principal: &Principal, what: &str) -> AppResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden(format!("Only administrators can {what}")))
    }
}

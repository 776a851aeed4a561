//! Role administration.

use taskhub_core::context::Principal;
use taskhub_core::result::AppResult;
use taskhub_entity::role::{CreateRoleParam, Role, RoleParam};

use super::{Access, EntityPolicy, require_admin};

/// Every role operation requires the admin rank.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePolicy;

impl EntityPolicy<Role> for RolePolicy {
    fn prepare_create(&self, principal: &Principal, _param: &mut CreateRoleParam) -> AppResult<()> {
        require_admin(principal, "create roles")
    }

    fn scope(&self, principal: &Principal, access: Access, _filter: &mut RoleParam) -> AppResult<()> {
        match access {
            Access::Read | Access::List => require_admin(principal, "view roles"),
            Access::Write => require_admin(principal, "modify roles"),
        }
    }
}

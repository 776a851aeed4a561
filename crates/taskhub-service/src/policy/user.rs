//! User account rules.

use taskhub_core::context::Principal;
use taskhub_core::result::AppResult;
use taskhub_entity::user::{CreateUserParam, User, UserParam};

use super::{Access, EntityPolicy, require_admin};

/// Non-admins are confined to their own account; listing and creating
/// accounts is for admins.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPolicy;

impl EntityPolicy<User> for UserPolicy {
    fn prepare_create(&self, principal: &Principal, _param: &mut CreateUserParam) -> AppResult<()> {
        require_admin(principal, "create accounts")
    }

    fn scope(&self, principal: &Principal, access: Access, filter: &mut UserParam) -> AppResult<()> {
        if principal.is_admin() {
            return Ok(());
        }
        if access == Access::List {
            return require_admin(principal, "list users");
        }
        filter.id = Some(principal.user_id);
        Ok(())
    }
}

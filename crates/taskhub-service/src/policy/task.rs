//! Task ownership rules.

use taskhub_core::context::Principal;
use taskhub_core::result::AppResult;
use taskhub_entity::task::{CreateTaskParam, Task, TaskParam};

use super::{Access, EntityPolicy};

/// Non-admins only ever see and touch their own tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskPolicy;

impl EntityPolicy<Task> for TaskPolicy {
    fn prepare_create(&self, principal: &Principal, param: &mut CreateTaskParam) -> AppResult<()> {
        param.user_id = principal.user_id;
        Ok(())
    }

    fn scope(&self, principal: &Principal, _access: Access, filter: &mut TaskParam) -> AppResult<()> {
        if !principal.is_admin() {
            filter.user_id = Some(principal.user_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_is_owned_by_caller() {
        let mut param = CreateTaskParam {
            user_id: 99,
            ..Default::default()
        };
        TaskPolicy
            .prepare_create(&Principal::new(7, Some(1)), &mut param)
            .unwrap();
        assert_eq!(param.user_id, 7);
    }

    #[test]
    fn test_filter_scoped_for_non_admin_only() {
        let mut filter = TaskParam {
            user_id: Some(99),
            ..Default::default()
        };
        TaskPolicy
            .scope(&Principal::new(7, Some(2)), Access::List, &mut filter)
            .unwrap();
        assert_eq!(filter.user_id, Some(7));

        let mut filter = TaskParam {
            user_id: Some(99),
            ..Default::default()
        };
        TaskPolicy
            .scope(&Principal::new(1, Some(1)), Access::List, &mut filter)
            .unwrap();
        assert_eq!(filter.user_id, Some(99));
    }
}

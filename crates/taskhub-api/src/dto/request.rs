//! Query-string DTOs for list endpoints.
//!
//! Entity filter structs nest their pagination block, which a flat query
//! string cannot express, so each list endpoint reads [`ListQuery`] plus a
//! flat per-entity filter and merges them.

use serde::{Deserialize, Serialize};

use taskhub_core::types::PaginationParam;
use taskhub_entity::category::CategoryParam;
use taskhub_entity::role::{RoleParam, RoleType};
use taskhub_entity::task::{Periodic, TaskParam, TaskStatus};
use taskhub_entity::user::UserParam;

/// Paging and ordering controls shared by every list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    /// Comma-separated sort descriptors, e.g. `-priority,id`.
    pub sort_by: Option<String>,
    /// Comma-separated group-by columns.
    pub group_by: Option<String>,
    pub disable_limit: bool,
}

impl ListQuery {
    /// The pagination block this query describes.
    pub fn pagination(&self) -> PaginationParam {
        PaginationParam {
            page: self.page,
            limit: self.limit,
            sort_by: split(self.sort_by.as_deref()),
            group_by: split(self.group_by.as_deref()),
            include_pagination: true,
            disable_limit: self.disable_limit,
        }
    }
}

fn split(list: Option<&str>) -> Vec<String> {
    list.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Task list filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskQuery {
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub priority: Option<i64>,
    pub task_status: Option<TaskStatus>,
    pub periodic: Option<Periodic>,
}

impl TaskQuery {
    /// Merges with the paging controls into a store filter.
    pub fn into_param(self, list: &ListQuery) -> TaskParam {
        TaskParam {
            user_id: self.user_id,
            category_id: self.category_id,
            title: self.title,
            priority: self.priority,
            task_status: self.task_status,
            periodic: self.periodic,
            pagination: list.pagination(),
            ..Default::default()
        }
    }
}

/// Category list filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryQuery {
    pub name: Option<String>,
}

impl CategoryQuery {
    /// Merges with the paging controls into a store filter.
    pub fn into_param(self, list: &ListQuery) -> CategoryParam {
        CategoryParam {
            name: self.name,
            pagination: list.pagination(),
            ..Default::default()
        }
    }
}

/// Role list filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleQuery {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub role_type: Option<RoleType>,
}

impl RoleQuery {
    /// Merges with the paging controls into a store filter.
    pub fn into_param(self, list: &ListQuery) -> RoleParam {
        RoleParam {
            name: self.name,
            role_type: self.role_type,
            pagination: list.pagination(),
            ..Default::default()
        }
    }
}

/// User list filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserQuery {
    pub role_id: Option<i64>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

impl UserQuery {
    /// Merges with the paging controls into a store filter.
    pub fn into_param(self, list: &ListQuery) -> UserParam {
        UserParam {
            role_id: self.role_id,
            email: self.email,
            username: self.username,
            display_name: self.display_name,
            pagination: list.pagination(),
            ..Default::default()
        }
    }
}

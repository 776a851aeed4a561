//! Task entity model and parameters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use taskhub_core::types::{FilterField, FilterValue, PaginationParam, QueryOption, Timestamp};

use super::status::{Periodic, TaskStatus};
use crate::lifecycle::{Lifecycle, LifecycleUpdate};
use crate::record::{
    CreateParam, EntityDescriptor, FilterParam, Record, UpdateParam, column_list, field_map,
};

/// A to-do item owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned id.
    pub id: i64,
    /// Owning user.
    #[sqlx(rename = "fk_user_id")]
    pub user_id: i64,
    /// Category the task is filed under.
    #[sqlx(rename = "fk_category_id")]
    pub category_id: i64,
    /// Short title.
    pub title: String,
    /// Higher is more urgent.
    pub priority: i64,
    /// Progress.
    pub task_status: TaskStatus,
    /// Recurrence.
    pub periodic: Periodic,
    /// Optional due time.
    pub due_time: Option<Timestamp>,
    /// Lifecycle columns.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Record for Task {
    type Param = TaskParam;
    type Create = CreateTaskParam;
    type Update = UpdateTaskParam;

    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        name: "task",
        table: "task",
        columns: column_list!(
            "id",
            "fk_user_id",
            "fk_category_id",
            "title",
            "priority",
            "task_status",
            "periodic",
            "due_time",
        ),
        fields: field_map!(
            "id" => "id",
            "ids" => "id",
            "user_id" => "fk_user_id",
            "category_id" => "fk_category_id",
            "title" => "title",
            "priority" => "priority",
            "task_status" => "task_status",
            "periodic" => "periodic",
            "due_time" => "due_time",
        ),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

/// Task filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskParam {
    pub id: Option<i64>,
    pub ids: Vec<i64>,
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub priority: Option<i64>,
    pub task_status: Option<TaskStatus>,
    pub periodic: Option<Periodic>,
    pub status: Option<i64>,
    pub pagination: PaginationParam,
    pub query_option: QueryOption,
}

impl FilterParam for TaskParam {
    fn fields(&self) -> Vec<FilterField> {
        FilterField::collect([
            ("id", self.id.map(FilterValue::from)),
            ("ids", Some(FilterValue::IntegerList(self.ids.clone()))),
            ("user_id", self.user_id.map(FilterValue::from)),
            ("category_id", self.category_id.map(FilterValue::from)),
            ("title", self.title.clone().map(FilterValue::from)),
            ("priority", self.priority.map(FilterValue::from)),
            ("task_status", self.task_status.map(FilterValue::from)),
            ("periodic", self.periodic.map(FilterValue::from)),
            ("status", self.status.map(FilterValue::from)),
        ])
    }

    fn pagination(&self) -> &PaginationParam {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut PaginationParam {
        &mut self.pagination
    }

    fn query_option(&self) -> &QueryOption {
        &self.query_option
    }

    fn query_option_mut(&mut self) -> &mut QueryOption {
        &mut self.query_option
    }

    fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

/// Data required to create a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskParam {
    /// Owner. Forced to the caller for non-admins.
    #[serde(default)]
    pub user_id: i64,
    pub category_id: i64,
    pub title: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub task_status: TaskStatus,
    #[serde(default)]
    pub periodic: Periodic,
    #[serde(default)]
    pub due_time: Option<Timestamp>,
    #[serde(skip_deserializing)]
    pub created_by: Option<String>,
}

impl CreateParam for CreateTaskParam {
    fn fields(&self) -> Vec<FilterField> {
        FilterField::collect([
            ("user_id", Some(FilterValue::from(self.user_id))),
            ("category_id", Some(FilterValue::from(self.category_id))),
            ("title", Some(FilterValue::from(self.title.clone()))),
            ("priority", Some(FilterValue::from(self.priority))),
            ("task_status", Some(FilterValue::from(self.task_status))),
            ("periodic", Some(FilterValue::from(self.periodic))),
            ("due_time", self.due_time.map(FilterValue::from)),
            ("created_by", self.created_by.clone().map(FilterValue::from)),
        ])
    }

    fn set_created_by(&mut self, actor: String) {
        self.created_by = Some(actor);
    }
}

/// Partial task update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateTaskParam {
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub priority: Option<i64>,
    pub task_status: Option<TaskStatus>,
    pub periodic: Option<Periodic>,
    pub due_time: Option<Timestamp>,
    #[serde(skip_deserializing)]
    pub lifecycle: LifecycleUpdate,
}

impl UpdateParam for UpdateTaskParam {
    fn fields(&self) -> Vec<FilterField> {
        let mut fields = FilterField::collect([
            ("user_id", self.user_id.map(FilterValue::from)),
            ("category_id", self.category_id.map(FilterValue::from)),
            ("title", self.title.clone().map(FilterValue::from)),
            ("priority", self.priority.map(FilterValue::from)),
            ("task_status", self.task_status.map(FilterValue::from)),
            ("periodic", self.periodic.map(FilterValue::from)),
            ("due_time", self.due_time.map(FilterValue::from)),
        ]);
        fields.extend(self.lifecycle.fields());
        fields
    }

    fn lifecycle_mut(&mut self) -> &mut LifecycleUpdate {
        &mut self.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_fields_skip_absent() {
        let param = TaskParam {
            user_id: Some(4),
            ids: vec![1, 2],
            ..Default::default()
        };
        let names: Vec<_> = param.fields().iter().map(|f| f.field).collect();
        assert_eq!(names, vec!["ids", "user_id"]);
    }

    #[test]
    fn test_every_param_field_maps_to_a_column() {
        let param = TaskParam {
            id: Some(1),
            ids: vec![1],
            user_id: Some(1),
            category_id: Some(1),
            title: Some("t".into()),
            priority: Some(1),
            task_status: Some(TaskStatus::Done),
            periodic: Some(Periodic::Daily),
            status: Some(1),
            ..Default::default()
        };
        for field in param.fields() {
            assert!(Task::DESCRIPTOR.column_for(field.field).is_some(), "{}", field.field);
        }
    }

    #[test]
    fn test_cache_payload_roundtrip_keeps_lifecycle() {
        let task = Task {
            id: 3,
            user_id: 9,
            category_id: 2,
            title: "water plants".into(),
            priority: 1,
            task_status: TaskStatus::Todo,
            periodic: Periodic::Weekly,
            due_time: None,
            lifecycle: Lifecycle {
                status: 1,
                created_by: Some("9".into()),
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}

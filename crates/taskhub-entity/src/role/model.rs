//! Role entity model and parameters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use taskhub_core::types::{FilterField, FilterValue, PaginationParam, QueryOption};

use super::kind::RoleType;
use crate::lifecycle::{Lifecycle, LifecycleUpdate};
use crate::record::{
    CreateParam, EntityDescriptor, FilterParam, Record, UpdateParam, column_list, field_map,
};

/// A role users are assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Store-assigned id. Id `1` is the super administrator.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Role class.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub role_type: RoleType,
    /// Ordering among roles, lower is more privileged.
    pub rank: i64,
    /// Lifecycle columns.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Record for Role {
    type Param = RoleParam;
    type Create = CreateRoleParam;
    type Update = UpdateRoleParam;

    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        name: "role",
        table: "role",
        columns: column_list!("id", "name", "type", "rank"),
        fields: field_map!(
            "id" => "id",
            "ids" => "id",
            "name" => "name",
            "role_type" => "type",
            "rank" => "rank",
        ),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

/// Role filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleParam {
    pub id: Option<i64>,
    pub ids: Vec<i64>,
    pub name: Option<String>,
    pub role_type: Option<RoleType>,
    pub status: Option<i64>,
    pub pagination: PaginationParam,
    pub query_option: QueryOption,
}

impl FilterParam for RoleParam {
    fn fields(&self) -> Vec<FilterField> {
        FilterField::collect([
            ("id", self.id.map(FilterValue::from)),
            ("ids", Some(FilterValue::IntegerList(self.ids.clone()))),
            ("name", self.name.clone().map(FilterValue::from)),
            ("role_type", self.role_type.map(FilterValue::from)),
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

/// Data required to create a role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleParam {
    pub name: String,
    #[serde(rename = "type", default)]
    pub role_type: RoleType,
    #[serde(default)]
    pub rank: i64,
    #[serde(skip_deserializing)]
    pub created_by: Option<String>,
}

impl CreateParam for CreateRoleParam {
    fn fields(&self) -> Vec<FilterField> {
        FilterField::collect([
            ("name", Some(FilterValue::from(self.name.clone()))),
            ("role_type", Some(FilterValue::from(self.role_type))),
            ("rank", Some(FilterValue::from(self.rank))),
            ("created_by", self.created_by.clone().map(FilterValue::from)),
        ])
    }

    fn set_created_by(&mut self, actor: String) {
        self.created_by = Some(actor);
    }
}

/// Partial role update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateRoleParam {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub role_type: Option<RoleType>,
    pub rank: Option<i64>,
    #[serde(skip_deserializing)]
    pub lifecycle: LifecycleUpdate,
}

impl UpdateParam for UpdateRoleParam {
    fn fields(&self) -> Vec<FilterField> {
        let mut fields = FilterField::collect([
            ("name", self.name.clone().map(FilterValue::from)),
            ("role_type", self.role_type.map(FilterValue::from)),
            ("rank", self.rank.map(FilterValue::from)),
        ]);
        fields.extend(self.lifecycle.fields());
        fields
    }

    fn lifecycle_mut(&mut self) -> &mut LifecycleUpdate {
        &mut self.lifecycle
    }
}

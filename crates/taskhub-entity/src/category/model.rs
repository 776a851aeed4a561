//! Category entity model and parameters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use taskhub_core::types::{FilterField, FilterValue, PaginationParam, QueryOption};

use crate::lifecycle::{Lifecycle, LifecycleUpdate};
use crate::record::{
    CreateParam, EntityDescriptor, FilterParam, Record, UpdateParam, column_list, field_map,
};

/// A named bucket tasks are filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl Record for Category {
    type Param = CategoryParam;
    type Create = CreateCategoryParam;
    type Update = UpdateCategoryParam;

    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        name: "category",
        table: "category",
        columns: column_list!("id", "name"),
        fields: field_map!("id" => "id", "ids" => "id", "name" => "name"),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

/// Category filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryParam {
    pub id: Option<i64>,
    pub ids: Vec<i64>,
    pub name: Option<String>,
    pub pagination: PaginationParam,
    pub query_option: QueryOption,
}

impl FilterParam for CategoryParam {
    fn fields(&self) -> Vec<FilterField> {
        FilterField::collect([
            ("id", self.id.map(FilterValue::from)),
            ("ids", Some(FilterValue::IntegerList(self.ids.clone()))),
            ("name", self.name.clone().map(FilterValue::from)),
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

/// Data required to create a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryParam {
    pub name: String,
    #[serde(skip_deserializing)]
    pub created_by: Option<String>,
}

impl CreateParam for CreateCategoryParam {
    fn fields(&self) -> Vec<FilterField> {
        FilterField::collect([
            ("name", Some(FilterValue::from(self.name.clone()))),
            ("created_by", self.created_by.clone().map(FilterValue::from)),
        ])
    }

    fn set_created_by(&mut self, actor: String) {
        self.created_by = Some(actor);
    }
}

/// Partial category update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateCategoryParam {
    pub name: Option<String>,
    #[serde(skip_deserializing)]
    pub lifecycle: LifecycleUpdate,
}

impl UpdateParam for UpdateCategoryParam {
    fn fields(&self) -> Vec<FilterField> {
        let mut fields = FilterField::collect([("name", self.name.clone().map(FilterValue::from))]);
        fields.extend(self.lifecycle.fields());
        fields
    }

    fn lifecycle_mut(&mut self) -> &mut LifecycleUpdate {
        &mut self.lifecycle
    }
}

//! The record descriptor and the parameter traits the generic store is
//! written against.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::FromRow;
use sqlx::any::AnyRow;

use taskhub_core::types::{FilterField, PaginationParam, QueryOption};

use crate::lifecycle::{Lifecycle, LifecycleUpdate};

/// Static description of how an entity is persisted.
#[derive(Debug, Clone, Copy)]
pub struct EntityDescriptor {
    /// Short entity name, used as the cache namespace and in log fields.
    pub name: &'static str,
    /// Table name.
    pub table: &'static str,
    /// Selected columns, in row order.
    pub columns: &'static [&'static str],
    /// Parameter field name to column name.
    pub fields: &'static [(&'static str, &'static str)],
}

impl EntityDescriptor {
    /// Maps a parameter field name to its column.
    pub fn column_for(&self, field: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|(param, _)| *param == field)
            .map(|(_, column)| *column)
    }

    /// Resolves a name given either in parameter or column naming.
    pub fn resolve(&self, name: &str) -> Option<&'static str> {
        self.column_for(name)
            .or_else(|| self.columns.iter().copied().find(|c| *c == name))
    }

    /// The comma-separated select list.
    pub fn select_list(&self) -> String {
        self.columns.join(", ")
    }
}

/// A persisted entity.
pub trait Record:
    for<'r> FromRow<'r, AnyRow>
    + Serialize
    + DeserializeOwned
    + Clone
    + fmt::Debug
    + PartialEq
    + Send
    + Sync
    + Unpin
    + 'static
{
    /// Filter parameters for reads and update selects.
    type Param: FilterParam;
    /// Insert parameters.
    type Create: CreateParam;
    /// Partial update parameters.
    type Update: UpdateParam;

    /// Table and field mapping.
    const DESCRIPTOR: EntityDescriptor;

    /// The store-assigned primary key.
    fn id(&self) -> i64;

    /// Lifecycle columns.
    fn lifecycle(&self) -> &Lifecycle;
}

/// Filter parameters: optional fields plus pagination and query options.
///
/// Serialized form is the cache key, so two filters that select the same
/// rows in the same order must serialize identically.
pub trait FilterParam:
    Serialize + Clone + fmt::Debug + Default + Send + Sync + 'static
{
    /// The present filter fields, in parameter naming.
    fn fields(&self) -> Vec<FilterField>;

    /// Pagination block.
    fn pagination(&self) -> &PaginationParam;

    /// Mutable pagination block.
    fn pagination_mut(&mut self) -> &mut PaginationParam;

    /// Query-wide options.
    fn query_option(&self) -> &QueryOption;

    /// Mutable query-wide options.
    fn query_option_mut(&mut self) -> &mut QueryOption;

    /// A filter selecting exactly the row with `id`.
    fn by_id(id: i64) -> Self;
}

/// Insert parameters.
pub trait CreateParam: Serialize + Clone + fmt::Debug + Send + Sync + 'static {
    /// The columns to insert, in parameter naming. Absent optional fields
    /// are left to their column default.
    fn fields(&self) -> Vec<FilterField>;

    /// Stamps the creating actor.
    fn set_created_by(&mut self, actor: String);
}

/// Partial update parameters. Only present fields are written.
pub trait UpdateParam:
    Serialize + Clone + fmt::Debug + Default + Send + Sync + 'static
{
    /// The present payload and lifecycle fields, in parameter naming.
    fn fields(&self) -> Vec<FilterField>;

    /// Lifecycle half of the update.
    fn lifecycle_mut(&mut self) -> &mut LifecycleUpdate;
}

/// Builds a `&'static [(&str, &str)]` field map: entity pairs followed by
/// the lifecycle pairs.
macro_rules! field_map {
    ($($param:literal => $column:literal),* $(,)?) => {
        &[
            $(($param, $column),)*
            ("status", "status"),
            ("created_at", "created_at"),
            ("created_by", "created_by"),
            ("updated_at", "updated_at"),
            ("updated_by", "updated_by"),
            ("deleted_at", "deleted_at"),
            ("deleted_by", "deleted_by"),
        ]
    };
}
pub(crate) use field_map;

/// Lifecycle columns appended to every select list.
macro_rules! column_list {
    ($($column:literal),* $(,)?) => {
        &[
            $($column,)*
            "status",
            "created_at",
            "created_by",
            "updated_at",
            "updated_by",
            "deleted_at",
            "deleted_by",
        ]
    };
}
pub(crate) use column_list;

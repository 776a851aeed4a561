//! Filter types for dynamic query building.

use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// A dynamic filter value that can represent the supported SQL types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// An integer value.
    Integer(i64),
    /// A string value.
    String(String),
    /// A point in time.
    Timestamp(Timestamp),
    /// A list of integer values (for the `IN` operator).
    IntegerList(Vec<i64>),
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Timestamp> for FilterValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

/// A single equality (or `IN` list) condition on a named parameter field.
///
/// `field` is the *parameter* name, not the column name: the query builder
/// maps it to a column through the entity descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterField {
    /// The parameter field name.
    pub field: &'static str,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: &'static str, value: impl Into<FilterValue>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Collects the present values of optional fields, skipping `None`s and
    /// empty lists.
    pub fn collect<const N: usize>(fields: [(&'static str, Option<FilterValue>); N]) -> Vec<Self> {
        fields
            .into_iter()
            .filter_map(|(field, value)| match value {
                Some(FilterValue::IntegerList(list)) if list.is_empty() => None,
                Some(value) => Some(Self { field, value }),
                None => None,
            })
            .collect()
    }
}

/// Query-wide switches applied on top of the explicit filter fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryOption {
    /// Restrict results to active rows (`status = 1`).
    pub is_active: bool,
}

impl QueryOption {
    /// An option that only returns active rows.
    pub fn active() -> Self {
        Self { is_active: true }
    }
}

//! Lifecycle columns shared by every record.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use taskhub_core::types::{FilterField, FilterValue, Timestamp};

/// `status` value of a live row.
pub const STATUS_ACTIVE: i64 = 1;

/// `status` value of a soft-deleted row.
pub const STATUS_DELETED: i64 = -1;

/// Lifecycle columns present on every table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    /// `1` active, `-1` soft-deleted.
    pub status: i64,
    /// Filled by the store on insert.
    pub created_at: Option<Timestamp>,
    /// Actor id of the creator.
    pub created_by: Option<String>,
    /// Last update time.
    pub updated_at: Option<Timestamp>,
    /// Actor id of the last updater.
    pub updated_by: Option<String>,
    /// Soft-delete time.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deleted_at: Option<Timestamp>,
    /// Actor id of the deleter.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deleted_by: Option<String>,
}

impl Lifecycle {
    /// Whether the row is live.
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// The lifecycle half of every update parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifecycleUpdate {
    /// New status.
    pub status: Option<i64>,
    /// Update stamp.
    pub updated_at: Option<Timestamp>,
    /// Update actor.
    pub updated_by: Option<String>,
    /// Delete stamp.
    pub deleted_at: Option<Timestamp>,
    /// Delete actor.
    pub deleted_by: Option<String>,
}

impl LifecycleUpdate {
    /// Stamps the update time and actor.
    pub fn stamp_update(&mut self, at: Timestamp, by: impl Into<String>) {
        self.updated_at = Some(at);
        self.updated_by = Some(by.into());
    }

    /// Turns the update into a soft delete: `status = -1` plus delete and
    /// update stamps.
    pub fn stamp_delete(&mut self, at: Timestamp, by: impl Into<String>) {
        let by = by.into();
        self.status = Some(STATUS_DELETED);
        self.deleted_at = Some(at);
        self.deleted_by = Some(by.clone());
        self.stamp_update(at, by);
    }

    /// The present lifecycle fields, in parameter naming.
    pub fn fields(&self) -> Vec<FilterField> {
        FilterField::collect([
            ("status", self.status.map(FilterValue::from)),
            ("updated_at", self.updated_at.map(FilterValue::from)),
            ("updated_by", self.updated_by.clone().map(FilterValue::from)),
            ("deleted_at", self.deleted_at.map(FilterValue::from)),
            ("deleted_by", self.deleted_by.clone().map(FilterValue::from)),
        ])
    }
}

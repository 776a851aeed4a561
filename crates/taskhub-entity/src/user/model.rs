//! User entity model and parameters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use taskhub_core::context::ROLE_ID_SUPER_ADMIN;
use taskhub_core::types::{FilterField, FilterValue, PaginationParam, QueryOption};

use crate::lifecycle::{Lifecycle, LifecycleUpdate};
use crate::record::{
    CreateParam, EntityDescriptor, FilterParam, Record, UpdateParam, column_list, field_map,
};

/// A registered user.
///
/// The serialized form carries the password hash so that cached reads are
/// identical to store reads; HTTP responses go through a view type that
/// drops it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned id.
    pub id: i64,
    /// Assigned role, if any.
    #[sqlx(rename = "fk_role_id")]
    pub role_id: Option<i64>,
    /// Login email, unique.
    pub email: String,
    /// Unique login name.
    pub username: String,
    /// Argon2 password hash.
    pub password: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Lifecycle columns.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl User {
    /// Check if this user holds the super administrator role.
    pub fn is_admin(&self) -> bool {
        self.role_id == Some(ROLE_ID_SUPER_ADMIN)
    }
}

impl Record for User {
    type Param = UserParam;
    type Create = CreateUserParam;
    type Update = UpdateUserParam;

    const DESCRIPTOR: EntityDescriptor = EntityDescriptor {
        name: "user",
        table: "users",
        columns: column_list!(
            "id",
            "fk_role_id",
            "email",
            "username",
            "password",
            "display_name",
        ),
        fields: field_map!(
            "id" => "id",
            "ids" => "id",
            "role_id" => "fk_role_id",
            "email" => "email",
            "username" => "username",
            "password" => "password",
            "display_name" => "display_name",
        ),
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

/// User filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserParam {
    pub id: Option<i64>,
    pub ids: Vec<i64>,
    pub role_id: Option<i64>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub pagination: PaginationParam,
    pub query_option: QueryOption,
}

impl UserParam {
    /// A filter on the email column.
    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }
}

impl FilterParam for UserParam {
    fn fields(&self) -> Vec<FilterField> {
        FilterField::collect([
            ("id", self.id.map(FilterValue::from)),
            ("ids", Some(FilterValue::IntegerList(self.ids.clone()))),
            ("role_id", self.role_id.map(FilterValue::from)),
            ("email", self.email.clone().map(FilterValue::from)),
            ("username", self.username.clone().map(FilterValue::from)),
            ("display_name", self.display_name.clone().map(FilterValue::from)),
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

/// Data required to create a user.
///
/// `password` arrives in clear text and is replaced by its hash before
/// the insert. `confirm_password` is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserParam {
    #[serde(default)]
    pub role_id: Option<i64>,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default, skip_serializing)]
    pub confirm_password: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(skip_deserializing)]
    pub created_by: Option<String>,
}

impl CreateParam for CreateUserParam {
    fn fields(&self) -> Vec<FilterField> {
        FilterField::collect([
            ("role_id", self.role_id.map(FilterValue::from)),
            ("email", Some(FilterValue::from(self.email.clone()))),
            ("username", Some(FilterValue::from(self.username.clone()))),
            ("password", Some(FilterValue::from(self.password.clone()))),
            ("display_name", Some(FilterValue::from(self.display_name.clone()))),
            ("created_by", self.created_by.clone().map(FilterValue::from)),
        ])
    }

    fn set_created_by(&mut self, actor: String) {
        self.created_by = Some(actor);
    }
}

/// Partial user update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserParam {
    pub role_id: Option<i64>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    /// Already-hashed password. Set only by the password change flow.
    #[serde(skip)]
    pub password: Option<String>,
    #[serde(skip_deserializing)]
    pub lifecycle: LifecycleUpdate,
}

impl UpdateParam for UpdateUserParam {
    fn fields(&self) -> Vec<FilterField> {
        let mut fields = FilterField::collect([
            ("role_id", self.role_id.map(FilterValue::from)),
            ("username", self.username.clone().map(FilterValue::from)),
            ("display_name", self.display_name.clone().map(FilterValue::from)),
            ("password", self.password.clone().map(FilterValue::from)),
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
    fn test_confirm_password_is_not_inserted() {
        let param = CreateUserParam {
            email: "a@b.c".into(),
            username: "ab".into(),
            password: "hash".into(),
            confirm_password: "secret".into(),
            ..Default::default()
        };
        let names: Vec<_> = param.fields().iter().map(|f| f.field).collect();
        assert!(!names.contains(&"confirm_password"));
        assert!(!names.contains(&"role_id"));
        assert!(names.contains(&"password"));
    }

    #[test]
    fn test_password_never_deserialized_into_update() {
        let update: UpdateUserParam =
            serde_json::from_str(r#"{"displayName":"Ann","password":"x"}"#).unwrap();
        assert_eq!(update.display_name.as_deref(), Some("Ann"));
        assert!(update.password.is_none());
    }
}

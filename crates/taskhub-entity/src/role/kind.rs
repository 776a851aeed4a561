//! Role type enumeration.

use serde::{Deserialize, Serialize};

/// Broad class of a role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
    /// Administrative role.
    Admin,
    /// Regular user role.
    #[default]
    User,
}

text_enum!(RoleType, "role type", {
    Admin => "admin",
    User => "user",
});

impl RoleType {
    /// Check if this role type is administrative.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

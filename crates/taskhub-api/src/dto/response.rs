//! Response DTOs.

use serde::{Deserialize, Serialize};

use taskhub_core::types::Pagination;
use taskhub_entity::Lifecycle;
use taskhub_entity::user::User;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data.
    pub data: T,
    /// Page metadata for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Creates a single-value response.
    pub fn ok(data: T) -> Self {
        Self {
            data,
            pagination: None,
        }
    }

    /// Creates a list response.
    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            data,
            pagination: Some(pagination),
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A user as returned over HTTP, without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub role_id: Option<i64>,
    pub email: String,
    pub username: String,
    pub display_name: String,
    #[serde(flatten)]
    pub lifecycle: Lifecycle,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role_id: user.role_id,
            email: user.email,
            username: user.username,
            display_name: user.display_name,
            lifecycle: user.lifecycle,
        }
    }
}

/// Liveness and dependency status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when every dependency answered.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Relational store reachability.
    pub database: bool,
    /// Cache reachability.
    pub cache: bool,
}

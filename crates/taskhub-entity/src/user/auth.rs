//! Sign-in and credential change payloads.

use serde::{Deserialize, Serialize};

/// Credentials submitted at sign-in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserLoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned after a successful sign-in or token refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginResponse {
    pub email: String,
    pub display_name: String,
    pub access_token: String,
}

/// Password change for the current user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordParam {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

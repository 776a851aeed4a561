//! Current-user profile handlers.

use axum::Json;
use axum::extract::{Path, State};

use taskhub_entity::record::FilterParam;
use taskhub_entity::user::{ChangePasswordParam, UpdateUserParam, UserParam};

use crate::dto::response::{ApiResponse, MessageResponse, UserView};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /v1/user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserView>>> {
    let user = state.user_service.profile(&auth).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PUT /v1/user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateUserParam>,
) -> ApiResult<Json<ApiResponse<UserView>>> {
    let user = state.user_service.update_profile(&auth, req).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// DELETE /v1/user/profile
pub async fn delete_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.user_service.delete_self(&auth).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Account deleted"))))
}

/// PUT /v1/user/profile/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordParam>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.user_service.change_password(&auth, req).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password changed successfully",
    ))))
}

/// GET /v1/user/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<UserView>>> {
    let user = state
        .user_service
        .users()
        .get(&auth, UserParam::by_id(id))
        .await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

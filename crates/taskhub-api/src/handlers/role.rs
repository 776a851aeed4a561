//! Role (admin only) handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use taskhub_entity::record::FilterParam;
use taskhub_entity::role::{CreateRoleParam, Role, RoleParam, UpdateRoleParam};

use crate::dto::request::{ListQuery, RoleQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /v1/role
pub async fn list_roles(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(list): Query<ListQuery>,
    Query(filter): Query<RoleQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Role>>>> {
    let (roles, pagination) = state
        .role_service
        .get_list(&auth, filter.into_param(&list))
        .await?;
    Ok(Json(ApiResponse::paginated(roles, pagination)))
}

/// POST /v1/role
pub async fn create_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateRoleParam>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Role>>)> {
    let role = state.role_service.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(role))))
}

/// GET /v1/role/{id}
pub async fn get_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Role>>> {
    let role = state.role_service.get(&auth, RoleParam::by_id(id)).await?;
    Ok(Json(ApiResponse::ok(role)))
}

/// PUT /v1/role/{id}
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRoleParam>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .role_service
        .update(&auth, req, RoleParam::by_id(id))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Role updated"))))
}

/// DELETE /v1/role/{id}
pub async fn delete_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .role_service
        .delete(&auth, RoleParam::by_id(id))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Role deleted"))))
}

//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use taskhub_entity::record::FilterParam;
use taskhub_entity::user::{UpdateUserParam, UserParam};

use crate::dto::request::{ListQuery, UserQuery};
use crate::dto::response::{ApiResponse, MessageResponse, UserView};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /v1/admin/user
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(list): Query<ListQuery>,
    Query(filter): Query<UserQuery>,
) -> ApiResult<Json<ApiResponse<Vec<UserView>>>> {
    auth.require_admin()?;
    let (users, pagination) = state
        .user_service
        .users()
        .get_list(&auth, filter.into_param(&list))
        .await?;

    let users = users.into_iter().map(UserView::from).collect();
    Ok(Json(ApiResponse::paginated(users, pagination)))
}

/// PUT /v1/admin/user/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserParam>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    auth.require_admin()?;
    state
        .user_service
        .users()
        .update(&auth, req, UserParam::by_id(id))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User updated"))))
}

/// DELETE /v1/admin/user/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    auth.require_admin()?;
    state
        .user_service
        .users()
        .delete(&auth, UserParam::by_id(id))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}

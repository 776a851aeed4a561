//! Category handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use taskhub_entity::record::FilterParam;
use taskhub_entity::category::{CreateCategoryParam, Category, CategoryParam, UpdateCategoryParam};

use crate::dto::request::{ListQuery, CategoryQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /v1/category
pub async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(list): Query<ListQuery>,
    Query(filter): Query<CategoryQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Category>>>> {
    let (categories, pagination) = state
        .category_service
        .get_list(&auth, filter.into_param(&list))
        .await?;
    Ok(Json(ApiResponse::paginated(categories, pagination)))
}

/// POST /v1/category
pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateCategoryParam>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let category = state.category_service.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(category))))
}

/// GET /v1/category/{id}
pub async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let category = state.category_service.get(&auth, CategoryParam::by_id(id)).await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// PUT /v1/category/{id}
pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCategoryParam>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .category_service
        .update(&auth, req, CategoryParam::by_id(id))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Category updated"))))
}

/// DELETE /v1/category/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .category_service
        .delete(&auth, CategoryParam::by_id(id))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Category deleted"))))
}

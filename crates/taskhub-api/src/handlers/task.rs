//! Task handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use taskhub_entity::record::FilterParam;
use taskhub_entity::task::{CreateTaskParam, Task, TaskParam, UpdateTaskParam};

use crate::dto::request::{ListQuery, TaskQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /v1/task
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(list): Query<ListQuery>,
    Query(filter): Query<TaskQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Task>>>> {
    let (tasks, pagination) = state
        .task_service
        .get_list(&auth, filter.into_param(&list))
        .await?;
    Ok(Json(ApiResponse::paginated(tasks, pagination)))
}

/// POST /v1/task
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTaskParam>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Task>>)> {
    let task = state.task_service.create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(task))))
}

/// GET /v1/task/{id}
pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Task>>> {
    let task = state.task_service.get(&auth, TaskParam::by_id(id)).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// PUT /v1/task/{id}
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskParam>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .task_service
        .update(&auth, req, TaskParam::by_id(id))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Task updated"))))
}

/// DELETE /v1/task/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .task_service
        .delete(&auth, TaskParam::by_id(id))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Task deleted"))))
}

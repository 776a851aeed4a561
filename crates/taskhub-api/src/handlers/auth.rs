//! Registration, sign-in, and token refresh handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use taskhub_entity::user::{CreateUserParam, UserLoginRequest, UserLoginResponse};

use crate::dto::response::{ApiResponse, UserView};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, Ctx};
use crate::state::AppState;

/// POST /public/v1/register
pub async fn register(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<CreateUserParam>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserView>>)> {
    let user = state.user_service.register(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// POST /auth/v1/login
pub async fn login(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<UserLoginRequest>,
) -> ApiResult<Json<ApiResponse<UserLoginResponse>>> {
    let response = state.user_service.sign_in(&ctx, req).await?;
    Ok(Json(ApiResponse::ok(response)))
}

/// GET /auth/v1/refresh-token
pub async fn refresh_token(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<UserLoginResponse>>> {
    let response = state.user_service.refresh_token(&auth).await?;
    Ok(Json(ApiResponse::ok(response)))
}

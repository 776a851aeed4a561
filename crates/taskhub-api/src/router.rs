//! Route definitions for the TaskHub HTTP API.
//!
//! Public routes (`/ping`, `/public/v1`, `/auth/v1/login`) need no token;
//! everything under `/v1` extracts an [`AuthUser`](crate::extractors::AuthUser).

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(handlers::health::ping))
        .merge(auth_routes())
        .merge(user_routes())
        .merge(admin_routes())
        .merge(category_routes())
        .merge(task_routes())
        .merge(role_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::deadline::request_deadline,
        ))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Registration, sign-in, and token refresh.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/public/v1/register", post(handlers::auth::register))
        .route("/auth/v1/login", post(handlers::auth::login))
        .route("/auth/v1/refresh-token", get(handlers::auth::refresh_token))
}

/// Current-user profile.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/user/profile",
            get(handlers::user::get_profile)
                .put(handlers::user::update_profile)
                .delete(handlers::user::delete_profile),
        )
        .route(
            "/v1/user/profile/change-password",
            put(handlers::user::change_password),
        )
        .route("/v1/user/{id}", get(handlers::user::get_user))
}

/// Admin user management.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/user", get(handlers::admin::list_users))
        .route(
            "/v1/admin/user/{id}",
            put(handlers::admin::update_user).delete(handlers::admin::delete_user),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/category",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route(
            "/v1/category/{id}",
            get(handlers::category::get_category)
                .put(handlers::category::update_category)
                .delete(handlers::category::delete_category),
        )
}

fn task_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/task",
            get(handlers::task::list_tasks).post(handlers::task::create_task),
        )
        .route(
            "/v1/task/{id}",
            get(handlers::task::get_task)
                .put(handlers::task::update_task)
                .delete(handlers::task::delete_task),
        )
}

fn role_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/role",
            get(handlers::role::list_roles).post(handlers::role::create_role),
        )
        .route(
            "/v1/role/{id}",
            get(handlers::role::get_role)
                .put(handlers::role::update_role)
                .delete(handlers::role::delete_role),
        )
}

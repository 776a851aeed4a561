//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use taskhub_auth::jwt::JwtDecoder;
use taskhub_cache::CacheManager;
use taskhub_core::config::AppConfig;
use taskhub_database::DatabasePool;
use taskhub_service::{CategoryService, RoleService, TaskService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Leader/follower database pools
    pub db: DatabasePool,
    /// Cache manager (Redis or in-memory)
    pub cache: CacheManager,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Accounts and credentials
    pub user_service: Arc<UserService>,
    /// Tasks
    pub task_service: Arc<TaskService>,
    /// Categories
    pub category_service: Arc<CategoryService>,
    /// Roles
    pub role_service: Arc<RoleService>,
}

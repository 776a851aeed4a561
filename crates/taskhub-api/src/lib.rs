//! # taskhub-api
//!
//! HTTP API layer for TaskHub built on Axum.
//!
//! A thin adapter: handlers decode the request, build a
//! [`RequestContext`](taskhub_core::RequestContext) carrying the
//! authenticated principal and the request deadline, call a service, and
//! wrap the result. Errors map to HTTP statuses by their kind.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;

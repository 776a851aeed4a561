//! HTTP request handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod category;
pub mod health;
pub mod role;
pub mod task;
pub mod user;

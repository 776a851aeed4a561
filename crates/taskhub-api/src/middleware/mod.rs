//! Axum middleware stack.

pub mod deadline;
pub mod logging;

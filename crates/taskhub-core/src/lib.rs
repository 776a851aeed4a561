//! # taskhub-core
//!
//! Core crate for TaskHub. Contains the unified error system, configuration
//! schemas, the request context (deadline + authenticated principal), the
//! injectable clock, the cache provider trait, and pagination/sorting types.
//!
//! This crate has **no** internal dependencies on other TaskHub crates.

pub mod config;
pub mod context;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use context::{Principal, RequestContext};
pub use error::{AppError, ErrorKind};
pub use result::AppResult;

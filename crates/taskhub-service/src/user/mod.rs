//! Account registration, sign-in, and self-service profile operations.

pub mod service;

pub use service::UserService;

//! The generic entity service.

pub mod service;

pub use service::EntityService;

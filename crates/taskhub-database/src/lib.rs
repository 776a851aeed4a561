//! # taskhub-database
//!
//! Relational store access for TaskHub: leader/follower connection
//! management over the `sqlx` `Any` driver, the SQL query builder, and the
//! generic [`RecordStore`] every entity is persisted through.

pub mod connection;
pub mod dialect;
pub mod migration;
pub mod query;
pub mod store;

pub use connection::DatabasePool;
pub use dialect::Dialect;
pub use query::{BuiltInsert, BuiltQuery, BuiltUpdate, SqlQueryBuilder};
pub use store::RecordStore;

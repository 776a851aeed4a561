//! # taskhub-entity
//!
//! Entity models for TaskHub. Every record struct in this crate represents
//! a table row and derives `Debug`, `Clone`, `Serialize`, `Deserialize`,
//! and `sqlx::FromRow`. Each record also carries a [`record::Record`]
//! descriptor that tells the generic store how its parameter fields map to
//! persisted columns.

#[macro_use]
mod macros;

pub mod category;
pub mod lifecycle;
pub mod record;
pub mod role;
pub mod task;
pub mod user;

pub use category::Category;
pub use lifecycle::{Lifecycle, LifecycleUpdate, STATUS_ACTIVE, STATUS_DELETED};
pub use record::{CreateParam, EntityDescriptor, FilterParam, Record, UpdateParam};
pub use role::Role;
pub use task::Task;
pub use user::User;

//! # taskhub-service
//!
//! Business logic for TaskHub. Every entity is served by the generic
//! [`EntityService`], which forces the active-only view on reads, stamps
//! actors and times on writes, turns deletes into status updates, and
//! applies the entity's [`EntityPolicy`]. [`UserService`] adds the
//! credential flows on top of the user entity service.
//!
//! Services follow constructor injection: stores, the clock, and the auth
//! helpers are provided at construction time.

pub mod entity;
pub mod policy;
pub mod user;

use taskhub_entity::{Category, Role, Task};

pub use entity::EntityService;
pub use policy::{Access, CategoryPolicy, EntityPolicy, RolePolicy, TaskPolicy, UserPolicy};
pub use user::UserService;

/// Task operations, scoped to the owner for non-admins.
pub type TaskService = EntityService<Task, TaskPolicy>;

/// Category operations.
pub type CategoryService = EntityService<Category, CategoryPolicy>;

/// Role operations, admin only.
pub type RoleService = EntityService<Role, RolePolicy>;

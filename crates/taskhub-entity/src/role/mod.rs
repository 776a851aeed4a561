//! Role entities.

pub mod kind;
pub mod model;

pub use kind::RoleType;
pub use model::{CreateRoleParam, Role, RoleParam, UpdateRoleParam};

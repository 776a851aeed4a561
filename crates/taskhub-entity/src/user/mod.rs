//! User entities.

pub mod auth;
pub mod model;

pub use auth::{ChangePasswordParam, UserLoginRequest, UserLoginResponse};
pub use model::{CreateUserParam, UpdateUserParam, User, UserParam};

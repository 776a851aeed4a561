//! Task entities.

pub mod model;
pub mod status;

pub use model::{CreateTaskParam, Task, TaskParam, UpdateTaskParam};
pub use status::{Periodic, TaskStatus};

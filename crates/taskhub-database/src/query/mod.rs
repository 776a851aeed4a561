//! SQL fragment construction from filter and update parameters.

pub mod arguments;
pub mod builder;

pub use arguments::into_arguments;
pub use builder::{BuiltInsert, BuiltQuery, BuiltUpdate, SqlQueryBuilder};

//! Core type definitions used across the TaskHub workspace.

pub mod filter;
pub mod pagination;
pub mod sorting;
pub mod timestamp;

pub use filter::{FilterField, FilterValue, QueryOption};
pub use pagination::{Pagination, PaginationParam};
pub use sorting::{SortDirection, SortField};
pub use timestamp::Timestamp;

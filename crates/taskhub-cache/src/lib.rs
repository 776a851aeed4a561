//! # taskhub-cache
//!
//! Cache providers for TaskHub. Supports two modes:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. On top of the
//! provider, [`EntityCache`] implements the per-entity read-through cache:
//! entries keyed by the serialized filter, invalidated namespace-wide.

pub mod entity;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use entity::EntityCache;
pub use provider::CacheManager;

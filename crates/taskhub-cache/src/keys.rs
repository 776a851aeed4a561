//! Cache key builders for all TaskHub cache entries.
//!
//! Centralising key construction keeps the read keys and the invalidation
//! patterns in agreement.

/// Prefix applied to all TaskHub cache keys.
const PREFIX: &str = "taskhub";

/// Cache key for a single-record read: `taskhub:<namespace>:get:<filter>`.
pub fn entity_get(namespace: &str, serialized_filter: &str) -> String {
    format!("{PREFIX}:{namespace}:get:{serialized_filter}")
}

/// Pattern matching every key of an entity namespace.
pub fn entity_namespace_pattern(namespace: &str) -> String {
    format!("{PREFIX}:{namespace}:*")
}

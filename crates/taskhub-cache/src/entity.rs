//! Per-entity read-through cache.
//!
//! Single-record reads are cached under a key derived from the serialized
//! filter. Any write clears the whole entity namespace, so a cached read can
//! be stale for at most one TTL and only when invalidation itself failed.

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use taskhub_core::context::RequestContext;
use taskhub_core::result::AppResult;
use taskhub_core::traits::cache::CacheProvider;
use taskhub_entity::record::Record;

use crate::keys;
use crate::provider::CacheManager;

/// Read-through cache for one entity type.
pub struct EntityCache<E> {
    cache: CacheManager,
    ttl: Duration,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityCache<E> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            ttl: self.ttl,
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for EntityCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCache")
            .field("cache", &self.cache)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl<E: Record> EntityCache<E> {
    /// Creates a cache using the manager's default TTL.
    pub fn new(cache: CacheManager) -> Self {
        let ttl = cache.default_ttl();
        Self::with_ttl(cache, ttl)
    }

    /// Creates a cache with an explicit TTL.
    pub fn with_ttl(cache: CacheManager, ttl: Duration) -> Self {
        Self {
            cache,
            ttl,
            _entity: PhantomData,
        }
    }

    /// The cache namespace, i.e. the entity name.
    pub fn namespace(&self) -> &'static str {
        E::DESCRIPTOR.name
    }

    /// The key a read with `filter` is cached under.
    pub fn key(&self, filter: &E::Param) -> AppResult<String> {
        let serialized = serde_json::to_string(filter)?;
        Ok(keys::entity_get(self.namespace(), &serialized))
    }

    /// Looks up a cached read. `Ok(None)` is a miss.
    pub async fn get(&self, ctx: &RequestContext, filter: &E::Param) -> AppResult<Option<E>> {
        let key = self.key(filter)?;
        let raw = ctx.bounded("cache get", self.cache.get(&key)).await?;
        match raw {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Stores `value` as the result of a read with `filter`.
    pub async fn upsert(&self, ctx: &RequestContext, filter: &E::Param, value: &E) -> AppResult<()> {
        let key = self.key(filter)?;
        let payload = serde_json::to_string(value)?;
        ctx.bounded("cache set", self.cache.set(&key, &payload, self.ttl))
            .await
    }

    /// Deletes every cached read of this entity type.
    pub async fn invalidate(&self, ctx: &RequestContext) -> AppResult<u64> {
        let pattern = keys::entity_namespace_pattern(self.namespace());
        ctx.bounded("cache invalidate", self.cache.delete_pattern(&pattern))
            .await
    }
}

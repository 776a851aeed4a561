//! Generic CRUD service over the record store.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use taskhub_core::context::RequestContext;
use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::traits::clock::Clock;
use taskhub_core::types::{Pagination, Timestamp};
use taskhub_database::RecordStore;
use taskhub_entity::record::{CreateParam, FilterParam, Record, UpdateParam};

use crate::policy::{Access, EntityPolicy};

/// Create, read, list, update, and soft-delete for one entity type, with
/// actor stamping and the entity's access policy applied.
pub struct EntityService<E, P> {
    /// Record store.
    store: RecordStore<E>,
    /// Access rules.
    policy: P,
    /// Source of update and delete stamps.
    clock: Arc<dyn Clock>,
}

impl<E, P: Clone> Clone for EntityService<E, P> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            policy: self.policy.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<E, P: fmt::Debug> fmt::Debug for EntityService<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityService")
            .field("store", &self.store)
            .field("policy", &self.policy)
            .field("clock", &self.clock)
            .finish()
    }
}

impl<E: Record, P: EntityPolicy<E>> EntityService<E, P> {
    /// Creates a new entity service.
    pub fn new(store: RecordStore<E>, policy: P, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    /// The underlying store, for flows that bypass the policy.
    pub fn store(&self) -> &RecordStore<E> {
        &self.store
    }

    /// The current time as a persisted timestamp.
    pub fn now(&self) -> Timestamp {
        Timestamp(self.clock.now())
    }

    /// Creates a record owned by the current principal.
    pub async fn create(&self, ctx: &RequestContext, mut param: E::Create) -> AppResult<E> {
        let principal = *ctx.principal()?;
        self.policy.prepare_create(&principal, &mut param)?;
        param.set_created_by(principal.actor());

        let record = self.store.create(ctx, &param).await?;
        info!(
            entity = E::DESCRIPTOR.name,
            id = record.id(),
            user_id = principal.user_id,
            "Record created"
        );
        Ok(record)
    }

    /// Reads one active record.
    pub async fn get(&self, ctx: &RequestContext, mut filter: E::Param) -> AppResult<E> {
        let principal = *ctx.principal()?;
        filter.query_option_mut().is_active = true;
        self.policy.scope(&principal, Access::Read, &mut filter)?;

        self.store.get(ctx, &filter).await
    }

    /// Lists active records with pagination totals.
    pub async fn get_list(
        &self,
        ctx: &RequestContext,
        mut filter: E::Param,
    ) -> AppResult<(Vec<E>, Pagination)> {
        let principal = *ctx.principal()?;
        filter.query_option_mut().is_active = true;
        filter.pagination_mut().include_pagination = true;
        self.policy.scope(&principal, Access::List, &mut filter)?;

        self.store.get_list(ctx, &filter).await
    }

    /// Writes the present fields of `update` to the records matching `select`.
    ///
    /// An update with nothing present is rejected before the lifecycle stamps
    /// are added.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        mut update: E::Update,
        mut select: E::Param,
    ) -> AppResult<()> {
        let principal = *ctx.principal()?;
        if update.fields().is_empty() {
            return Err(AppError::bad_request(format!(
                "Update of {} has no fields to write",
                E::DESCRIPTOR.name
            )));
        }
        self.policy.scope(&principal, Access::Write, &mut select)?;
        update
            .lifecycle_mut()
            .stamp_update(self.now(), principal.actor());

        self.store.update(ctx, &update, &select).await
    }

    /// Soft-deletes the records matching `select`.
    pub async fn delete(&self, ctx: &RequestContext, select: E::Param) -> AppResult<()> {
        let principal = *ctx.principal()?;
        let mut update = E::Update::default();
        update
            .lifecycle_mut()
            .stamp_delete(self.now(), principal.actor());

        self.update(ctx, update, select).await?;
        info!(
            entity = E::DESCRIPTOR.name,
            user_id = principal.user_id,
            "Records soft-deleted"
        );
        Ok(())
    }
}

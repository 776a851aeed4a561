//! Generic record store.
//!
//! One implementation serves every entity: the [`Record`] descriptor
//! supplies the table and field mapping, the query builder turns parameters
//! into SQL, and the entity cache fronts single-record reads.

use std::fmt;

use futures::TryStreamExt;
use sqlx::Row;
use tracing::{debug, error, info};

use taskhub_cache::EntityCache;
use taskhub_core::context::RequestContext;
use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_core::types::{FilterValue, Pagination, QueryOption};
use taskhub_entity::record::{CreateParam, FilterParam, Record, UpdateParam};

use crate::connection::DatabasePool;
use crate::query::{SqlQueryBuilder, into_arguments};

/// Transactional create, cached get, paginated list, and partial update
/// for one entity type.
pub struct RecordStore<E> {
    db: DatabasePool,
    cache: EntityCache<E>,
}

impl<E> Clone for RecordStore<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<E> fmt::Debug for RecordStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("db", &self.db)
            .field("cache", &self.cache)
            .finish()
    }
}

impl<E: Record> RecordStore<E> {
    /// Create a new store.
    pub fn new(db: DatabasePool, cache: EntityCache<E>) -> Self {
        Self { db, cache }
    }

    /// Inserts a record in a leader transaction and returns it as a
    /// subsequent read would see it.
    pub async fn create(&self, ctx: &RequestContext, param: &E::Create) -> AppResult<E> {
        let descriptor = E::DESCRIPTOR;
        let built = SqlQueryBuilder::new(self.db.dialect(), &descriptor, &QueryOption::default())
            .build_insert(&param.fields())?;
        let sql = format!(
            "INSERT INTO {} {} RETURNING id",
            descriptor.table, built.values_ext
        );

        let id = ctx.bounded("create", self.insert(&sql, &built.args)).await?;
        debug!(entity = descriptor.name, id, "Record created");

        self.invalidate(ctx).await;
        self.get(ctx, &E::Param::by_id(id)).await
    }

    async fn insert(&self, sql: &str, values: &[FilterValue]) -> AppResult<i64> {
        let name = E::DESCRIPTOR.name;

        // Dropping `tx` before commit rolls it back.
        let mut tx = self.db.leader().begin().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::TransactionBeginFailed,
                format!("Failed to begin {name} transaction"),
                e,
            )
        })?;

        let args = into_arguments(values)?;
        let row = sqlx::query_with(sql, args)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| execution_error(e, name))?
            .ok_or_else(|| {
                AppError::new(
                    ErrorKind::NoRowsAffected,
                    format!("Insert into {name} affected no rows"),
                )
            })?;

        let id: i64 = row.try_get("id").map_err(|e| {
            AppError::with_source(
                ErrorKind::IdRetrievalFailed,
                format!("Failed to read generated {name} id"),
                e,
            )
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::TransactionCommitFailed,
                format!("Failed to commit {name} transaction"),
                e,
            )
        })?;

        Ok(id)
    }

    /// Reads exactly one record matching `filter`, through the cache.
    pub async fn get(&self, ctx: &RequestContext, filter: &E::Param) -> AppResult<E> {
        let descriptor = E::DESCRIPTOR;

        match self.cache.get(ctx, filter).await {
            Ok(Some(hit)) => return Ok(hit),
            Ok(None) => info!(entity = descriptor.name, "Cache miss, reading from store"),
            Err(e) => error!(
                entity = descriptor.name,
                error = %e,
                "Cache read failed, reading from store"
            ),
        }

        let built = SqlQueryBuilder::new(self.db.dialect(), &descriptor, filter.query_option())
            .build(&filter.fields(), filter.pagination())?;
        let sql = format!(
            "SELECT {} FROM {}{}",
            descriptor.select_list(),
            descriptor.table,
            built.query_ext
        );
        let args = into_arguments(&built.query_args)?;

        let record = ctx
            .bounded("get", async {
                sqlx::query_as_with::<_, E, _>(&sql, args)
                    .fetch_optional(self.db.follower())
                    .await
                    .map_err(|e| read_error(e, descriptor.name))
            })
            .await?
            .ok_or_else(|| {
                AppError::record_not_found(format!("{} does not exist", descriptor.name))
            })?;

        if let Err(e) = self.cache.upsert(ctx, filter, &record).await {
            error!(entity = descriptor.name, error = %e, "Failed to cache read result");
        }

        Ok(record)
    }

    /// Reads a page of records matching `filter`. Rows that fail to decode
    /// are skipped.
    pub async fn get_list(
        &self,
        ctx: &RequestContext,
        filter: &E::Param,
    ) -> AppResult<(Vec<E>, Pagination)> {
        let descriptor = E::DESCRIPTOR;
        let page = filter.pagination();

        let built = SqlQueryBuilder::new(self.db.dialect(), &descriptor, filter.query_option())
            .build(&filter.fields(), page)?;
        let sql = format!(
            "SELECT {} FROM {}{}",
            descriptor.select_list(),
            descriptor.table,
            built.query_ext
        );

        let records = ctx
            .bounded("get list", self.fetch_rows(&sql, &built.query_args))
            .await?;

        let mut pagination = Pagination::new(page, records.len());
        if !records.is_empty() && page.include_pagination && !page.disable_limit {
            let count_sql = format!("SELECT COUNT(*) FROM {}{}", descriptor.table, built.count_ext);
            let args = into_arguments(&built.count_args)?;
            pagination.total_elements = ctx
                .bounded("count", async {
                    sqlx::query_scalar_with::<_, i64, _>(&count_sql, args)
                        .fetch_one(self.db.follower())
                        .await
                        .map_err(|e| read_error(e, descriptor.name))
                })
                .await?;
        }
        pagination.process(page.effective_limit());

        Ok((records, pagination))
    }

    async fn fetch_rows(&self, sql: &str, values: &[FilterValue]) -> AppResult<Vec<E>> {
        let name = E::DESCRIPTOR.name;
        let args = into_arguments(values)?;
        let mut rows = sqlx::query_with(sql, args).fetch(self.db.follower());

        let mut records = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(|e| read_error(e, name))? {
            match E::from_row(&row) {
                Ok(record) => records.push(record),
                Err(e) => error!(entity = name, error = %e, "Skipping row that failed to decode"),
            }
        }
        Ok(records)
    }

    /// Writes the present fields of `update` to every row matching
    /// `select`. Matching zero rows is not an error.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        update: &E::Update,
        select: &E::Param,
    ) -> AppResult<()> {
        let descriptor = E::DESCRIPTOR;
        let built = SqlQueryBuilder::new(self.db.dialect(), &descriptor, select.query_option())
            .build_update(&update.fields(), &select.fields())?;
        let sql = format!("UPDATE {}{}", descriptor.table, built.set_ext);
        let args = into_arguments(&built.args)?;

        let result = ctx
            .bounded("update", async {
                sqlx::query_with(&sql, args)
                    .execute(self.db.leader())
                    .await
                    .map_err(|e| execution_error(e, descriptor.name))
            })
            .await?;
        debug!(
            entity = descriptor.name,
            rows_affected = result.rows_affected(),
            "Records updated"
        );

        self.invalidate(ctx).await;
        Ok(())
    }

    async fn invalidate(&self, ctx: &RequestContext) {
        match self.cache.invalidate(ctx).await {
            Ok(count) => debug!(entity = E::DESCRIPTOR.name, count, "Cache namespace invalidated"),
            Err(e) => error!(
                entity = E::DESCRIPTOR.name,
                error = %e,
                "Cache invalidation failed"
            ),
        }
    }
}

fn execution_error(e: sqlx::Error, entity: &str) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::with_source(
                ErrorKind::Conflict,
                format!("A {entity} with the same unique value already exists"),
                e,
            );
        }
    }
    AppError::with_source(
        ErrorKind::StatementExecutionFailed,
        format!("Failed to write {entity}"),
        e,
    )
}

fn read_error(e: sqlx::Error, entity: &str) -> AppError {
    let kind = match &e {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. } => ErrorKind::RowDecodeFailed,
        _ => ErrorKind::ReadFailed,
    };
    AppError::with_source(kind, format!("Failed to read {entity}"), e)
}

//! Record store tests against an in-memory SQLite database.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use taskhub_cache::{CacheManager, EntityCache};
use taskhub_core::config::DatabaseConfig;
use taskhub_core::config::cache::MemoryCacheConfig;
use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_core::traits::cache::CacheProvider;
use taskhub_core::types::{PaginationParam, QueryOption};
use taskhub_core::RequestContext;
use taskhub_cache::memory::MemoryCacheProvider;
use taskhub_database::migration::run_migrations;
use taskhub_database::{DatabasePool, RecordStore};
use taskhub_entity::category::{Category, CategoryParam, CreateCategoryParam, UpdateCategoryParam};
use taskhub_entity::task::{CreateTaskParam, Task, TaskParam, TaskStatus};
use taskhub_entity::user::{CreateUserParam, User, UserParam};
use taskhub_entity::{FilterParam, LifecycleUpdate, STATUS_DELETED};

struct Harness {
    db: DatabasePool,
    cache: CacheManager,
}

impl Harness {
    async fn new() -> Self {
        let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 });
        Self::with_provider(Arc::new(provider)).await
    }

    async fn with_provider(provider: Arc<dyn CacheProvider>) -> Self {
        let db = DatabasePool::connect(&DatabaseConfig::with_url("sqlite::memory:"))
            .await
            .expect("connect");
        run_migrations(&db).await.expect("migrate");
        let cache = CacheManager::from_provider(provider, Duration::from_secs(60));
        Self { db, cache }
    }

    fn store<E: taskhub_entity::Record>(&self) -> RecordStore<E> {
        RecordStore::new(self.db.clone(), EntityCache::new(self.cache.clone()))
    }
}

/// A cache backend that fails every call.
#[derive(Debug)]
struct BrokenCache;

#[async_trait]
impl CacheProvider for BrokenCache {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        Err(AppError::cache("connection refused"))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        Err(AppError::cache("connection refused"))
    }

    async fn delete_pattern(&self, _pattern: &str) -> AppResult<u64> {
        Err(AppError::cache("connection refused"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }
}

fn ctx() -> RequestContext {
    RequestContext::background()
}

fn category(name: &str) -> CreateCategoryParam {
    CreateCategoryParam {
        name: name.to_string(),
        created_by: Some("7".into()),
    }
}

fn task(user_id: i64, title: &str) -> CreateTaskParam {
    CreateTaskParam {
        user_id,
        category_id: 1,
        title: title.to_string(),
        created_by: Some(user_id.to_string()),
        ..Default::default()
    }
}

fn active(mut param: CategoryParam) -> CategoryParam {
    param.query_option = QueryOption::active();
    param
}

#[tokio::test]
async fn test_create_then_get_has_lifecycle_fields() {
    let h = Harness::new().await;
    let store = h.store::<Category>();

    let created = store.create(&ctx(), &category("errands")).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, "errands");
    assert_eq!(created.lifecycle.status, 1);
    assert!(created.lifecycle.created_at.is_some());
    assert_eq!(created.lifecycle.created_by.as_deref(), Some("7"));
    assert!(created.lifecycle.deleted_at.is_none());

    let fetched = store
        .get(&ctx(), &CategoryParam::by_id(created.id))
        .await
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_missing_record_is_record_not_found() {
    let h = Harness::new().await;
    let err = h
        .store::<Category>()
        .get(&ctx(), &CategoryParam::by_id(404))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecordNotFound);
}

#[tokio::test]
async fn test_cache_hit_matches_store_read() {
    let h = Harness::new().await;
    let store = h.store::<Task>();
    let cache = EntityCache::<Task>::new(h.cache.clone());

    let created = store.create(&ctx(), &task(3, "call plumber")).await.unwrap();
    let filter = TaskParam::by_id(created.id);

    // `create` re-reads through `get`, so the entry is already cached.
    let cached = cache.get(&ctx(), &filter).await.unwrap();
    assert_eq!(cached.as_ref(), Some(&created));

    let again = store.get(&ctx(), &filter).await.unwrap();
    assert_eq!(again, created);
}

#[tokio::test]
async fn test_write_invalidates_whole_namespace() {
    let h = Harness::new().await;
    let store = h.store::<Category>();

    let first = store.create(&ctx(), &category("home")).await.unwrap();
    let filter = CategoryParam::by_id(first.id);
    store.get(&ctx(), &filter).await.unwrap();

    // Change the row behind the cache's back; the cached read is now stale.
    sqlx::query("UPDATE category SET name = 'garden' WHERE id = ?")
        .bind(first.id)
        .execute(h.db.leader())
        .await
        .unwrap();
    assert_eq!(store.get(&ctx(), &filter).await.unwrap().name, "home");

    // A write to a different record clears every cached category read.
    store.create(&ctx(), &category("work")).await.unwrap();
    assert_eq!(store.get(&ctx(), &filter).await.unwrap().name, "garden");
}

#[tokio::test]
async fn test_soft_deleted_rows_hidden_only_by_active_option() {
    let h = Harness::new().await;
    let store = h.store::<Category>();

    let keep = store.create(&ctx(), &category("keep")).await.unwrap();
    let gone = store.create(&ctx(), &category("gone")).await.unwrap();

    let mut delete = UpdateCategoryParam::default();
    delete.lifecycle.stamp_delete(
        taskhub_core::types::Timestamp(chrono::Utc::now()),
        "7",
    );
    store
        .update(&ctx(), &delete, &CategoryParam::by_id(gone.id))
        .await
        .unwrap();

    let err = store
        .get(&ctx(), &active(CategoryParam::by_id(gone.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecordNotFound);

    let raw = store.get(&ctx(), &CategoryParam::by_id(gone.id)).await.unwrap();
    assert_eq!(raw.lifecycle.status, STATUS_DELETED);
    assert_eq!(raw.lifecycle.deleted_by.as_deref(), Some("7"));
    assert!(raw.lifecycle.deleted_at.is_some());
    assert_eq!(raw.lifecycle.updated_at, raw.lifecycle.deleted_at);

    let (listed, _) = store
        .get_list(&ctx(), &active(CategoryParam::default()))
        .await
        .unwrap();
    assert_eq!(listed.iter().map(|c| c.id).collect::<Vec<_>>(), vec![keep.id]);

    let (all, _) = store
        .get_list(&ctx(), &CategoryParam::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_update_matching_zero_rows_succeeds() {
    let h = Harness::new().await;
    let store = h.store::<Category>();

    let update = UpdateCategoryParam {
        name: Some("nothing".into()),
        lifecycle: LifecycleUpdate::default(),
    };
    store
        .update(&ctx(), &update, &CategoryParam::by_id(999))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_update_is_bad_request() {
    let h = Harness::new().await;
    let err = h
        .store::<Category>()
        .update(&ctx(), &UpdateCategoryParam::default(), &CategoryParam::by_id(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
}

#[tokio::test]
async fn test_list_pagination() {
    let h = Harness::new().await;
    let store = h.store::<Task>();
    for i in 0..25 {
        store
            .create(&ctx(), &task(1, &format!("task {i}")))
            .await
            .unwrap();
    }

    let mut filter = TaskParam {
        user_id: Some(1),
        pagination: PaginationParam {
            page: 3,
            limit: 10,
            sort_by: vec!["id".into()],
            include_pagination: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let (page, pagination) = store.get_list(&ctx(), &filter).await.unwrap();
    assert_eq!(page.len(), 5);
    assert_eq!(pagination.current_page, 3);
    assert_eq!(pagination.current_elements, 5);
    assert_eq!(pagination.total_elements, 25);
    assert_eq!(pagination.total_pages, 3);
    assert_eq!(pagination.sort_by, vec!["id".to_string()]);

    filter.pagination.disable_limit = true;
    let (all, pagination) = store.get_list(&ctx(), &filter).await.unwrap();
    assert_eq!(all.len(), 25);
    assert_eq!(pagination.total_elements, 0);
    assert_eq!(pagination.total_pages, 1);

    let empty = TaskParam {
        user_id: Some(2),
        pagination: PaginationParam {
            include_pagination: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let (none, pagination) = store.get_list(&ctx(), &empty).await.unwrap();
    assert!(none.is_empty());
    assert_eq!(pagination.total_pages, 1);
    assert_eq!(pagination.current_page, 1);
}

#[tokio::test]
async fn test_list_skips_undecodable_rows() {
    let h = Harness::new().await;
    let store = h.store::<Task>();
    store.create(&ctx(), &task(5, "fine")).await.unwrap();

    sqlx::query(
        "INSERT INTO task (fk_user_id, fk_category_id, title, task_status) \
         VALUES (5, 1, 'broken', 'someday')",
    )
    .execute(h.db.leader())
    .await
    .unwrap();

    let filter = TaskParam {
        user_id: Some(5),
        ..Default::default()
    };
    let (tasks, _) = store.get_list(&ctx(), &filter).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "fine");

    let broken = TaskParam {
        title: Some("broken".into()),
        ..Default::default()
    };
    let err = store.get(&ctx(), &broken).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RowDecodeFailed);
}

#[tokio::test]
async fn test_concurrent_creates_get_unique_ids() {
    let h = Harness::new().await;
    let store = h.store::<Task>();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .create(&RequestContext::background(), &task(1, &format!("t{i}")))
                    .await
                    .map(|t| t.id)
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn test_unique_violation_is_conflict() {
    let h = Harness::new().await;
    let store = h.store::<User>();
    let param = CreateUserParam {
        email: "ann@example.com".into(),
        username: "ann".into(),
        password: "hash".into(),
        created_by: Some("0".into()),
        ..Default::default()
    };
    store.create(&ctx(), &param).await.unwrap();

    let err = store.create(&ctx(), &param).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let found = store
        .get(&ctx(), &UserParam::by_email("ann@example.com"))
        .await
        .unwrap();
    assert_eq!(found.username, "ann");
}

#[tokio::test]
async fn test_expired_deadline_is_deadline_exceeded() {
    let h = Harness::new().await;
    let store = h.store::<Category>();
    let expired = RequestContext::background().with_deadline(Instant::now());

    let err = store
        .get(&expired, &CategoryParam::by_id(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DeadlineExceeded);

    let err = store.create(&expired, &category("late")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DeadlineExceeded);

    let (rows, _) = store
        .get_list(&ctx(), &CategoryParam::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_deadline_elapsing_during_store_call_is_deadline_exceeded() {
    let h = Harness::new().await;
    let store = h.store::<Category>();
    let created = store.create(&ctx(), &category("blocked")).await.unwrap();

    // The in-memory pool has a single connection; holding it stalls every query.
    let held = h.db.leader().acquire().await.expect("acquire");

    let started = Instant::now();
    let short = RequestContext::background().with_timeout(Duration::from_millis(150));
    let err = store
        .get_list(&short, &CategoryParam::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DeadlineExceeded);
    assert!(started.elapsed() >= Duration::from_millis(150));

    let short = RequestContext::background().with_timeout(Duration::from_millis(150));
    let err = store.create(&short, &category("stalled")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DeadlineExceeded);

    drop(held);

    let fetched = store
        .get(&ctx(), &CategoryParam::by_id(created.id))
        .await
        .unwrap();
    assert_eq!(fetched.name, "blocked");
    let (rows, _) = store
        .get_list(&ctx(), &CategoryParam::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_failing_cache_never_fails_reads_or_writes() {
    let h = Harness::with_provider(Arc::new(BrokenCache)).await;
    let store = h.store::<Category>();

    let created = store.create(&ctx(), &category("resilient")).await.unwrap();
    let fetched = store
        .get(&ctx(), &CategoryParam::by_id(created.id))
        .await
        .unwrap();
    assert_eq!(fetched, created);

    let update = UpdateCategoryParam {
        name: Some("still here".into()),
        ..Default::default()
    };
    store
        .update(&ctx(), &update, &CategoryParam::by_id(created.id))
        .await
        .unwrap();
    let fetched = store
        .get(&ctx(), &CategoryParam::by_id(created.id))
        .await
        .unwrap();
    assert_eq!(fetched.name, "still here");
}

#[tokio::test]
async fn test_task_filters_by_enum_column() {
    let h = Harness::new().await;
    let store = h.store::<Task>();
    let mut done = task(8, "done one");
    done.task_status = TaskStatus::Done;
    store.create(&ctx(), &done).await.unwrap();
    store.create(&ctx(), &task(8, "open one")).await.unwrap();

    let filter = TaskParam {
        task_status: Some(TaskStatus::Done),
        ..Default::default()
    };
    let (tasks, _) = store.get_list(&ctx(), &filter).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "done one");
}

//! Service tests against an in-memory SQLite database and memory cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use taskhub_auth::{JwtDecoder, JwtEncoder, PasswordHasher};
use taskhub_cache::memory::MemoryCacheProvider;
use taskhub_cache::{CacheManager, EntityCache};
use taskhub_core::config::cache::MemoryCacheConfig;
use taskhub_core::config::{AuthConfig, DatabaseConfig};
use taskhub_core::error::ErrorKind;
use taskhub_core::traits::clock::{Clock, FixedClock};
use taskhub_core::types::Timestamp;
use taskhub_core::{Principal, RequestContext};
use taskhub_database::migration::run_migrations;
use taskhub_database::{DatabasePool, RecordStore};
use taskhub_entity::category::{CategoryParam, CreateCategoryParam};
use taskhub_entity::record::{FilterParam, Record};
use taskhub_entity::role::{CreateRoleParam, RoleParam};
use taskhub_entity::task::{CreateTaskParam, TaskParam, UpdateTaskParam};
use taskhub_entity::user::{
    ChangePasswordParam, CreateUserParam, UpdateUserParam, UserLoginRequest, UserParam,
};
use taskhub_entity::STATUS_DELETED;
use taskhub_service::{
    CategoryPolicy, CategoryService, EntityService, RolePolicy, RoleService, TaskPolicy,
    TaskService, UserPolicy, UserService,
};

const ADMIN: Principal = Principal {
    user_id: 1,
    role_id: Some(1),
};

struct Fixture {
    db: DatabasePool,
    clock: FixedClock,
    auth: AuthConfig,
    tasks: TaskService,
    categories: CategoryService,
    roles: RoleService,
    users: UserService,
}

impl Fixture {
    async fn new() -> Self {
        let db = DatabasePool::connect(&DatabaseConfig::with_url("sqlite::memory:"))
            .await
            .expect("connect");
        run_migrations(&db).await.expect("migrate");

        let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 1000 });
        let cache = CacheManager::from_provider(Arc::new(provider), Duration::from_secs(60));

        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());
        let auth = AuthConfig {
            jwt_secret: "service-test-secret".into(),
            jwt_access_ttl_minutes: 60,
        };

        fn store<E: Record>(db: &DatabasePool, cache: &CacheManager) -> RecordStore<E> {
            RecordStore::new(db.clone(), EntityCache::new(cache.clone()))
        }

        let users = UserService::new(
            EntityService::new(store(&db, &cache), UserPolicy, shared.clone()),
            PasswordHasher::new(),
            JwtEncoder::new(&auth),
            shared.clone(),
        );

        Self {
            tasks: EntityService::new(store(&db, &cache), TaskPolicy, shared.clone()),
            categories: EntityService::new(store(&db, &cache), CategoryPolicy, shared.clone()),
            roles: EntityService::new(store(&db, &cache), RolePolicy, shared.clone()),
            users,
            db,
            clock,
            auth,
        }
    }

    fn as_user(&self, user_id: i64) -> RequestContext {
        RequestContext::background().with_principal(Principal::new(user_id, Some(2)))
    }

    fn as_admin(&self) -> RequestContext {
        RequestContext::background().with_principal(ADMIN)
    }

    async fn register(&self, email: &str, password: &str) -> i64 {
        self.users
            .register(&RequestContext::background(), registration(email, password))
            .await
            .expect("register")
            .id
    }
}

fn registration(email: &str, password: &str) -> CreateUserParam {
    CreateUserParam {
        email: email.to_string(),
        username: email.split('@').next().unwrap_or(email).to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
        display_name: "Tester".to_string(),
        ..Default::default()
    }
}

fn new_task(title: &str) -> CreateTaskParam {
    CreateTaskParam {
        category_id: 1,
        title: title.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_operations_without_principal_are_unauthorized() {
    let fx = Fixture::new().await;
    let anonymous = RequestContext::background();

    let err = fx
        .tasks
        .create(&anonymous, new_task("x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    let err = fx
        .categories
        .get_list(&anonymous, CategoryParam::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_create_stamps_actor_and_owner() {
    let fx = Fixture::new().await;
    let mut param = new_task("water plants");
    param.user_id = 77;

    let task = fx.tasks.create(&fx.as_user(12), param).await.unwrap();
    assert_eq!(task.user_id, 12);
    assert_eq!(task.lifecycle.created_by.as_deref(), Some("12"));
    assert!(task.lifecycle.is_active());
}

#[tokio::test]
async fn test_update_stamps_clock_time_and_actor() {
    let fx = Fixture::new().await;
    let ctx = fx.as_user(4);
    let task = fx.tasks.create(&ctx, new_task("draft")).await.unwrap();

    let later = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
    fx.clock.set(later);
    let update = UpdateTaskParam {
        title: Some("final".into()),
        ..Default::default()
    };
    fx.tasks
        .update(&ctx, update, TaskParam::by_id(task.id))
        .await
        .unwrap();

    let task = fx.tasks.get(&ctx, TaskParam::by_id(task.id)).await.unwrap();
    assert_eq!(task.title, "final");
    assert_eq!(task.lifecycle.updated_at, Some(Timestamp(later)));
    assert_eq!(task.lifecycle.updated_by.as_deref(), Some("4"));
}

#[tokio::test]
async fn test_update_without_fields_is_bad_request() {
    let fx = Fixture::new().await;
    let ctx = fx.as_user(4);
    let task = fx.tasks.create(&ctx, new_task("untouched")).await.unwrap();

    let err = fx
        .tasks
        .update(&ctx, UpdateTaskParam::default(), TaskParam::by_id(task.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);

    let task = fx.tasks.get(&ctx, TaskParam::by_id(task.id)).await.unwrap();
    assert_eq!(task.lifecycle.updated_at, None);
    assert_eq!(task.lifecycle.updated_by, None);
}

#[tokio::test]
async fn test_profile_update_with_only_stripped_fields_is_bad_request() {
    let fx = Fixture::new().await;
    let id = fx.register("gil@example.com", "pw").await;

    let update = UpdateUserParam {
        role_id: Some(1),
        password: Some("sneaky".into()),
        ..Default::default()
    };
    let err = fx
        .users
        .update_profile(&fx.as_user(id), update)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
}

#[tokio::test]
async fn test_list_page_beyond_offset_range_is_rejected() {
    let fx = Fixture::new().await;
    let mut filter = TaskParam::default();
    filter.pagination.page = i64::MAX;
    filter.pagination.limit = 10;

    let err = fx
        .tasks
        .get_list(&fx.as_user(4), filter)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::QueryBuildFailed);
}

#[tokio::test]
async fn test_delete_is_soft_and_hidden_from_reads() {
    let fx = Fixture::new().await;
    let ctx = fx.as_user(4);
    let task = fx.tasks.create(&ctx, new_task("obsolete")).await.unwrap();

    fx.tasks.delete(&ctx, TaskParam::by_id(task.id)).await.unwrap();

    let err = fx
        .tasks
        .get(&ctx, TaskParam::by_id(task.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecordNotFound);

    let (tasks, pagination) = fx.tasks.get_list(&ctx, TaskParam::default()).await.unwrap();
    assert!(tasks.is_empty());
    assert_eq!(pagination.total_pages, 1);

    let row = fx
        .tasks
        .store()
        .get(&ctx, &TaskParam::by_id(task.id))
        .await
        .unwrap();
    assert_eq!(row.lifecycle.status, STATUS_DELETED);
    assert_eq!(row.lifecycle.deleted_by.as_deref(), Some("4"));
    assert_eq!(row.lifecycle.deleted_at, Some(Timestamp(fx.clock.now())));
    assert_eq!(row.lifecycle.updated_at, row.lifecycle.deleted_at);
}

#[tokio::test]
async fn test_tasks_scoped_to_owner_unless_admin() {
    let fx = Fixture::new().await;
    let mine = fx.tasks.create(&fx.as_user(1_001), new_task("mine")).await.unwrap();
    fx.tasks.create(&fx.as_user(1_002), new_task("theirs")).await.unwrap();

    let (visible, pagination) = fx
        .tasks
        .get_list(&fx.as_user(1_001), TaskParam::default())
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, mine.id);
    assert_eq!(pagination.total_elements, 1);

    let err = fx
        .tasks
        .get(&fx.as_user(1_002), TaskParam::by_id(mine.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecordNotFound);

    // A foreign update matches no rows and leaves the task alone.
    let update = UpdateTaskParam {
        title: Some("hijacked".into()),
        ..Default::default()
    };
    fx.tasks
        .update(&fx.as_user(1_002), update, TaskParam::by_id(mine.id))
        .await
        .unwrap();

    let (all, _) = fx
        .tasks
        .get_list(&fx.as_admin(), TaskParam::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|t| t.title == "mine"));
}

#[tokio::test]
async fn test_role_management_requires_admin() {
    let fx = Fixture::new().await;

    let err = fx
        .roles
        .get_list(&fx.as_user(3), RoleParam::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let (roles, _) = fx
        .roles
        .get_list(&fx.as_admin(), RoleParam::default())
        .await
        .unwrap();
    assert_eq!(roles.len(), 2);

    let created = fx
        .roles
        .create(
            &fx.as_admin(),
            CreateRoleParam {
                name: "Auditor".into(),
                rank: 5,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.lifecycle.created_by.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_categories_open_to_any_user() {
    let fx = Fixture::new().await;
    let created = fx
        .categories
        .create(
            &fx.as_user(9),
            CreateCategoryParam {
                name: "Chores".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let fetched = fx
        .categories
        .get(&fx.as_user(10), CategoryParam::by_id(created.id))
        .await
        .unwrap();
    assert_eq!(fetched.name, "Chores");
}

#[tokio::test]
async fn test_register_hashes_password_and_assigns_user_role() {
    let fx = Fixture::new().await;
    let id = fx.register("ann@example.com", "hunter22").await;

    let user = fx
        .users
        .users()
        .store()
        .get(&RequestContext::background(), &UserParam::by_id(id))
        .await
        .unwrap();
    assert_ne!(user.password, "hunter22");
    assert!(
        PasswordHasher::new()
            .verify_password("hunter22", &user.password)
            .unwrap()
    );
    assert_eq!(user.role_id, Some(2));
    assert_eq!(user.lifecycle.created_by.as_deref(), Some("0"));
}

#[tokio::test]
async fn test_register_rejects_mismatched_confirmation() {
    let fx = Fixture::new().await;
    let mut param = registration("bob@example.com", "one");
    param.confirm_password = "two".into();

    let err = fx
        .users
        .register(&RequestContext::background(), param)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ValidationFailed);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts_even_after_delete() {
    let fx = Fixture::new().await;
    let id = fx.register("cat@example.com", "pw").await;

    let err = fx
        .users
        .register(&RequestContext::background(), registration("cat@example.com", "pw"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    fx.users.delete_self(&fx.as_user(id)).await.unwrap();

    let mut again = registration("cat@example.com", "pw");
    again.username = "cat2".into();
    let err = fx
        .users
        .register(&RequestContext::background(), again)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_sign_in_issues_token_for_principal() {
    let fx = Fixture::new().await;
    let id = fx.register("dan@example.com", "s3cret").await;
    fx.clock.set(Utc::now());

    let response = fx
        .users
        .sign_in(
            &RequestContext::background(),
            UserLoginRequest {
                email: "dan@example.com".into(),
                password: "s3cret".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(response.email, "dan@example.com");
    assert_eq!(response.display_name, "Tester");

    let claims = JwtDecoder::new(&fx.auth)
        .decode_access_token(&response.access_token)
        .unwrap();
    assert_eq!(claims.principal(), Principal::new(id, Some(2)));

    let refreshed = fx.users.refresh_token(&fx.as_user(id)).await.unwrap();
    let claims = JwtDecoder::new(&fx.auth)
        .decode_access_token(&refreshed.access_token)
        .unwrap();
    assert_eq!(claims.user_id(), id);
}

#[tokio::test]
async fn test_sign_in_failures() {
    let fx = Fixture::new().await;
    let id = fx.register("eve@example.com", "right").await;
    let bg = RequestContext::background();

    let err = fx
        .users
        .sign_in(&bg, UserLoginRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);

    let err = fx
        .users
        .sign_in(
            &bg,
            UserLoginRequest {
                email: "nobody@example.com".into(),
                password: "x".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = fx
        .users
        .sign_in(
            &bg,
            UserLoginRequest {
                email: "eve@example.com".into(),
                password: "wrong".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    fx.users.delete_self(&fx.as_user(id)).await.unwrap();
    let err = fx
        .users
        .sign_in(
            &bg,
            UserLoginRequest {
                email: "eve@example.com".into(),
                password: "right".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_profile_update_cannot_change_role() {
    let fx = Fixture::new().await;
    let id = fx.register("fay@example.com", "pw").await;
    let ctx = fx.as_user(id);

    let update = UpdateUserParam {
        display_name: Some("Fay".into()),
        role_id: Some(1),
        ..Default::default()
    };
    let user = fx.users.update_profile(&ctx, update).await.unwrap();
    assert_eq!(user.display_name, "Fay");
    assert_eq!(user.role_id, Some(2));
    assert_eq!(user.lifecycle.updated_by.as_deref(), Some(id.to_string().as_str()));
}

#[tokio::test]
async fn test_change_password() {
    let fx = Fixture::new().await;
    let id = fx.register("gus@example.com", "old-pw").await;
    let ctx = fx.as_user(id);

    let err = fx
        .users
        .change_password(
            &ctx,
            ChangePasswordParam {
                old_password: "not-it".into(),
                new_password: "new-pw".into(),
                confirm_password: "new-pw".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    fx.users
        .change_password(
            &ctx,
            ChangePasswordParam {
                old_password: "old-pw".into(),
                new_password: "new-pw".into(),
                confirm_password: "new-pw".into(),
            },
        )
        .await
        .unwrap();

    let login = |password: &str| UserLoginRequest {
        email: "gus@example.com".into(),
        password: password.into(),
    };
    let bg = RequestContext::background();
    assert!(fx.users.sign_in(&bg, login("new-pw")).await.is_ok());
    let err = fx.users.sign_in(&bg, login("old-pw")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_user_listing_is_admin_only() {
    let fx = Fixture::new().await;
    let id = fx.register("hal@example.com", "pw").await;

    let err = fx
        .users
        .users()
        .get_list(&fx.as_user(id), UserParam::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let (users, _) = fx
        .users
        .users()
        .get_list(&fx.as_admin(), UserParam::default())
        .await
        .unwrap();
    assert_eq!(users.len(), 1);

    // Raw access for fixture sanity: the migration seeded no users.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(fx.db.leader())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

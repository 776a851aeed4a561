//! Leader/follower connection pool management.

use std::time::Duration;

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use tracing::info;

use taskhub_core::config::DatabaseConfig;
use taskhub_core::error::{AppError, ErrorKind};

use crate::dialect::Dialect;

/// Leader and follower pools over the same dialect.
///
/// Writes and transactions go to the leader. Filtered and list reads go to
/// the follower, which is the leader itself when no replica is configured.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    leader: AnyPool,
    follower: AnyPool,
    dialect: Dialect,
}

impl DatabasePool {
    /// Create the pools from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        sqlx::any::install_default_drivers();

        let dialect = Dialect::from_url(&config.url)?;
        let leader = open_pool(config, &config.url, "leader").await?;

        let follower = match &config.replica_url {
            Some(url) => {
                if Dialect::from_url(url)? != dialect {
                    return Err(AppError::configuration(
                        "Leader and replica must use the same database backend",
                    ));
                }
                open_pool(config, url, "follower").await?
            }
            None => leader.clone(),
        };

        Ok(Self {
            leader,
            follower,
            dialect,
        })
    }

    /// Wrap already-open pools.
    pub fn from_pools(leader: AnyPool, follower: AnyPool, dialect: Dialect) -> Self {
        Self {
            leader,
            follower,
            dialect,
        }
    }

    /// The write-capable pool.
    pub fn leader(&self) -> &AnyPool {
        &self.leader
    }

    /// The read pool.
    pub fn follower(&self) -> &AnyPool {
        &self.follower
    }

    /// The SQL dialect of both pools.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT CAST(1 AS BIGINT)")
            .fetch_one(&self.follower)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    /// Close all connections in both pools.
    pub async fn close(&self) {
        self.leader.close().await;
        self.follower.close().await;
        info!("Database pools closed");
    }
}

async fn open_pool(config: &DatabaseConfig, url: &str, role: &str) -> Result<AnyPool, AppError> {
    info!(
        url = %mask_password(url),
        role,
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to database"
    );

    // Every connection to `sqlite::memory:` opens its own empty database, so
    // the pool must hold exactly one connection for its whole life.
    let options = if url.contains(":memory:") {
        AnyPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
    };

    let pool = options
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect(url)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to connect to database: {e}"),
                e,
            )
        })?;

    info!(role, "Successfully connected to database");
    Ok(pool)
}

/// Mask the password portion of a database URL for safe logging.
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}

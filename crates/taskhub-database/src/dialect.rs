//! SQL dialect differences the query builder has to care about.

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;

/// The SQL backend behind a connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// PostgreSQL: `$1, $2, ...` placeholders.
    Postgres,
    /// SQLite: `?` placeholders.
    Sqlite,
}

impl Dialect {
    /// Detects the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> AppResult<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else {
            Err(AppError::configuration(format!(
                "Unsupported database URL scheme. Expected postgres:// or sqlite:, got '{}'",
                url.split(':').next().unwrap_or_default()
            )))
        }
    }

    /// The placeholder for the `index`-th (1-based) bound argument.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${index}"),
            Self::Sqlite => "?".to_string(),
        }
    }

    /// Return the dialect name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

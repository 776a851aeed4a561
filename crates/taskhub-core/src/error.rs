//! Unified application error types for TaskHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. The [`ErrorKind`] is the stable tag
//! callers branch on; the message is for humans and logs.

use std::fmt;

use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Opening a store transaction failed.
    TransactionBeginFailed,
    /// Executing a write statement failed.
    StatementExecutionFailed,
    /// An insert reported zero affected rows.
    NoRowsAffected,
    /// The generated primary key could not be read back.
    IdRetrievalFailed,
    /// The filter or update parameters could not be turned into SQL.
    QueryBuildFailed,
    /// A read query failed.
    ReadFailed,
    /// A single-record read matched no row.
    RecordNotFound,
    /// A row could not be decoded into its entity.
    RowDecodeFailed,
    /// Committing a store transaction failed.
    TransactionCommitFailed,
    /// The request deadline elapsed while work was in flight.
    DeadlineExceeded,
    /// Input failed a domain validation rule.
    ValidationFailed,
    /// The request itself is malformed or would be a no-op.
    BadRequest,
    /// A unique field is already taken.
    Conflict,
    /// Missing or invalid credential.
    Unauthorized,
    /// The principal is not allowed to act on the resource.
    Forbidden,
    /// A domain-level lookup found nothing (e.g. unknown email at sign-in).
    NotFound,
    /// Connecting to or migrating the store failed.
    Database,
    /// A cache backend error.
    Cache,
    /// A serialization/deserialization error.
    Serialization,
    /// A configuration error.
    Configuration,
    /// An internal error with no more specific kind.
    Internal,
}

impl ErrorKind {
    /// Returns the stable, machine-readable code for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransactionBeginFailed => "SQL_TX_BEGIN",
            Self::StatementExecutionFailed => "SQL_TX_EXEC",
            Self::NoRowsAffected => "SQL_NO_ROWS_AFFECTED",
            Self::IdRetrievalFailed => "SQL_ID_RETRIEVAL",
            Self::QueryBuildFailed => "SQL_BUILDER",
            Self::ReadFailed => "SQL_READ",
            Self::RecordNotFound => "SQL_RECORD_DOES_NOT_EXIST",
            Self::RowDecodeFailed => "SQL_ROW_SCAN",
            Self::TransactionCommitFailed => "SQL_TX_COMMIT",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::ValidationFailed => "VALIDATION",
            Self::BadRequest => "BAD_REQUEST",
            Self::Conflict => "CONFLICT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Database => "DATABASE",
            Self::Cache => "CACHE",
            Self::Serialization => "SERIALIZATION",
            Self::Configuration => "CONFIGURATION",
            Self::Internal => "INTERNAL",
        }
    }

    /// Whether the kind originates in the store layer rather than the domain.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::TransactionBeginFailed
                | Self::StatementExecutionFailed
                | Self::NoRowsAffected
                | Self::IdRetrievalFailed
                | Self::QueryBuildFailed
                | Self::ReadFailed
                | Self::RowDecodeFailed
                | Self::TransactionCommitFailed
                | Self::Database
                | Self::Cache
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified application error used throughout TaskHub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` if this error carries the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Create a record-not-found error.
    pub fn record_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RecordNotFound, message)
    }

    /// Create a query-build error.
    pub fn query_build(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QueryBuildFailed, message)
    }

    /// Create a deadline-exceeded error.
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DeadlineExceeded, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationFailed, message)
    }

    /// Create a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

//! # API Error Type
//!
//! Unified error type for service commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Error Flow                                       │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation Error? ── ValidationError::InvalidFormat ──► INVALID_FORMAT │
//! │         │             ValidationError::InvalidValue  ──► INVALID_VALUE  │
//! │         ▼                                                               │
//! │  Database Error? ──── DbError::UniqueViolation ──────► CONFLICT         │
//! │         │             DbError::NotFound / FK ────────► NOT_FOUND        │
//! │         ▼             anything else ─────────────────► INTERNAL         │
//! │  Success ───────────────────────────────────────────► T                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal errors log the underlying cause and surface a generic
//! message; store details never leak to clients.

use serde::Serialize;

use crm_core::ValidationError;
use crm_db::DbError;

/// Error kinds for API responses.
///
/// A transport maps these onto its own status space (400/404/409/500);
/// the service layer only promises the kind is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A field's syntax is wrong (e.g. malformed phone number).
    InvalidFormat,

    /// A field is well-formed but unacceptable (e.g. negative price,
    /// unknown filter field, empty product list).
    InvalidValue,

    /// A uniqueness rule was violated (duplicate email).
    Conflict,

    /// A referenced entity does not exist.
    NotFound,

    /// Infrastructure failure; safe generic message only.
    Internal,
}

/// API error returned from service commands.
///
/// ## Serialization
/// ```json
/// {
///   "kind": "CONFLICT",
///   "message": "Email already exists"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error kind for programmatic handling
    pub kind: ErrorKind,

    /// Human-readable error message for display
    pub message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ApiError {
            kind,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorKind::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::Conflict, message)
    }

    /// Creates an invalid-value error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::InvalidValue, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::Internal, message)
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let kind = match err {
            ValidationError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            ValidationError::InvalidValue { .. } => ErrorKind::InvalidValue,
        };
        ApiError::new(kind, err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),

            DbError::UniqueViolation { field, value } => {
                ApiError::conflict(format!("{} '{}' already exists", field, value))
            }

            // A foreign key failure means a referenced row is gone; surface
            // it as NotFound rather than exposing constraint mechanics.
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::new(ErrorKind::NotFound, "Referenced entity does not exist")
            }

            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::internal("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::internal("Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::internal("Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::internal("Database transaction failed")
            }
            DbError::PoolExhausted => ApiError::internal("Database pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::internal("Database operation failed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for service commands.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

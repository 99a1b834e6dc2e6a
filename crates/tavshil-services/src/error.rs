//! # Service Error Type
//!
//! Unified error type returned by every service.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tavshil                                │
//! │                                                                         │
//! │  Service call                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database error?  ── DbError ──────────┐                               │
//! │       │                                │                                │
//! │       ▼                                ▼                                │
//! │  Business rule?   ── CoreError ──► ServiceError { code, message }      │
//! │       │                                │                                │
//! │       ▼                                ▼                                │
//! │  Success ──────────────────────►  serialized to the client             │
//! │                                                                         │
//! │  The client switches on `code`; `message` is for display.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tavshil_core::CoreError;
use tavshil_db::DbError;

/// Error returned from service calls.
///
/// ## Serialization
/// ```json
/// { "code": "MINIMUM_ORDER", "message": "Minimum order for ... is ..." }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Business rule violation (terminal order, bad transition, ...)
    BusinessLogic,

    /// Cart subtotal below a cook's minimum
    MinimumOrder,

    /// Cart operation failed
    CartError,

    /// Lost a concurrent write race; reload and retry
    Conflict,

    /// Internal error
    Internal,
}

impl ServiceError {
    /// Creates a new service error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ServiceError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::CartError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to service errors.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ServiceError::new(
                ErrorCode::ValidationError,
                format!("{field} '{value}' already exists"),
            ),
            DbError::Conflict { entity, id } => ServiceError::new(
                ErrorCode::Conflict,
                format!("{entity} {id} changed underneath this update, reload and retry"),
            ),
            DbError::Corrupt { entity, id, .. } => {
                tracing::error!(%entity, %id, "Corrupt entity document");
                ServiceError::new(ErrorCode::Internal, "Stored data could not be read")
            }
            DbError::ConnectionFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ServiceError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ServiceError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to service errors.
impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::CookNotFound(id) => ServiceError::not_found("Cook", id),
            CoreError::DishNotFound(id) => ServiceError::not_found("Dish", id),
            CoreError::OrderNotFound(id) => ServiceError::not_found("Order", id),
            CoreError::CartNotFound(id) => ServiceError::not_found("Cart", id),
            CoreError::MinimumOrderNotMet { .. } => {
                ServiceError::new(ErrorCode::MinimumOrder, err.to_string())
            }
            CoreError::OrderAlreadyFinal { .. } | CoreError::InvalidStatusTransition { .. } => {
                ServiceError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::DishUnavailable { .. }
            | CoreError::EmptyCart
            | CoreError::CartTooLarge { .. }
            | CoreError::QuantityTooLarge { .. } => ServiceError::cart(err.to_string()),
            CoreError::Validation(e) => ServiceError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================

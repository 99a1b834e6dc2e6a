//! # Error Types
//!
//! Domain-specific error types for tavshil-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tavshil-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tavshil-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  tavshil-services errors                                               │
//! │  └── ServiceError     - What the view layer sees (serialized)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ServiceError → client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (order number, cook id, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cook cannot be found.
    #[error("Cook not found: {0}")]
    CookNotFound(String),

    /// Dish cannot be found.
    #[error("Dish not found: {0}")]
    DishNotFound(String),

    /// Order cannot be found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Cart cannot be found.
    #[error("Cart not found: {0}")]
    CartNotFound(String),

    /// Dish exists but the cook has marked it unavailable.
    #[error("Dish '{title}' is not available")]
    DishUnavailable { title: String },

    /// Cart subtotal is below the cook's minimum order amount.
    ///
    /// ## When This Occurs
    /// - Checkout submitted while one of the carts is under its cook's
    ///   minimum (the boundary itself passes: equal amounts are accepted)
    #[error("Minimum order for {cook_name} is {required_agorot} agorot, cart has {actual_agorot}")]
    MinimumOrderNotMet {
        cook_name: String,
        required_agorot: i64,
        actual_agorot: i64,
    },

    /// The order has reached a terminal status; no further transition is
    /// applied and nothing is appended to its history.
    #[error("Order {order_id} is already {status:?}")]
    OrderAlreadyFinal {
        order_id: String,
        status: OrderStatus,
    },

    /// The requested status change is not one the lifecycle allows.
    #[error("Cannot move order from {from:?} to {to:?}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// Checkout attempted with no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed time or email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::MinimumOrderNotMet {
            cook_name: "Savta Rachel".to_string(),
            required_agorot: 5000,
            actual_agorot: 4000,
        };
        assert_eq!(
            err.to_string(),
            "Minimum order for Savta Rachel is 5000 agorot, cart has 4000"
        );
    }

    #[test]
    fn test_terminal_order_message() {
        let err = CoreError::OrderAlreadyFinal {
            order_id: "o-1".to_string(),
            status: OrderStatus::Delivered,
        };
        assert_eq!(err.to_string(), "Order o-1 is already Delivered");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "title".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

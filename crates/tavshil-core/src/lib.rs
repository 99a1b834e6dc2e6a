//! # tavshil-core: Pure Business Logic for Tavshil
//!
//! This crate is the **heart** of the Tavshil marketplace. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Tavshil Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Frontend (web client)                       │   │
//! │  │    Storefront ──► Cart ──► Checkout ──► Order Tracking          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tavshil-services                             │   │
//! │  │    cart management, checkout, status updates, moderation        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tavshil-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌───────┐ ┌──────────┐ │   │
//! │  │   │  types  │ │  money  │ │  pricing  │ │ hours │ │lifecycle │ │   │
//! │  │   │  Cook   │ │  Money  │ │ line/total│ │ open? │ │ status   │ │   │
//! │  │   │  Order  │ │  ₪ bps  │ │ commission│ │       │ │ machine  │ │   │
//! │  │   └─────────┘ └─────────┘ └───────────┘ └───────┘ └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tavshil-db (Entity Store)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Cook, Dish, Cart, Order, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Order totals, commission, minimum-order gate
//! - [`lifecycle`] - Order status state machine and history
//! - [`hours`] - Weekly open-hours evaluation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in agorot (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use tavshil_core::money::Money;
//! use tavshil_core::COMMISSION_RATE_BPS;
//!
//! // Products total of ₪37.00, platform commission at 5%
//! let total = Money::from_agorot(3700);
//! let commission = total.percentage(COMMISSION_RATE_BPS);
//!
//! // round(37 × 0.05, 2) = ₪1.85
//! assert_eq!(commission.agorot(), 185);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod hours;
pub mod lifecycle;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tavshil_core::Money` instead of
// `use tavshil_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use hours::{DayHours, WeeklySchedule};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat delivery fee charged on every order: ₪25.00.
///
/// ## Why a constant?
/// Delivery is priced as a single flat fee across the marketplace; it is
/// added to the customer-facing total and never enters commission math.
/// The services layer can override it from configuration.
pub const SHIPPING_COST: Money = Money::from_agorot(2500);

/// Platform commission rate in basis points: 500 = 5%.
///
/// The commission is computed once at order creation and stored on the
/// order. Historical orders keep their original commission if this rate
/// ever changes.
pub const COMMISSION_RATE_BPS: u32 = 500;

/// Default preparation time in minutes when a cook has not set one.
pub const DEFAULT_PREP_TIME_MINUTES: i64 = 30;

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 99;

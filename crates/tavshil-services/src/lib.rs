//! # tavshil-services: Orchestration Layer for Tavshil
//!
//! The services any view layer (web client, admin console) talks to.
//! Each service composes pure logic from `tavshil-core` with repository
//! calls from `tavshil-db`, and owns the invariants that span entities.
//!
//! ## Who Writes What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Single-Writer Responsibilities                       │
//! │                                                                         │
//! │  CartService      → the ONLY writer of cart status transitions         │
//! │                     (open/abandon/convert sweep lives here)            │
//! │  CheckoutService  → order creation, one transaction per cart           │
//! │  OrderService     → status transitions (CAS) + payment toggles         │
//! │  MenuService      → dish saves incl. daily-special handover            │
//! │  CookService      → settings saves (derives is_open), moderation       │
//! │  ReportService    → admin aggregates (read-only)                       │
//! │  SupportService   → ticket workflow                                    │
//! │                                                                         │
//! │  refresh::spawn_refresh → scheduled polling with explicit shutdown,    │
//! │                           replacing ambient timers                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod refresh;
pub mod services;

pub use config::AppConfig;
pub use error::{ErrorCode, ServiceError};
pub use services::cart::{CartService, CartSummary, CookCartSummary};
pub use services::checkout::{CheckoutRequest, CheckoutService};
pub use services::cooks::{CookService, CookSettings};
pub use services::menu::{DishForm, MenuService};
pub use services::orders::OrderService;
pub use services::reports::{OrderReport, ReportService};
pub use services::support::SupportService;

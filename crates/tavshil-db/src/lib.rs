//! # tavshil-db: Entity Store for Tavshil
//!
//! This crate provides database access for the Tavshil marketplace.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tavshil Data Flow                                │
//! │                                                                         │
//! │  Service call (checkout, transition, save settings)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tavshil-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (per entity) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CookRepo      │    │ 001_init.sql │  │   │
//! │  │   │ WAL mode      │    │ DishRepo      │    │              │  │   │
//! │  │   │ FK enabled    │    │ CartRepo      │    │              │  │   │
//! │  │   │               │    │ OrderRepo ... │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                   SQLite database file (or :memory: in tests)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations per collection
//!
//! ## Nested Documents
//!
//! Cart lines, order snapshots, status history, weekly schedules and
//! customization options are stored as JSON text columns and decoded with
//! serde at the repository boundary, mirroring how the original hosted
//! entity store held them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tavshil_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/tavshil.db")).await?;
//! let cooks = db.cooks().list_approved(20).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::cook::CookRepository;
pub use repository::dish::DishRepository;
pub use repository::order::OrderRepository;
pub use repository::support::SupportTicketRepository;
pub use repository::user::UserRepository;

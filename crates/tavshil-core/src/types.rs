//! # Domain Types
//!
//! Core domain types used throughout Tavshil.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Cook        │   │     Dish        │   │     Cart        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  approval       │   │  price_agorot   │   │  customer_email │       │
//! │  │  open_hours     │   │  daily special  │   │  cook_id        │       │
//! │  │  min_order      │   │  customizations │   │  items[]        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │  OrderStatus    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  order_number   │   │  Received       │   │  Bit            │       │
//! │  │  items snapshot │   │  Preparing      │   │  Credit         │       │
//! │  │  totals, ledger │   │  Ready          │   │  ApplePay       │       │
//! │  │  status_history │   │  Delivered      │   │  Cash           │       │
//! │  └─────────────────┘   │  Canceled       │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (order_number, customer email)
//!
//! ## Snapshot Pattern
//! Orders copy cart items verbatim at checkout. Dish edits after the fact
//! never change what an existing order shows or costs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::hours::WeeklySchedule;
use crate::money::Money;
use crate::DEFAULT_PREP_TIME_MINUTES;

// =============================================================================
// Users
// =============================================================================

/// The role a user account plays on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Default role: browses, orders, tracks.
    Customer,
    /// Approved seller with a storefront.
    Cook,
    /// Platform moderator.
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Customer
    }
}

/// A platform user account.
///
/// Authentication itself is an external collaborator; this is the profile
/// record the marketplace keeps alongside it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    /// Login identity; unique across the platform.
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    /// Admins can deactivate accounts (soft ban).
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Cooks
// =============================================================================

/// Moderation state of a seller application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Application submitted, awaiting admin review.
    Pending,
    /// Approved: storefront is live.
    Approved,
    /// Rejected with a recorded reason.
    Rejected,
}

impl Default for ApprovalStatus {
    fn default() -> Self {
        ApprovalStatus::Pending
    }
}

/// A seller (home cook) with a catalog, hours and moderation state.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cook {
    pub id: String,

    /// Email of the user account behind this storefront.
    pub user_email: String,

    /// Public storefront name.
    pub display_name: String,

    pub bio: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,

    pub approval_status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    #[ts(as = "Option<String>")]
    pub approval_date: Option<DateTime<Utc>>,

    /// Storefront enabled at all (admins may deactivate).
    pub is_active: bool,

    /// Currently taking orders. Derived from `open_hours` on every settings
    /// save, or toggled manually; NOT re-evaluated by any scheduler, so
    /// staleness between saves is accepted.
    pub is_open: bool,

    /// Minimum products total required at checkout, in agorot.
    /// Zero means no minimum.
    pub min_order_agorot: i64,

    /// Typical preparation time, in minutes. Drives the "ready in ~N
    /// minutes" estimate shown to customers.
    pub estimated_prep_minutes: i64,

    /// Lifetime count of orders placed with this cook.
    pub total_orders: i64,

    /// Cuisine/diet tags shown on the storefront card.
    pub tags: Vec<String>,

    pub open_hours: WeeklySchedule,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Cook {
    /// Minimum order as Money, `None` when the cook has not set one.
    #[inline]
    pub fn min_order(&self) -> Option<Money> {
        if self.min_order_agorot > 0 {
            Some(Money::from_agorot(self.min_order_agorot))
        } else {
            None
        }
    }

    /// Preparation time with the platform default applied.
    #[inline]
    pub fn prep_minutes(&self) -> i64 {
        if self.estimated_prep_minutes > 0 {
            self.estimated_prep_minutes
        } else {
            DEFAULT_PREP_TIME_MINUTES
        }
    }

    /// Whether the storefront can take orders right now.
    #[inline]
    pub fn is_accepting_orders(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved && self.is_active && self.is_open
    }
}

// =============================================================================
// Dishes
// =============================================================================

/// Menu section a dish belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DishCategory {
    Main,
    Appetizer,
    Side,
    Dessert,
    Drink,
    Other,
}

impl Default for DishCategory {
    fn default() -> Self {
        DishCategory::Main
    }
}

/// An optional paid topping a dish offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Topping {
    pub name: String,
    /// Per-unit surcharge in agorot.
    pub price_agorot: i64,
}

impl Topping {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_agorot(self.price_agorot)
    }
}

/// Customization surface a dish exposes, validated at the boundary:
/// a set of ingredients the customer may remove, and priced extras.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomizationOptions {
    #[serde(default)]
    pub removable_items: Vec<String>,
    #[serde(default)]
    pub extra_toppings: Vec<Topping>,
}

impl CustomizationOptions {
    /// True when the dish offers no customization at all.
    pub fn is_empty(&self) -> bool {
        self.removable_items.is_empty() && self.extra_toppings.is_empty()
    }

    /// Looks up a topping by name.
    pub fn topping(&self, name: &str) -> Option<&Topping> {
        self.extra_toppings.iter().find(|t| t.name == name)
    }
}

/// A catalog item belonging to a cook.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dish {
    pub id: String,
    pub cook_id: String,
    pub title: String,
    pub description: Option<String>,

    /// Base price in agorot, before any customization extras.
    pub price_agorot: i64,

    pub category: DishCategory,
    pub photo_url: Option<String>,
    pub tags: Vec<String>,
    pub allergens: Vec<String>,

    /// Cook can pause a dish without deleting it.
    pub is_available: bool,

    /// At most one dish per cook carries this flag; saving a new special
    /// clears the previous holder in the same operation.
    pub is_daily_special: bool,
    pub daily_special_note: Option<String>,

    #[serde(default)]
    pub customization_options: CustomizationOptions,

    /// Manual ordering within the menu.
    pub sort_order: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Dish {
    /// Returns the base price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_agorot(self.price_agorot)
    }
}

// =============================================================================
// Carts
// =============================================================================

/// Lifecycle of a cart document.
///
/// Exactly one cart per (customer, cook) pair is `Active` at a time; the
/// cart service abandons the others whenever a different storefront is
/// opened. `Converted` carts were turned into orders at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    Active,
    Abandoned,
    Converted,
}

/// A chosen extra on a cart line: the menu topping plus a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExtraTopping {
    pub name: String,
    pub count: i64,
    /// Per-unit surcharge, frozen from the menu at add time.
    pub price_agorot: i64,
}

/// Customizations applied to one cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemCustomizations {
    /// Ingredient names the customer asked to leave out.
    #[serde(default)]
    pub removed: Vec<String>,
    /// Paid extras with counts.
    #[serde(default)]
    pub extra: Vec<ExtraTopping>,
}

impl ItemCustomizations {
    /// Total per-unit surcharge of all chosen extras.
    pub fn extras_total(&self) -> Money {
        self.extra
            .iter()
            .map(|e| Money::from_agorot(e.price_agorot).multiply_quantity(e.count))
            .sum()
    }

    /// True when nothing was removed and no extras chosen.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.extra.is_empty()
    }
}

/// One line in a cart.
///
/// ## Price Freezing
/// `price_agorot` is the per-unit price at add time and already includes
/// customization extras; `base_price_agorot` keeps the pre-extras dish
/// price for display. Dish price changes never affect existing lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    pub dish_id: String,

    /// Dish title at add time (frozen).
    pub title: String,

    /// Per-unit price in agorot at add time, extras included (frozen).
    pub price_agorot: i64,

    /// Pre-extras dish price; set only on customized lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price_agorot: Option<i64>,

    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customizations: Option<ItemCustomizations>,
}

impl CartItem {
    /// Per-unit price (extras included) as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_agorot(self.price_agorot)
    }

    /// Pre-extras dish price; falls back to the unit price on plain lines.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_agorot(self.base_price_agorot.unwrap_or(self.price_agorot))
    }
}

/// An in-progress, uncommitted selection of dishes for one cook.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub id: String,
    pub customer_email: String,
    pub cook_id: String,
    pub items: Vec<CartItem>,
    pub status: CartStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Checks if the cart has no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Orders
// =============================================================================

/// The status of an order.
///
/// Forward-only chain `Received → Preparing → Ready → Delivered`, with
/// `Canceled` as an alternate terminal reachable from any non-terminal
/// state. Transition rules live in [`crate::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, cook not yet started.
    Received,
    /// Cook is preparing the food.
    Preparing,
    /// Out for delivery.
    Ready,
    /// Handed to the customer (terminal).
    Delivered,
    /// Canceled by the cook (terminal).
    Canceled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Received
    }
}

/// How the customer pays the cook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bit instant transfer.
    Bit,
    /// Credit card, settled with the cook.
    Credit,
    ApplePay,
    Cash,
}

/// Whether the cook has marked the order as paid.
///
/// Toggles freely at any time; fully independent of [`OrderStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

/// Delivery address captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub apartment: String,
}

/// One append-only audit entry per applied status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusHistoryEntry {
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub note: String,
}

/// A committed, priced, status-tracked purchase derived from a cart.
///
/// Created once at checkout; mutated only by status/payment updates;
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,

    /// Client-generated business id: `ORD-<base36 millis>-<base36 suffix>`.
    /// Store-side UNIQUE constraint backs up the probabilistic format.
    pub order_number: String,

    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: String,

    pub cook_id: String,
    /// Cook display name at checkout (frozen).
    pub cook_name: String,

    /// Snapshot copy of the cart lines at checkout.
    pub items: Vec<CartItem>,

    /// Sum of line totals, in agorot.
    pub products_total_agorot: i64,
    /// Flat delivery fee, in agorot.
    pub shipping_cost_agorot: i64,
    /// Platform ledger cut, pinned at creation; never recomputed.
    pub commission_agorot: i64,
    /// Customer-facing total: products + shipping. Commission not included.
    pub total_agorot: i64,

    pub shipping_address: ShippingAddress,

    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,

    pub customer_note: Option<String>,
    pub pickup_note: Option<String>,

    /// Append-only; never truncated or reordered.
    pub status_history: Vec<StatusHistoryEntry>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn products_total(&self) -> Money {
        Money::from_agorot(self.products_total_agorot)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_agorot(self.total_agorot)
    }

    #[inline]
    pub fn commission(&self) -> Money {
        Money::from_agorot(self.commission_agorot)
    }

    /// What the seller keeps: total minus the platform commission.
    #[inline]
    pub fn seller_net(&self) -> Money {
        self.total() - self.commission()
    }

    /// Timestamp the order entered `Received`; creation time if the
    /// history entry is missing (it never should be).
    pub fn received_at(&self) -> DateTime<Utc> {
        self.status_history
            .iter()
            .find(|h| h.status == OrderStatus::Received)
            .map(|h| h.timestamp)
            .unwrap_or(self.created_at)
    }
}

// =============================================================================
// Support Tickets
// =============================================================================

/// Workflow state of a support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

/// A customer support request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupportTicket {
    pub id: String,
    pub customer_email: String,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub admin_reply: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

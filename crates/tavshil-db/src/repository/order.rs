//! # Order Repository
//!
//! Database operations for orders.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    insert_checkout(order, cart_id)                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    1. INSERT order (snapshot items, pinned totals, initial history)    │
//! │    2. UPDATE cart  → status 'converted'                                │
//! │    3. UPDATE cook  → total_orders = total_orders + 1                   │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  All three legs land or none do: an order can no longer exist with     │
//! │  its cart still active or the cook's counter unmoved.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Transition CAS
//! `apply_transition` updates with `WHERE id = ? AND status = ?`. When a
//! concurrent writer moved the order first, zero rows match and the loser
//! gets `DbError::Conflict` instead of silently clobbering the history.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{decode_json, encode_json};
use tavshil_core::{
    CartItem, Order, OrderStatus, PaymentMethod, PaymentStatus, ShippingAddress,
    StatusHistoryEntry,
};

/// Row shape for the `orders` table; JSON columns still encoded.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    customer_email: String,
    customer_name: String,
    customer_phone: String,
    cook_id: String,
    cook_name: String,
    items: String,
    products_total_agorot: i64,
    shipping_cost_agorot: i64,
    commission_agorot: i64,
    total_agorot: i64,
    shipping_address: String,
    status: OrderStatus,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    customer_note: Option<String>,
    pickup_note: Option<String>,
    status_history: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> DbResult<Order> {
        let items: Vec<CartItem> = decode_json("Order", &self.id, &self.items)?;
        let shipping_address: ShippingAddress =
            decode_json("Order", &self.id, &self.shipping_address)?;
        let status_history: Vec<StatusHistoryEntry> =
            decode_json("Order", &self.id, &self.status_history)?;
        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            customer_email: self.customer_email,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            cook_id: self.cook_id,
            cook_name: self.cook_name,
            items,
            products_total_agorot: self.products_total_agorot,
            shipping_cost_agorot: self.shipping_cost_agorot,
            commission_agorot: self.commission_agorot,
            total_agorot: self.total_agorot,
            shipping_address,
            status: self.status,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            customer_note: self.customer_note,
            pickup_note: self.pickup_note,
            status_history,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_ORDER: &str = r#"
    SELECT id, order_number, customer_email, customer_name, customer_phone,
           cook_id, cook_name, items, products_total_agorot,
           shipping_cost_agorot, commission_agorot, total_agorot,
           shipping_address, status, payment_method, payment_status,
           customer_note, pickup_note, status_history, created_at, updated_at
    FROM orders
"#;

/// Aggregates over the orders table for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub order_count: i64,
    pub revenue_agorot: i64,
    pub commission_agorot: i64,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates an order as one transaction with its checkout side effects:
    /// the source cart flips to `converted` and the cook's lifetime order
    /// counter increments.
    pub async fn insert_checkout(&self, order: &Order, cart_id: &str) -> DbResult<()> {
        debug!(
            id = %order.id,
            order_number = %order.order_number,
            cart_id = %cart_id,
            total = %order.total_agorot,
            "Inserting order"
        );

        let items = encode_json("Order", &order.id, &order.items)?;
        let shipping_address = encode_json("Order", &order.id, &order.shipping_address)?;
        let status_history = encode_json("Order", &order.id, &order.status_history)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, customer_email, customer_name, customer_phone,
                cook_id, cook_name, items, products_total_agorot,
                shipping_cost_agorot, commission_agorot, total_agorot,
                shipping_address, status, payment_method, payment_status,
                customer_note, pickup_note, status_history, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                      ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(&order.customer_email)
        .bind(&order.customer_name)
        .bind(&order.customer_phone)
        .bind(&order.cook_id)
        .bind(&order.cook_name)
        .bind(items)
        .bind(order.products_total_agorot)
        .bind(order.shipping_cost_agorot)
        .bind(order.commission_agorot)
        .bind(order.total_agorot)
        .bind(shipping_address)
        .bind(order.status)
        .bind(order.payment_method)
        .bind(order.payment_status)
        .bind(&order.customer_note)
        .bind(&order.pickup_note)
        .bind(status_history)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        let cart_update = sqlx::query(
            "UPDATE carts SET status = 'converted', updated_at = ?2 WHERE id = ?1 AND status = 'active'",
        )
        .bind(cart_id)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        if cart_update.rows_affected() == 0 {
            return Err(DbError::not_found("Cart (active)", cart_id));
        }

        let cook_update = sqlx::query(
            "UPDATE cooks SET total_orders = total_orders + 1, updated_at = ?2 WHERE id = ?1",
        )
        .bind(&order.cook_id)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        if cook_update.rows_affected() == 0 {
            return Err(DbError::not_found("Cook", &order.cook_id));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{SELECT_ORDER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// A customer's orders, newest first.
    pub async fn list_for_customer(&self, customer_email: &str) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_ORDER} WHERE customer_email = ?1 ORDER BY created_at DESC"
        ))
        .bind(customer_email)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// A cook's incoming orders, newest first.
    pub async fn list_for_cook(&self, cook_id: &str) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_ORDER} WHERE cook_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(cook_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Recent orders across the platform (admin view).
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{SELECT_ORDER} ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Applies an already-validated status transition with a
    /// compare-and-swap guard on the current status.
    ///
    /// `history` must be the complete new history (old entries plus the
    /// one being appended); it is persisted verbatim.
    pub async fn apply_transition(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        history: &[StatusHistoryEntry],
        at: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(order_id = %order_id, ?from, ?to, "Applying status transition");

        let encoded = encode_json("Order", order_id, &history)?;

        let result = sqlx::query(
            r#"
            UPDATE orders SET status = ?3, status_history = ?4, updated_at = ?5
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(order_id)
        .bind(from)
        .bind(to)
        .bind(encoded)
        .bind(at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::conflict("Order", order_id));
        }

        Ok(())
    }

    /// Toggles the paid flag; no guard, payment status moves freely.
    pub async fn set_payment_status(&self, id: &str, status: PaymentStatus) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE orders SET payment_status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Platform-wide aggregates for the admin dashboard.
    pub async fn totals(&self) -> DbResult<OrderTotals> {
        let row: (i64, Option<i64>, Option<i64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   SUM(total_agorot),
                   SUM(commission_agorot)
            FROM orders
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(OrderTotals {
            order_count: row.0,
            revenue_agorot: row.1.unwrap_or(0),
            commission_agorot: row.2.unwrap_or(0),
        })
    }
}

/// Generates an order number in the format `ORD-<base36 millis>-<suffix>`.
///
/// The suffix is four base36 digits drawn from a fresh UUID, so uniqueness
/// is probabilistic on the client side; the UNIQUE constraint on
/// `orders.order_number` is the actual backstop.
pub fn generate_order_number(at: DateTime<Utc>) -> String {
    let millis = at.timestamp_millis().max(0) as u128;
    let suffix = Uuid::new_v4().as_u128() % (36u128.pow(4));
    format!(
        "ORD-{}-{:0>4}",
        to_base36(millis),
        to_base36(suffix)
    )
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tavshil_core::lifecycle::initial_history;
    use tavshil_core::{ApprovalStatus, Cart, CartStatus, Cook, WeeklySchedule};

    async fn test_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();
        db.cooks()
            .insert(&Cook {
                id: "cook-1".to_string(),
                user_email: "rachel@example.com".to_string(),
                display_name: "Savta Rachel".to_string(),
                bio: None,
                phone: None,
                address: None,
                city: None,
                profile_image: None,
                cover_image: None,
                approval_status: ApprovalStatus::Approved,
                rejection_reason: None,
                approval_date: None,
                is_active: true,
                is_open: true,
                min_order_agorot: 0,
                estimated_prep_minutes: 30,
                total_orders: 0,
                tags: vec![],
                open_hours: WeeklySchedule::default(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db.carts()
            .insert(&Cart {
                id: "cart-1".to_string(),
                customer_email: "dana@example.com".to_string(),
                cook_id: "cook-1".to_string(),
                items: vec![],
                status: CartStatus::Active,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db
    }

    fn order(id: &str, order_number: &str) -> Order {
        let now = Utc::now();
        Order {
            id: id.to_string(),
            order_number: order_number.to_string(),
            customer_email: "dana@example.com".to_string(),
            customer_name: "Dana".to_string(),
            customer_phone: "050-0000000".to_string(),
            cook_id: "cook-1".to_string(),
            cook_name: "Savta Rachel".to_string(),
            items: vec![CartItem {
                dish_id: "d-1".to_string(),
                title: "Shakshuka".to_string(),
                price_agorot: 4500,
                base_price_agorot: None,
                quantity: 2,
                photo_url: None,
                customizations: None,
            }],
            products_total_agorot: 9000,
            shipping_cost_agorot: 2500,
            commission_agorot: 450,
            total_agorot: 11500,
            shipping_address: ShippingAddress {
                street: "Herzl 10".to_string(),
                city: "Haifa".to_string(),
                floor: "2".to_string(),
                apartment: "5".to_string(),
            },
            status: OrderStatus::Received,
            payment_method: PaymentMethod::Bit,
            payment_status: PaymentStatus::Unpaid,
            customer_note: None,
            pickup_note: None,
            status_history: initial_history(now, "Order received"),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_checkout_transaction_applies_all_legs() {
        let db = test_db().await;

        db.orders()
            .insert_checkout(&order("o-1", "ORD-A-0001"), "cart-1")
            .await
            .unwrap();

        let loaded = db.orders().get_by_id("o-1").await.unwrap().unwrap();
        assert_eq!(loaded.order_number, "ORD-A-0001");
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.status_history.len(), 1);
        assert_eq!(loaded.shipping_address.city, "Haifa");

        let cart = db.carts().get_by_id("cart-1").await.unwrap().unwrap();
        assert_eq!(cart.status, CartStatus::Converted);

        let cook = db.cooks().get_by_id("cook-1").await.unwrap().unwrap();
        assert_eq!(cook.total_orders, 1);
    }

    #[tokio::test]
    async fn test_checkout_rolls_back_when_cart_missing() {
        let db = test_db().await;

        let err = db
            .orders()
            .insert_checkout(&order("o-1", "ORD-A-0001"), "no-such-cart")
            .await;
        assert!(err.is_err());

        // order insert rolled back with the failed cart leg
        assert!(db.orders().get_by_id("o-1").await.unwrap().is_none());
        let cook = db.cooks().get_by_id("cook-1").await.unwrap().unwrap();
        assert_eq!(cook.total_orders, 0);
    }

    #[tokio::test]
    async fn test_duplicate_order_number_is_rejected() {
        let db = test_db().await;
        db.orders()
            .insert_checkout(&order("o-1", "ORD-A-0001"), "cart-1")
            .await
            .unwrap();

        let now = Utc::now();
        db.carts()
            .insert(&Cart {
                id: "cart-2".to_string(),
                customer_email: "dana@example.com".to_string(),
                cook_id: "cook-1".to_string(),
                items: vec![],
                status: CartStatus::Active,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let err = db
            .orders()
            .insert_checkout(&order("o-2", "ORD-A-0001"), "cart-2")
            .await;
        assert!(matches!(err, Err(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_transition_cas_guards_stale_writers() {
        let db = test_db().await;
        db.orders()
            .insert_checkout(&order("o-1", "ORD-A-0001"), "cart-1")
            .await
            .unwrap();

        let loaded = db.orders().get_by_id("o-1").await.unwrap().unwrap();
        let mut history = loaded.status_history.clone();
        history.push(StatusHistoryEntry {
            status: OrderStatus::Preparing,
            timestamp: Utc::now(),
            note: String::new(),
        });

        db.orders()
            .apply_transition(
                "o-1",
                OrderStatus::Received,
                OrderStatus::Preparing,
                &history,
                Utc::now(),
            )
            .await
            .unwrap();

        // second writer still believes the order is Received
        let stale = db
            .orders()
            .apply_transition(
                "o-1",
                OrderStatus::Received,
                OrderStatus::Canceled,
                &history,
                Utc::now(),
            )
            .await;
        assert!(matches!(stale, Err(DbError::Conflict { .. })));

        let current = db.orders().get_by_id("o-1").await.unwrap().unwrap();
        assert_eq!(current.status, OrderStatus::Preparing);
        assert_eq!(current.status_history.len(), 2);
    }

    #[tokio::test]
    async fn test_payment_toggle() {
        let db = test_db().await;
        db.orders()
            .insert_checkout(&order("o-1", "ORD-A-0001"), "cart-1")
            .await
            .unwrap();

        db.orders()
            .set_payment_status("o-1", PaymentStatus::Paid)
            .await
            .unwrap();

        let loaded = db.orders().get_by_id("o-1").await.unwrap().unwrap();
        assert_eq!(loaded.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_totals() {
        let db = test_db().await;
        db.orders()
            .insert_checkout(&order("o-1", "ORD-A-0001"), "cart-1")
            .await
            .unwrap();

        let totals = db.orders().totals().await.unwrap();
        assert_eq!(totals.order_count, 1);
        assert_eq!(totals.revenue_agorot, 11500);
        assert_eq!(totals.commission_agorot, 450);
    }

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number(Utc::now());
        assert!(number.starts_with("ORD-"));

        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 4);
        assert!(parts[1]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
    }
}

//! # Cart Repository
//!
//! Database operations for carts.
//!
//! ## One Active Cart Per (Customer, Cook)
//! The cart *service* is the only writer of cart status transitions; this
//! repository provides the primitives it composes: pair lookup, the bulk
//! `abandon_other_active` sweep, item writes and status changes.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{decode_json, encode_json};
use tavshil_core::{Cart, CartItem, CartStatus};

/// Row shape for the `carts` table; items still JSON-encoded.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: String,
    customer_email: String,
    cook_id: String,
    items: String,
    status: CartStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartRow {
    fn into_cart(self) -> DbResult<Cart> {
        let items: Vec<CartItem> = decode_json("Cart", &self.id, &self.items)?;
        Ok(Cart {
            id: self.id,
            customer_email: self.customer_email,
            cook_id: self.cook_id,
            items,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_CART: &str = r#"
    SELECT id, customer_email, cook_id, items, status, created_at, updated_at
    FROM carts
"#;

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Inserts a new cart.
    pub async fn insert(&self, cart: &Cart) -> DbResult<()> {
        debug!(id = %cart.id, customer = %cart.customer_email, cook = %cart.cook_id, "Inserting cart");

        let items = encode_json("Cart", &cart.id, &cart.items)?;

        sqlx::query(
            r#"
            INSERT INTO carts (id, customer_email, cook_id, items, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&cart.id)
        .bind(&cart.customer_email)
        .bind(&cart.cook_id)
        .bind(items)
        .bind(cart.status)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a cart by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Cart>> {
        let row: Option<CartRow> = sqlx::query_as(&format!("{SELECT_CART} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(CartRow::into_cart).transpose()
    }

    /// The customer's active cart at one cook, if any.
    pub async fn active_for_pair(
        &self,
        customer_email: &str,
        cook_id: &str,
    ) -> DbResult<Option<Cart>> {
        let row: Option<CartRow> = sqlx::query_as(&format!(
            "{SELECT_CART} WHERE customer_email = ?1 AND cook_id = ?2 AND status = 'active'"
        ))
        .bind(customer_email)
        .bind(cook_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CartRow::into_cart).transpose()
    }

    /// All of the customer's active carts, oldest first.
    pub async fn active_for_customer(&self, customer_email: &str) -> DbResult<Vec<Cart>> {
        let rows: Vec<CartRow> = sqlx::query_as(&format!(
            "{SELECT_CART} WHERE customer_email = ?1 AND status = 'active' ORDER BY created_at"
        ))
        .bind(customer_email)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CartRow::into_cart).collect()
    }

    /// Abandons every active cart the customer holds at *other* cooks.
    /// Returns how many carts were swept.
    pub async fn abandon_other_active(
        &self,
        customer_email: &str,
        keep_cook_id: &str,
    ) -> DbResult<u64> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE carts SET status = 'abandoned', updated_at = ?3
            WHERE customer_email = ?1 AND status = 'active' AND cook_id != ?2
            "#,
        )
        .bind(customer_email)
        .bind(keep_cook_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let swept = result.rows_affected();
        if swept > 0 {
            debug!(customer = %customer_email, swept, "Abandoned other active carts");
        }
        Ok(swept)
    }

    /// Replaces a cart's lines.
    pub async fn update_items(&self, id: &str, items: &[CartItem]) -> DbResult<()> {
        let encoded = encode_json("Cart", id, &items)?;
        let now = Utc::now();

        let result = sqlx::query("UPDATE carts SET items = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(encoded)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart", id));
        }

        Ok(())
    }

    /// Moves a cart to a new status.
    pub async fn set_status(&self, id: &str, status: CartStatus) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query("UPDATE carts SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

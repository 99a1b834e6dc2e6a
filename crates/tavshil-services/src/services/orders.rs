//! # Order Service
//!
//! Status transitions, payment toggles and tracking reads.
//!
//! ## Transition Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      transition(order, next)                            │
//! │                                                                         │
//! │  1. Load the order                                                     │
//! │  2. lifecycle::apply_transition on the in-memory copy                  │
//! │       └── terminal / backward attempts rejected, nothing written       │
//! │  3. CAS write: UPDATE ... WHERE status = <status we loaded>            │
//! │       └── a concurrent transition makes this a Conflict, not a         │
//! │           silent overwrite of the history                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use tavshil_core::{lifecycle, Order, OrderStatus, PaymentStatus};
use tavshil_db::Database;

/// Order workflow service.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    /// Creates a new OrderService.
    pub fn new(db: Database) -> Self {
        OrderService { db }
    }

    /// Gets one order for tracking.
    pub async fn get(&self, order_id: &str) -> ServiceResult<Order> {
        self.db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))
    }

    /// A customer's orders, newest first.
    pub async fn for_customer(&self, customer_email: &str) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_for_customer(customer_email).await?)
    }

    /// A cook's orders, newest first.
    pub async fn for_cook(&self, cook_id: &str) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_for_cook(cook_id).await?)
    }

    /// Moves an order to `next`, appending one history entry.
    ///
    /// Rejections (terminal order, disallowed move) leave the stored order
    /// untouched. A lost race against another writer surfaces as a
    /// `Conflict`; the caller reloads and retries.
    pub async fn transition(
        &self,
        order_id: &str,
        next: OrderStatus,
        note: impl Into<String>,
    ) -> ServiceResult<Order> {
        let mut order = self.get(order_id).await?;
        let from = order.status;
        let now = Utc::now();

        lifecycle::apply_transition(&mut order, next, now, note)?;

        self.db
            .orders()
            .apply_transition(order_id, from, next, &order.status_history, now)
            .await?;

        info!(order_number = %order.order_number, ?from, ?next, "Order status updated");
        Ok(order)
    }

    /// Moves an order one step along the main chain
    /// (`Received → Preparing → Ready → Delivered`).
    pub async fn advance(&self, order_id: &str) -> ServiceResult<Order> {
        let order = self.get(order_id).await?;
        let Some(next) = order.status.next() else {
            // transition() produces the proper terminal error
            return self.transition(order_id, order.status, "").await;
        };
        self.transition(order_id, next, "").await
    }

    /// Cancels an order from any non-terminal state.
    pub async fn cancel(&self, order_id: &str, note: impl Into<String>) -> ServiceResult<Order> {
        self.transition(order_id, OrderStatus::Canceled, note).await
    }

    /// Toggles the paid flag. No restrictions: payment status is
    /// independent of the order's lifecycle.
    pub async fn set_payment_status(
        &self,
        order_id: &str,
        status: PaymentStatus,
    ) -> ServiceResult<()> {
        self.db.orders().set_payment_status(order_id, status).await?;
        Ok(())
    }

    /// Minutes until the order's estimated ready time ("ready in ~N"),
    /// based on the cook's prep time added to the `Received` timestamp.
    /// `None` once the order is `Ready`, `Delivered` or `Canceled`.
    pub async fn eta_minutes(&self, order_id: &str) -> ServiceResult<Option<i64>> {
        let order = self.get(order_id).await?;
        let cook = self
            .db
            .cooks()
            .get_by_id(&order.cook_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cook", &order.cook_id))?;

        Ok(lifecycle::minutes_until_ready(
            &order,
            cook.prep_minutes(),
            Utc::now(),
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PricingConfig;
    use crate::error::ErrorCode;
    use crate::services::cart::CartService;
    use crate::services::checkout::{CheckoutRequest, CheckoutService};
    use crate::services::test_support::{approved_cook, dish, test_db};
    use tavshil_core::{PaymentMethod, ShippingAddress};

    async fn setup_with_order() -> (Database, OrderService, String) {
        let db = test_db().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        db.dishes().save(&dish("d-1", "cook-1", 4000)).await.unwrap();

        let carts = CartService::new(db.clone(), PricingConfig::default());
        carts
            .add_item("dana@example.com", "d-1", 1, None)
            .await
            .unwrap();

        let checkout = CheckoutService::new(db.clone(), PricingConfig::default());
        let orders = checkout
            .submit(&CheckoutRequest {
                customer_email: "dana@example.com".to_string(),
                customer_name: "Dana Levi".to_string(),
                customer_phone: "050-0000000".to_string(),
                payment_method: PaymentMethod::Cash,
                shipping_address: ShippingAddress {
                    street: "Herzl 10".to_string(),
                    city: "Haifa".to_string(),
                    floor: String::new(),
                    apartment: String::new(),
                },
                customer_note: None,
                pickup_note: None,
            })
            .await
            .unwrap();

        let order_id = orders[0].id.clone();
        (db.clone(), OrderService::new(db), order_id)
    }

    #[tokio::test]
    async fn test_advance_walks_the_chain() {
        let (_db, orders, order_id) = setup_with_order().await;

        let order = orders.advance(&order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);

        let order = orders.advance(&order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Ready);

        let order = orders.advance(&order_id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.status_history.len(), 4);

        // terminal: advancing again is rejected and appends nothing
        let err = orders.advance(&order_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let stored = orders.get(&order_id).await.unwrap();
        assert_eq!(stored.status_history.len(), 4);
    }

    #[tokio::test]
    async fn test_received_skips_straight_to_ready() {
        let (_db, orders, order_id) = setup_with_order().await;

        let order = orders
            .transition(&order_id, OrderStatus::Ready, "")
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
    }

    #[tokio::test]
    async fn test_cancel_then_everything_rejected() {
        let (_db, orders, order_id) = setup_with_order().await;

        orders.cancel(&order_id, "customer asked").await.unwrap();

        let err = orders.advance(&order_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let stored = orders.get(&order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Canceled);
        assert_eq!(stored.status_history.len(), 2);
        assert_eq!(stored.status_history[1].note, "customer asked");
    }

    #[tokio::test]
    async fn test_payment_toggles_regardless_of_status() {
        let (_db, orders, order_id) = setup_with_order().await;

        orders.cancel(&order_id, "").await.unwrap();

        // canceled order: payment still toggles freely
        orders
            .set_payment_status(&order_id, PaymentStatus::Paid)
            .await
            .unwrap();
        assert_eq!(
            orders.get(&order_id).await.unwrap().payment_status,
            PaymentStatus::Paid
        );

        orders
            .set_payment_status(&order_id, PaymentStatus::Unpaid)
            .await
            .unwrap();
        assert_eq!(
            orders.get(&order_id).await.unwrap().payment_status,
            PaymentStatus::Unpaid
        );
    }

    #[tokio::test]
    async fn test_eta_present_then_gone() {
        let (_db, orders, order_id) = setup_with_order().await;

        // Received: ~30 minutes of prep ahead
        let eta = orders.eta_minutes(&order_id).await.unwrap();
        assert!(matches!(eta, Some(minutes) if minutes <= 30));

        orders
            .transition(&order_id, OrderStatus::Ready, "")
            .await
            .unwrap();
        assert_eq!(orders.eta_minutes(&order_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_listings() {
        let (_db, orders, order_id) = setup_with_order().await;

        let mine = orders.for_customer("dana@example.com").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, order_id);

        let incoming = orders.for_cook("cook-1").await.unwrap();
        assert_eq!(incoming.len(), 1);
    }
}

//! # Checkout Service
//!
//! Turns the customer's active carts into orders.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          submit(request)                                │
//! │                                                                         │
//! │  1. Validate contact + address fields                                  │
//! │  2. Load every active non-empty cart and its cook                      │
//! │  3. Gate: EVERY cart must meet its cook's minimum (inclusive)          │
//! │  4. Per cart, in order:                                                │
//! │       build order snapshot                                             │
//! │         - items copied verbatim from the cart                          │
//! │         - products_total = Σ line totals                               │
//! │         - commission = round-half-up(products_total × rate)  [pinned]  │
//! │         - total = products_total + shipping                            │
//! │         - status Received, history seeded with one entry               │
//! │       insert_checkout (order + cart→converted + cook counter, 1 txn)   │
//! │  5. Return the created orders                                          │
//! │                                                                         │
//! │  A failure mid-loop stops the loop; orders already created persist.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::config::PricingConfig;
use crate::error::{ServiceError, ServiceResult};
use tavshil_core::{
    lifecycle, pricing, validation, CoreError, Money, Order, OrderStatus, PaymentMethod,
    PaymentStatus, ShippingAddress,
};
use tavshil_db::repository::order::generate_order_number;
use tavshil_db::Database;

/// Everything the checkout form submits.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub customer_email: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub customer_note: Option<String>,
    pub pickup_note: Option<String>,
}

/// Checkout orchestration.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    db: Database,
    pricing: PricingConfig,
}

impl CheckoutService {
    /// Creates a new CheckoutService.
    pub fn new(db: Database, pricing: PricingConfig) -> Self {
        CheckoutService { db, pricing }
    }

    /// Submits the customer's active carts as orders, one per cook.
    ///
    /// Returns the created orders in cart order. Commission is computed
    /// from the configured rate *now* and stored on each order; later rate
    /// changes never touch these rows.
    pub async fn submit(&self, request: &CheckoutRequest) -> ServiceResult<Vec<Order>> {
        self.validate_request(request)?;

        let carts = self
            .db
            .carts()
            .active_for_customer(&request.customer_email)
            .await?;
        let carts: Vec<_> = carts.into_iter().filter(|c| !c.is_empty()).collect();

        if carts.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        // Load cooks and gate every minimum before creating anything
        let mut checkouts = Vec::with_capacity(carts.len());
        for cart in carts {
            let cook = self
                .db
                .cooks()
                .get_by_id(&cart.cook_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Cook", &cart.cook_id))?;

            let products_total = pricing::products_total(&cart.items);
            pricing::check_minimum_order(products_total, &cook)?;

            checkouts.push((cart, cook, products_total));
        }

        let shipping = Money::from_agorot(self.pricing.shipping_cost_agorot);
        let mut orders = Vec::with_capacity(checkouts.len());

        for (cart, cook, products_total) in checkouts {
            let now = Utc::now();
            let commission =
                pricing::commission_amount(products_total, self.pricing.commission_rate_bps);
            let total = pricing::order_total(products_total, shipping);

            let order = Order {
                id: Uuid::new_v4().to_string(),
                order_number: generate_order_number(now),
                customer_email: request.customer_email.clone(),
                customer_name: request.customer_name.clone(),
                customer_phone: request.customer_phone.clone(),
                cook_id: cook.id.clone(),
                cook_name: cook.display_name.clone(),
                items: cart.items.clone(),
                products_total_agorot: products_total.agorot(),
                shipping_cost_agorot: shipping.agorot(),
                commission_agorot: commission.agorot(),
                total_agorot: total.agorot(),
                shipping_address: request.shipping_address.clone(),
                status: OrderStatus::Received,
                payment_method: request.payment_method,
                payment_status: PaymentStatus::Unpaid,
                customer_note: request.customer_note.clone(),
                pickup_note: request.pickup_note.clone(),
                status_history: lifecycle::initial_history(now, "Order received"),
                created_at: now,
                updated_at: now,
            };

            self.db.orders().insert_checkout(&order, &cart.id).await?;

            info!(
                order_number = %order.order_number,
                cook = %order.cook_name,
                total = %order.total(),
                "Order created"
            );
            orders.push(order);
        }

        Ok(orders)
    }

    fn validate_request(&self, request: &CheckoutRequest) -> ServiceResult<()> {
        validation::validate_email(&request.customer_email).map_err(CoreError::from)?;
        validation::validate_title("customer_name", &request.customer_name)
            .map_err(CoreError::from)?;
        validation::validate_title("customer_phone", &request.customer_phone)
            .map_err(CoreError::from)?;
        validation::validate_title("shipping_street", &request.shipping_address.street)
            .map_err(CoreError::from)?;
        validation::validate_title("shipping_city", &request.shipping_address.city)
            .map_err(CoreError::from)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cart::CartService;
    use crate::services::test_support::{approved_cook, dish, test_db};
    use tavshil_core::CartStatus;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            customer_email: "dana@example.com".to_string(),
            customer_name: "Dana Levi".to_string(),
            customer_phone: "050-0000000".to_string(),
            payment_method: PaymentMethod::Bit,
            shipping_address: ShippingAddress {
                street: "Herzl 10".to_string(),
                city: "Haifa".to_string(),
                floor: String::new(),
                apartment: String::new(),
            },
            customer_note: None,
            pickup_note: None,
        }
    }

    async fn setup() -> (Database, CartService, CheckoutService) {
        let db = test_db().await;
        let carts = CartService::new(db.clone(), PricingConfig::default());
        let checkout = CheckoutService::new(db.clone(), PricingConfig::default());
        (db, carts, checkout)
    }

    #[tokio::test]
    async fn test_submit_creates_order_with_pinned_pricing() {
        let (db, carts, checkout) = setup().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        // ₪37 of food → commission ₪1.85
        db.dishes().save(&dish("d-1", "cook-1", 3700)).await.unwrap();
        let cart = carts
            .add_item("dana@example.com", "d-1", 1, None)
            .await
            .unwrap();

        let orders = checkout.submit(&request()).await.unwrap();
        assert_eq!(orders.len(), 1);

        let order = &orders[0];
        assert_eq!(order.products_total_agorot, 3700);
        assert_eq!(order.shipping_cost_agorot, 2500);
        assert_eq!(order.commission_agorot, 185);
        assert_eq!(order.total_agorot, 6200);
        assert_eq!(order.status, OrderStatus::Received);
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
        assert!(order.order_number.starts_with("ORD-"));
        assert_eq!(order.status_history.len(), 1);
        assert_eq!(order.status_history[0].status, OrderStatus::Received);

        // checkout side effects landed
        let cook = db.cooks().get_by_id("cook-1").await.unwrap().unwrap();
        assert_eq!(cook.total_orders, 1);
        let converted = db.carts().get_by_id(&cart.id).await.unwrap().unwrap();
        assert_eq!(converted.status, CartStatus::Converted);
    }

    #[tokio::test]
    async fn test_submit_creates_one_order_per_cook() {
        let (db, carts, checkout) = setup().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        db.cooks().insert(&approved_cook("cook-2", 0)).await.unwrap();
        db.dishes().save(&dish("d-1", "cook-1", 3000)).await.unwrap();
        db.dishes().save(&dish("d-2", "cook-2", 5000)).await.unwrap();

        // add to cook-1, then cook-2 without the sweep killing cook-1's cart:
        // the cart page scenario is both carts active, so re-activate by
        // adding in cook order and skipping the abandon via direct inserts
        carts
            .add_item("dana@example.com", "d-1", 1, None)
            .await
            .unwrap();
        // opening cook-2 abandons cook-1's cart; put cook-1's back to active
        let cook1_cart = db
            .carts()
            .active_for_customer("dana@example.com")
            .await
            .unwrap()[0]
            .id
            .clone();
        carts
            .add_item("dana@example.com", "d-2", 1, None)
            .await
            .unwrap();
        db.carts()
            .set_status(&cook1_cart, CartStatus::Active)
            .await
            .unwrap();

        let orders = checkout.submit(&request()).await.unwrap();
        assert_eq!(orders.len(), 2);

        // each order carries only its own cook's items and totals
        let totals: Vec<i64> = orders.iter().map(|o| o.products_total_agorot).collect();
        assert!(totals.contains(&3000));
        assert!(totals.contains(&5000));
    }

    #[tokio::test]
    async fn test_submit_rejects_below_minimum() {
        let (db, carts, checkout) = setup().await;
        db.cooks()
            .insert(&approved_cook("cook-1", 5000))
            .await
            .unwrap();
        db.dishes().save(&dish("d-1", "cook-1", 4000)).await.unwrap();
        carts
            .add_item("dana@example.com", "d-1", 1, None)
            .await
            .unwrap();

        let err = checkout.submit(&request()).await;
        assert!(err.is_err());

        // nothing was created
        let cook = db.cooks().get_by_id("cook-1").await.unwrap().unwrap();
        assert_eq!(cook.total_orders, 0);
    }

    #[tokio::test]
    async fn test_submit_passes_at_exact_minimum() {
        let (db, carts, checkout) = setup().await;
        db.cooks()
            .insert(&approved_cook("cook-1", 5000))
            .await
            .unwrap();
        db.dishes().save(&dish("d-1", "cook-1", 5000)).await.unwrap();
        carts
            .add_item("dana@example.com", "d-1", 1, None)
            .await
            .unwrap();

        let orders = checkout.submit(&request()).await.unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_cart_set() {
        let (_db, _carts, checkout) = setup().await;
        let err = checkout.submit(&request()).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_submit_rejects_missing_address() {
        let (db, carts, checkout) = setup().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        db.dishes().save(&dish("d-1", "cook-1", 3000)).await.unwrap();
        carts
            .add_item("dana@example.com", "d-1", 1, None)
            .await
            .unwrap();

        let mut bad = request();
        bad.shipping_address.street = String::new();
        assert!(checkout.submit(&bad).await.is_err());
    }
}

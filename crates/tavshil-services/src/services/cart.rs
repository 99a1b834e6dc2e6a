//! # Cart Service
//!
//! The single writer of cart status transitions.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle (one cook each)                       │
//! │                                                                         │
//! │  open_cart(customer, cook)                                             │
//! │       │  abandons every other active cart the customer holds           │
//! │       ▼                                                                 │
//! │  ┌──────────┐  add_item / update_quantity  ┌──────────┐                │
//! │  │  Active  │ ───────────────────────────► │  Active  │                │
//! │  └──────────┘                              └──────────┘                │
//! │       │ clear()                                 │ checkout             │
//! │       ▼                                         ▼                      │
//! │  Abandoned                                 Converted                   │
//! │                                                                         │
//! │  The one-active-cart-per-(customer, cook) invariant is enforced HERE,  │
//! │  not by the store: every path into a cart goes through this service.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::PricingConfig;
use crate::error::{ServiceError, ServiceResult};
use tavshil_core::{
    pricing, validation, Cart, CartItem, CartStatus, CoreError, ItemCustomizations, Money,
    MAX_CART_ITEMS,
};
use tavshil_db::Database;

/// Per-cook slice of the cart page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookCartSummary {
    pub cart_id: String,
    pub cook_id: String,
    pub cook_name: String,
    pub products_total_agorot: i64,
    pub min_order_agorot: i64,
    pub meets_minimum: bool,
}

/// Everything the cart/checkout page shows: per-cook subtotals plus the
/// combined totals with shipping and the commission preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub carts: Vec<CookCartSummary>,
    pub products_total_agorot: i64,
    pub shipping_cost_agorot: i64,
    pub commission_agorot: i64,
    pub total_agorot: i64,
    pub all_meet_minimum: bool,
}

/// Cart management service.
#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
    pricing: PricingConfig,
}

impl CartService {
    /// Creates a new CartService.
    pub fn new(db: Database, pricing: PricingConfig) -> Self {
        CartService { db, pricing }
    }

    /// Opens (or creates) the customer's active cart at one cook, and
    /// abandons every active cart they hold at other cooks.
    ///
    /// This is the single entry point a storefront page uses; the sweep
    /// here is what keeps "one active cart per cook" true everywhere else.
    pub async fn open_cart(&self, customer_email: &str, cook_id: &str) -> ServiceResult<Cart> {
        self.db
            .carts()
            .abandon_other_active(customer_email, cook_id)
            .await?;

        if let Some(cart) = self
            .db
            .carts()
            .active_for_pair(customer_email, cook_id)
            .await?
        {
            return Ok(cart);
        }

        let now = Utc::now();
        let cart = Cart {
            id: Uuid::new_v4().to_string(),
            customer_email: customer_email.to_string(),
            cook_id: cook_id.to_string(),
            items: Vec::new(),
            status: CartStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.db.carts().insert(&cart).await?;

        debug!(cart_id = %cart.id, customer = %customer_email, cook = %cook_id, "Opened new cart");
        Ok(cart)
    }

    /// Adds a dish to the customer's cart at that dish's cook.
    ///
    /// ## Behavior
    /// - Plain add: merges into an existing uncustomized line for the same
    ///   dish, otherwise appends one.
    /// - Customized add: always appends a new line; the per-unit price is
    ///   the dish price plus the chosen extras, frozen at this moment.
    pub async fn add_item(
        &self,
        customer_email: &str,
        dish_id: &str,
        quantity: i64,
        customizations: Option<ItemCustomizations>,
    ) -> ServiceResult<Cart> {
        validation::validate_quantity(quantity).map_err(CoreError::from)?;

        let dish = self
            .db
            .dishes()
            .get_by_id(dish_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Dish", dish_id))?;

        if !dish.is_available {
            return Err(CoreError::DishUnavailable {
                title: dish.title.clone(),
            }
            .into());
        }

        let mut cart = self.open_cart(customer_email, &dish.cook_id).await?;

        match customizations.filter(|c| !c.is_empty()) {
            Some(chosen) => {
                validation::validate_customizations(&chosen, &dish.customization_options)
                    .map_err(CoreError::from)?;

                if cart.items.len() >= MAX_CART_ITEMS {
                    return Err(CoreError::CartTooLarge {
                        max: MAX_CART_ITEMS,
                    }
                    .into());
                }

                let unit_price = dish.price() + chosen.extras_total();
                cart.items.push(CartItem {
                    dish_id: dish.id.clone(),
                    title: dish.title.clone(),
                    price_agorot: unit_price.agorot(),
                    base_price_agorot: Some(dish.price_agorot),
                    quantity,
                    photo_url: dish.photo_url.clone(),
                    customizations: Some(chosen),
                });
            }
            None => {
                let existing = cart
                    .items
                    .iter()
                    .position(|item| item.dish_id == dish.id && item.customizations.is_none());

                match existing {
                    Some(index) => {
                        let merged = cart.items[index].quantity + quantity;
                        validation::validate_quantity(merged).map_err(CoreError::from)?;
                        cart.items[index].quantity = merged;
                    }
                    None => {
                        if cart.items.len() >= MAX_CART_ITEMS {
                            return Err(CoreError::CartTooLarge {
                                max: MAX_CART_ITEMS,
                            }
                            .into());
                        }
                        cart.items.push(CartItem {
                            dish_id: dish.id.clone(),
                            title: dish.title.clone(),
                            price_agorot: dish.price_agorot,
                            base_price_agorot: None,
                            quantity,
                            photo_url: dish.photo_url.clone(),
                            customizations: None,
                        });
                    }
                }
            }
        }

        self.db.carts().update_items(&cart.id, &cart.items).await?;

        debug!(cart_id = %cart.id, dish = %dish.title, "Added to cart");
        Ok(cart)
    }

    /// Changes a line's quantity; zero or less removes the line.
    pub async fn update_quantity(
        &self,
        cart_id: &str,
        item_index: usize,
        quantity: i64,
    ) -> ServiceResult<Cart> {
        let mut cart = self
            .db
            .carts()
            .get_by_id(cart_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", cart_id))?;

        if item_index >= cart.items.len() {
            return Err(ServiceError::cart(format!(
                "Cart has no line at index {item_index}"
            )));
        }

        if quantity <= 0 {
            cart.items.remove(item_index);
        } else {
            validation::validate_quantity(quantity).map_err(CoreError::from)?;
            cart.items[item_index].quantity = quantity;
        }

        self.db.carts().update_items(&cart.id, &cart.items).await?;
        Ok(cart)
    }

    /// Empties the cart and marks it abandoned.
    pub async fn clear(&self, cart_id: &str) -> ServiceResult<()> {
        self.db.carts().update_items(cart_id, &[]).await?;
        self.db
            .carts()
            .set_status(cart_id, CartStatus::Abandoned)
            .await?;

        info!(cart_id = %cart_id, "Cart cleared");
        Ok(())
    }

    /// The customer's active carts that actually hold items.
    pub async fn active_carts(&self, customer_email: &str) -> ServiceResult<Vec<Cart>> {
        let carts = self.db.carts().active_for_customer(customer_email).await?;
        Ok(carts.into_iter().filter(|c| !c.is_empty()).collect())
    }

    /// Builds the cart page summary across all of the customer's active
    /// carts: per-cook subtotals with minimum-order checks, plus combined
    /// totals. The commission figure is a preview of the ledger value the
    /// checkout will pin.
    pub async fn summary(&self, customer_email: &str) -> ServiceResult<CartSummary> {
        let carts = self.active_carts(customer_email).await?;

        let mut cook_summaries = Vec::with_capacity(carts.len());
        let mut products_total = Money::zero();
        let mut all_meet_minimum = true;

        for cart in &carts {
            let cook = self
                .db
                .cooks()
                .get_by_id(&cart.cook_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Cook", &cart.cook_id))?;

            let cart_total = pricing::products_total(&cart.items);
            let meets_minimum = pricing::meets_minimum_order(cart_total, cook.min_order());
            all_meet_minimum &= meets_minimum;
            products_total += cart_total;

            cook_summaries.push(CookCartSummary {
                cart_id: cart.id.clone(),
                cook_id: cook.id,
                cook_name: cook.display_name,
                products_total_agorot: cart_total.agorot(),
                min_order_agorot: cook.min_order_agorot,
                meets_minimum,
            });
        }

        let shipping = Money::from_agorot(self.pricing.shipping_cost_agorot);
        let commission =
            pricing::commission_amount(products_total, self.pricing.commission_rate_bps);
        let total = pricing::order_total(products_total, shipping);

        Ok(CartSummary {
            carts: cook_summaries,
            products_total_agorot: products_total.agorot(),
            shipping_cost_agorot: shipping.agorot(),
            commission_agorot: commission.agorot(),
            total_agorot: total.agorot(),
            all_meet_minimum,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{approved_cook, dish, test_db};
    use tavshil_core::ExtraTopping;

    async fn service() -> (Database, CartService) {
        let db = test_db().await;
        let service = CartService::new(db.clone(), PricingConfig::default());
        (db, service)
    }

    #[tokio::test]
    async fn test_open_cart_abandons_other_cooks() {
        let (db, carts) = service().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        db.cooks().insert(&approved_cook("cook-2", 0)).await.unwrap();

        let first = carts.open_cart("dana@example.com", "cook-1").await.unwrap();
        let second = carts.open_cart("dana@example.com", "cook-2").await.unwrap();

        let old = db.carts().get_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(old.status, CartStatus::Abandoned);
        assert_eq!(second.status, CartStatus::Active);

        // reopening the same cook reuses the cart
        let reopened = carts.open_cart("dana@example.com", "cook-2").await.unwrap();
        assert_eq!(reopened.id, second.id);
    }

    #[tokio::test]
    async fn test_plain_add_merges_quantities() {
        let (db, carts) = service().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        db.dishes().save(&dish("d-1", "cook-1", 4500)).await.unwrap();

        carts
            .add_item("dana@example.com", "d-1", 1, None)
            .await
            .unwrap();
        let cart = carts
            .add_item("dana@example.com", "d-1", 2, None)
            .await
            .unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.items[0].price_agorot, 4500);
    }

    #[tokio::test]
    async fn test_customized_add_appends_priced_line() {
        let (db, carts) = service().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        db.dishes().save(&dish("d-1", "cook-1", 4000)).await.unwrap();

        carts
            .add_item("dana@example.com", "d-1", 1, None)
            .await
            .unwrap();

        let chosen = ItemCustomizations {
            removed: vec!["onion".to_string()],
            extra: vec![ExtraTopping {
                name: "tahini".to_string(),
                count: 2,
                price_agorot: 300,
            }],
        };
        let cart = carts
            .add_item("dana@example.com", "d-1", 1, Some(chosen))
            .await
            .unwrap();

        // customized line does not merge with the plain one
        assert_eq!(cart.items.len(), 2);
        let custom = &cart.items[1];
        assert_eq!(custom.price_agorot, 4600);
        assert_eq!(custom.base_price_agorot, Some(4000));
        assert!(custom.customizations.is_some());
    }

    #[tokio::test]
    async fn test_rejects_unknown_topping() {
        let (db, carts) = service().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        db.dishes().save(&dish("d-1", "cook-1", 4000)).await.unwrap();

        let chosen = ItemCustomizations {
            removed: vec![],
            extra: vec![ExtraTopping {
                name: "truffle".to_string(),
                count: 1,
                price_agorot: 1000,
            }],
        };
        let err = carts
            .add_item("dana@example.com", "d-1", 1, Some(chosen))
            .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_rejects_unavailable_dish() {
        let (db, carts) = service().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        let mut d = dish("d-1", "cook-1", 4000);
        d.is_available = false;
        db.dishes().save(&d).await.unwrap();

        let err = carts.add_item("dana@example.com", "d-1", 1, None).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_zero_quantity_removes_line() {
        let (db, carts) = service().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        db.dishes().save(&dish("d-1", "cook-1", 4500)).await.unwrap();

        let cart = carts
            .add_item("dana@example.com", "d-1", 2, None)
            .await
            .unwrap();
        let cart = carts.update_quantity(&cart.id, 0, 0).await.unwrap();
        assert!(cart.items.is_empty());
    }

    #[tokio::test]
    async fn test_summary_totals_and_minimums() {
        let (db, carts) = service().await;
        // minimum ₪50
        db.cooks()
            .insert(&approved_cook("cook-1", 5000))
            .await
            .unwrap();
        // ₪40 of food
        db.dishes().save(&dish("d-1", "cook-1", 4000)).await.unwrap();

        carts
            .add_item("dana@example.com", "d-1", 1, None)
            .await
            .unwrap();

        let summary = carts.summary("dana@example.com").await.unwrap();
        assert_eq!(summary.products_total_agorot, 4000);
        assert_eq!(summary.shipping_cost_agorot, 2500);
        assert_eq!(summary.commission_agorot, 200); // 5% of ₪40
        assert_eq!(summary.total_agorot, 6500);
        assert!(!summary.all_meet_minimum);
        assert!(!summary.carts[0].meets_minimum);
    }

    #[tokio::test]
    async fn test_clear_abandons_cart() {
        let (db, carts) = service().await;
        db.cooks().insert(&approved_cook("cook-1", 0)).await.unwrap();
        db.dishes().save(&dish("d-1", "cook-1", 4500)).await.unwrap();

        let cart = carts
            .add_item("dana@example.com", "d-1", 1, None)
            .await
            .unwrap();
        carts.clear(&cart.id).await.unwrap();

        let loaded = db.carts().get_by_id(&cart.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, CartStatus::Abandoned);
        assert!(loaded.items.is_empty());
        assert!(carts
            .active_carts("dana@example.com")
            .await
            .unwrap()
            .is_empty());
    }
}

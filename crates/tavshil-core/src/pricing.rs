//! # Pricing Module
//!
//! Order totals, commission and the minimum-order gate.
//!
//! ## Where the Numbers Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Pricing                                  │
//! │                                                                         │
//! │  CartItem ──► line_total(item)                                         │
//! │                   │   (base + extras) × qty  |  price × qty            │
//! │                   ▼                                                     │
//! │  products_total(items) ──► commission_amount(total, 500 bps)           │
//! │                   │              │  ledger value, pinned on the order  │
//! │                   ▼              ▼                                      │
//! │  order_total = products_total + shipping    seller_net = total − fee   │
//! │                                                                         │
//! │  Commission is NEVER added to the customer-facing total.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, Cook};

/// Computes the total for one cart line.
///
/// Customized lines price from the base dish price plus each extra's
/// `price × count`, all multiplied by the line quantity. Plain lines are
/// simply `unit price × quantity`. Since the cart service bakes extras
/// into the frozen unit price, the two paths agree for well-formed lines;
/// the customization path is authoritative when both are present.
pub fn line_total(item: &CartItem) -> Money {
    match &item.customizations {
        Some(c) => (item.base_price() + c.extras_total()).multiply_quantity(item.quantity),
        None => item.unit_price().multiply_quantity(item.quantity),
    }
}

/// Sum of all line totals. Order of the lines does not matter.
pub fn products_total(items: &[CartItem]) -> Money {
    items.iter().map(line_total).sum()
}

/// The platform's ledger cut of a products total.
///
/// Rounds half up to the agora; see [`Money::percentage`]. The caller
/// stores the result on the order at creation — it is never recomputed
/// from stored totals later, so history stays stable if the rate changes.
pub fn commission_amount(products_total: Money, rate_bps: u32) -> Money {
    products_total.percentage(rate_bps)
}

/// Customer-facing total: products plus the flat delivery fee.
/// Commission is informational and not part of this number.
pub fn order_total(products_total: Money, shipping_cost: Money) -> Money {
    products_total + shipping_cost
}

/// Whether a products total satisfies a cook's minimum-order amount.
/// The boundary is inclusive: an exactly-equal total passes.
pub fn meets_minimum_order(products_total: Money, min_order: Option<Money>) -> bool {
    match min_order {
        Some(min) => products_total >= min,
        None => true,
    }
}

/// Pre-submit checkout gate for one cook's cart.
///
/// This is validation only, not a stored invariant: nothing prevents the
/// cook from lowering the minimum between the check and the submit.
pub fn check_minimum_order(products_total: Money, cook: &Cook) -> CoreResult<()> {
    if meets_minimum_order(products_total, cook.min_order()) {
        Ok(())
    } else {
        Err(CoreError::MinimumOrderNotMet {
            cook_name: cook.display_name.clone(),
            required_agorot: cook.min_order_agorot,
            actual_agorot: products_total.agorot(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Order Lifecycle
//!
//! The order status state machine and its append-only audit trail.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Status Transitions                           │
//! │                                                                         │
//! │   Received ──────► Preparing ──────► Ready ──────► Delivered           │
//! │      │  │                │             │                                │
//! │      │  └────────────────┼─────────────┘                                │
//! │      │   (skip straight  │                                              │
//! │      │    to Ready)      │                                              │
//! │      ▼                   ▼             ▼                                │
//! │   Canceled ◄─────────────┴─────────────┘  (terminal, any non-terminal) │
//! │                                                                         │
//! │   No backward transitions. Terminal states reject every attempt        │
//! │   and append NOTHING to status_history.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The allowed sets mirror the seller dashboard's actions exactly: a new
//! order can be started, sent straight out, or canceled; after that only
//! the next step forward (or cancellation) is offered.

use chrono::{DateTime, Duration, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::{Order, OrderStatus, StatusHistoryEntry};

impl OrderStatus {
    /// Terminal states accept no further transitions.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Canceled)
    }

    /// The main "advance" action a seller sees for this status.
    #[inline]
    pub const fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Received => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Canceled => None,
        }
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// ## Allowed Sets
    /// - `Received → Preparing | Ready | Canceled`
    /// - `Preparing → Ready | Canceled`
    /// - `Ready → Delivered | Canceled`
    /// - terminal → nothing
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Received, Preparing)
                | (Received, Ready)
                | (Received, Canceled)
                | (Preparing, Ready)
                | (Preparing, Canceled)
                | (Ready, Delivered)
                | (Ready, Canceled)
        )
    }
}

/// Applies a status transition to an order in memory.
///
/// On success the order's status changes and exactly one
/// `{status, timestamp, note}` entry is appended to `status_history`.
/// On any rejection the order is untouched — in particular, attempts on a
/// terminal order append nothing.
///
/// The history is the audit trail behind elapsed-time displays; callers
/// must persist it as-is, never truncated or reordered.
pub fn apply_transition(
    order: &mut Order,
    next: OrderStatus,
    at: DateTime<Utc>,
    note: impl Into<String>,
) -> CoreResult<()> {
    if order.status.is_terminal() {
        return Err(CoreError::OrderAlreadyFinal {
            order_id: order.id.clone(),
            status: order.status,
        });
    }

    if !order.status.can_transition_to(next) {
        return Err(CoreError::InvalidStatusTransition {
            from: order.status,
            to: next,
        });
    }

    order.status_history.push(StatusHistoryEntry {
        status: next,
        timestamp: at,
        note: note.into(),
    });
    order.status = next;
    order.updated_at = at;

    Ok(())
}

/// Builds the initial history entry every new order starts with.
pub fn initial_history(at: DateTime<Utc>, note: impl Into<String>) -> Vec<StatusHistoryEntry> {
    vec![StatusHistoryEntry {
        status: OrderStatus::Received,
        timestamp: at,
        note: note.into(),
    }]
}

/// When the order is expected to be ready: the `Received` timestamp plus
/// the cook's preparation time. `None` once the order is `Ready` or later
/// (there is nothing left to estimate).
pub fn estimated_ready_at(order: &Order, prep_minutes: i64) -> Option<DateTime<Utc>> {
    match order.status {
        OrderStatus::Received | OrderStatus::Preparing => {
            Some(order.received_at() + Duration::minutes(prep_minutes))
        }
        _ => None,
    }
}

/// Whole minutes until the estimated ready time, clamped at zero
/// ("any moment now"). `None` when no estimate applies.
pub fn minutes_until_ready(order: &Order, prep_minutes: i64, now: DateTime<Utc>) -> Option<i64> {
    estimated_ready_at(order, prep_minutes).map(|ready| (ready - now).num_minutes().max(0))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, PaymentStatus, ShippingAddress};

    fn new_order(status: OrderStatus) -> Order {
        let now = Utc::now();
        let mut order = Order {
            id: "o-1".to_string(),
            order_number: "ORD-TEST-0001".to_string(),
            customer_email: "dana@example.com".to_string(),
            customer_name: "Dana".to_string(),
            customer_phone: "050-0000000".to_string(),
            cook_id: "cook-1".to_string(),
            cook_name: "Savta Rachel".to_string(),
            items: vec![],
            products_total_agorot: 4000,
            shipping_cost_agorot: 2500,
            commission_agorot: 200,
            total_agorot: 6500,
            shipping_address: ShippingAddress::default(),
            status: OrderStatus::Received,
            payment_method: PaymentMethod::Bit,
            payment_status: PaymentStatus::Unpaid,
            customer_note: None,
            pickup_note: None,
            status_history: initial_history(now, "Order received"),
            created_at: now,
            updated_at: now,
        };
        order.status = status;
        order
    }

    #[test]
    fn test_received_reaches_exactly_three_statuses() {
        use OrderStatus::*;
        assert!(Received.can_transition_to(Preparing));
        assert!(Received.can_transition_to(Ready));
        assert!(Received.can_transition_to(Canceled));
        assert!(!Received.can_transition_to(Delivered));
        assert!(!Received.can_transition_to(Received));
    }

    #[test]
    fn test_no_backward_transitions() {
        use OrderStatus::*;
        assert!(!Preparing.can_transition_to(Received));
        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Ready.can_transition_to(Received));
    }

    #[test]
    fn test_main_action_chain() {
        use OrderStatus::*;
        assert_eq!(Received.next(), Some(Preparing));
        assert_eq!(Preparing.next(), Some(Ready));
        assert_eq!(Ready.next(), Some(Delivered));
        assert_eq!(Delivered.next(), None);
        assert_eq!(Canceled.next(), None);
    }

    #[test]
    fn test_apply_transition_appends_history() {
        let mut order = new_order(OrderStatus::Received);
        let at = Utc::now();

        apply_transition(&mut order, OrderStatus::Preparing, at, "").unwrap();

        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.status_history.len(), 2);
        assert_eq!(order.status_history[1].status, OrderStatus::Preparing);
        assert_eq!(order.status_history[1].timestamp, at);
    }

    #[test]
    fn test_terminal_attempt_is_rejected_without_history() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Canceled] {
            let mut order = new_order(terminal);
            let before = order.status_history.clone();

            let err = apply_transition(&mut order, OrderStatus::Preparing, Utc::now(), "");
            assert!(matches!(err, Err(CoreError::OrderAlreadyFinal { .. })));

            // nothing appended, status untouched
            assert_eq!(order.status, terminal);
            assert_eq!(order.status_history, before);
        }
    }

    #[test]
    fn test_invalid_transition_is_rejected_without_history() {
        let mut order = new_order(OrderStatus::Ready);
        let before = order.status_history.clone();

        let err = apply_transition(&mut order, OrderStatus::Preparing, Utc::now(), "");
        assert!(matches!(
            err,
            Err(CoreError::InvalidStatusTransition { .. })
        ));
        assert_eq!(order.status_history, before);
    }

    #[test]
    fn test_cancel_from_every_non_terminal() {
        for status in [
            OrderStatus::Received,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            let mut order = new_order(status);
            apply_transition(&mut order, OrderStatus::Canceled, Utc::now(), "out of stock")
                .unwrap();
            assert_eq!(order.status, OrderStatus::Canceled);
        }
    }

    #[test]
    fn test_minutes_until_ready() {
        let order = new_order(OrderStatus::Received);
        let now = order.received_at();

        // 30 minute prep, asked 10 minutes in → 20 left
        let later = now + Duration::minutes(10);
        assert_eq!(minutes_until_ready(&order, 30, later), Some(20));

        // past the estimate → clamped to 0
        let overdue = now + Duration::minutes(45);
        assert_eq!(minutes_until_ready(&order, 30, overdue), Some(0));
    }

    #[test]
    fn test_no_estimate_after_ready() {
        for status in [
            OrderStatus::Ready,
            OrderStatus::Delivered,
            OrderStatus::Canceled,
        ] {
            let order = new_order(status);
            assert_eq!(minutes_until_ready(&order, 30, Utc::now()), None);
        }
    }
}

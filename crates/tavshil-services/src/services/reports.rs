//! # Report Service
//!
//! Read-only aggregates for the admin dashboard.
//!
//! Commission totals sum the per-order ledger values pinned at checkout;
//! they are never rederived from the stored totals, so a rate change only
//! shows up in orders created after it.

use serde::Serialize;

use crate::error::ServiceResult;
use tavshil_core::Order;
use tavshil_db::Database;

/// Platform-wide order aggregates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    pub order_count: i64,
    pub revenue_agorot: i64,
    pub avg_order_agorot: i64,
    pub commission_agorot: i64,
}

/// Admin reporting service.
#[derive(Debug, Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    /// Creates a new ReportService.
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// Order count, revenue, average order value and commission totals.
    pub async fn orders_report(&self) -> ServiceResult<OrderReport> {
        let totals = self.db.orders().totals().await?;

        let avg_order_agorot = if totals.order_count > 0 {
            totals.revenue_agorot / totals.order_count
        } else {
            0
        };

        Ok(OrderReport {
            order_count: totals.order_count,
            revenue_agorot: totals.revenue_agorot,
            avg_order_agorot,
            commission_agorot: totals.commission_agorot,
        })
    }

    /// Recent orders for the admin orders screen.
    pub async fn recent_orders(&self, limit: u32) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().list_recent(limit).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

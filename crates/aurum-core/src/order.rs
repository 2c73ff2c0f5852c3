//! # Orders
//!
//! Customer and wholesale orders, and how their status follows the batches
//! produced for them.
//!
//! ## Status Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Pending ──send_to_production──► InProduction ──all batches Ready──►    │
//! │     │                                 │                      Ready      │
//! │     │                                 │                        │        │
//! │     └──────────────► Cancelled ◄──────┘                        ▼        │
//! │                                                            Delivered    │
//! │                                                                         │
//! │  Cancelled and Delivered are set by hand and never derived away.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::batch::ProductionBatch;

// =============================================================================
// Order Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Taken, not yet sent to the workshop.
    Pending,
    /// Batches exist and at least one is not Ready.
    InProduction,
    /// Every batch reached Ready.
    Ready,
    /// Handed to the customer.
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Statuses only a person can set; batch progress never overrides them.
    pub fn is_sticky(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// One line of an order.
///
/// `sku` is either a master SKU with the variant in `variant_suffix`, or a
/// full code (`DA050XKR`) with `variant_suffix` left empty for the codec to
/// split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub sku: String,
    pub variant_suffix: Option<String>,
    pub quantity: i64,
    /// Ring or bracelet size, copied onto the batch.
    pub size_info: Option<String>,
}

impl OrderItem {
    pub fn new(sku: impl Into<String>, quantity: i64) -> Self {
        OrderItem {
            sku: sku.into(),
            variant_suffix: None,
            quantity,
            size_info: None,
        }
    }

    pub fn with_variant(mut self, suffix: impl Into<String>) -> Self {
        self.variant_suffix = Some(suffix.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size_info = Some(size.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order with a fresh id.
    pub fn new(customer_name: impl Into<String>, items: Vec<OrderItem>, now: DateTime<Utc>) -> Self {
        Order {
            id: Uuid::new_v4().to_string(),
            customer_name: customer_name.into(),
            status: OrderStatus::Pending,
            notes: None,
            items,
            created_at: now,
            updated_at: now,
        }
    }

    /// Pieces ordered across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Status Derivation
// =============================================================================

/// Derives an order's status from the batches produced for it.
///
/// ## Rules
/// - `Cancelled` and `Delivered` are kept as they are
/// - No batches → `Pending`
/// - Every batch `Ready` → `Ready`
/// - Otherwise → `InProduction`
pub fn derive_order_status(current: OrderStatus, batches: &[ProductionBatch]) -> OrderStatus {
    if current.is_sticky() {
        return current;
    }
    if batches.is_empty() {
        return OrderStatus::Pending;
    }
    if batches.iter().all(ProductionBatch::is_ready) {
        OrderStatus::Ready
    } else {
        OrderStatus::InProduction
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ProductionStage;
    use crate::catalog::ProductionPath;

    fn batch(stage: ProductionStage) -> ProductionBatch {
        let mut batch =
            ProductionBatch::new("DA050", "X", 2, ProductionPath::InHouse, true, Utc::now());
        batch.current_stage = stage;
        batch
    }

    #[test]
    fn test_no_batches_is_pending() {
        assert_eq!(
            derive_order_status(OrderStatus::InProduction, &[]),
            OrderStatus::Pending
        );
    }

    #[test]
    fn test_all_ready() {
        let batches = vec![batch(ProductionStage::Ready), batch(ProductionStage::Ready)];
        assert_eq!(
            derive_order_status(OrderStatus::InProduction, &batches),
            OrderStatus::Ready
        );
    }

    #[test]
    fn test_partially_ready_is_in_production() {
        let batches = vec![batch(ProductionStage::Ready), batch(ProductionStage::Polishing)];
        assert_eq!(
            derive_order_status(OrderStatus::Pending, &batches),
            OrderStatus::InProduction
        );
        // Ready is derived, not sticky
        assert_eq!(
            derive_order_status(OrderStatus::Ready, &batches),
            OrderStatus::InProduction
        );
    }

    #[test]
    fn test_sticky_statuses() {
        let batches = vec![batch(ProductionStage::Casting)];
        assert_eq!(
            derive_order_status(OrderStatus::Cancelled, &batches),
            OrderStatus::Cancelled
        );
        assert_eq!(
            derive_order_status(OrderStatus::Delivered, &[]),
            OrderStatus::Delivered
        );
    }

    #[test]
    fn test_order_builder() {
        let order = Order::new(
            "Atelier Rhodes",
            vec![
                OrderItem::new("DA050", 3).with_variant("XKR").with_size("54"),
                OrderItem::new("MR220HEM", 2),
            ],
            Utc::now(),
        );
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_quantity(), 5);
        assert_eq!(order.items[0].variant_suffix.as_deref(), Some("XKR"));
        assert_eq!(order.items[0].size_info.as_deref(), Some("54"));
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProduction).unwrap(),
            "\"in_production\""
        );
    }
}

//! # Order Fulfillment Planning
//!
//! Turns an order's lines into the production batches that will make them.
//!
//! ```text
//! Order #7 (Pending)
//! ├── line 1: DA050 / XKR  × 3  size 54   → batch 3 × DA050XKR  @ Waxing
//! ├── line 2: MR220HEM     × 2            → batch 2 × MR220HEM  @ AwaitingDelivery
//! └── line 3: DA100 / QQ   × 1            → LineItemUnresolvable → nothing is created
//! ```
//!
//! Planning is all-or-nothing: the first unresolvable line fails the whole
//! order and no batches are returned. `aurum-db` inserts the plan in a single
//! transaction.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::barcode::normalize_code;
use crate::batch::ProductionBatch;
use crate::catalog::{Catalog, Product};
use crate::codec::decode;
use crate::error::{CoreError, CoreResult};
use crate::order::{Order, OrderItem};
use crate::validation::{validate_order_lines, validate_quantity};

/// Plans one root batch per order line.
///
/// ## Errors
/// - `Validation` when the order has no lines or a quantity is out of bounds
/// - `LineItemUnresolvable` when a line's SKU or variant is not in the catalog
pub fn plan_production(
    order: &Order,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> CoreResult<Vec<ProductionBatch>> {
    validate_order_lines(order.items.len())?;

    let mut batches = Vec::with_capacity(order.items.len());

    for (index, item) in order.items.iter().enumerate() {
        validate_quantity(item.quantity)?;

        let (product, suffix) = resolve_line(index + 1, item, catalog)?;

        let mut batch = ProductionBatch::new(
            product.sku.clone(),
            suffix,
            item.quantity,
            product.production_path,
            product.requires_setting,
            now,
        );
        batch.order_id = Some(order.id.clone());
        batch.size_info = item.size_info.clone();

        debug!(
            order_id = %order.id,
            line = index + 1,
            code = %batch.code(),
            quantity = batch.quantity,
            stage = %batch.current_stage,
            "Planned batch"
        );

        batches.push(batch);
    }

    Ok(batches)
}

/// Resolves one order line to its product and variant suffix.
///
/// With an explicit `variant_suffix` the SKU is looked up as a master.
/// Without one the SKU is decoded as a full code, and any residue makes the
/// line unresolvable.
pub fn resolve_line<'a>(
    line: usize,
    item: &OrderItem,
    catalog: &'a Catalog,
) -> CoreResult<(&'a Product, String)> {
    let unresolvable = |reason: String| CoreError::LineItemUnresolvable {
        line,
        sku: item.sku.clone(),
        variant: item.variant_suffix.clone().unwrap_or_default(),
        reason,
    };

    let (product, suffix) = match &item.variant_suffix {
        Some(suffix) => {
            let master = normalize_code(&item.sku);
            let product = catalog
                .get(&master)
                .ok_or_else(|| unresolvable(format!("unknown master SKU {master}")))?;
            (product, normalize_code(suffix))
        }
        None => {
            let decoded = decode(&item.sku, catalog).map_err(|e| unresolvable(e.to_string()))?;
            if let Some(residue) = &decoded.residue {
                return Err(unresolvable(format!("unrecognized suffix residue '{residue}'")));
            }
            let product = catalog
                .get(&decoded.master)
                .ok_or_else(|| unresolvable(format!("unknown master SKU {}", decoded.master)))?;
            (product, decoded.suffix())
        }
    };

    if !product.has_variant(&suffix) {
        return Err(unresolvable(format!(
            "variant '{suffix}' does not exist for {}",
            product.sku
        )));
    }

    Ok((product, suffix))
}

// =============================================================================
// Unit Tests
// =============================================================================

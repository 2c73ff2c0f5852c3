//! # Production Batch Lifecycle
//!
//! Stage rules for a quantity of one SKU variant moving through the workshop.
//!
//! ## Stages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  in-house:  Waxing → Casting → [Setting] → Polishing → Labeling → Ready │
//! │                                    ▲                                    │
//! │                                    └── only when requires_setting       │
//! │                                                                         │
//! │  imported:  AwaitingDelivery ─────────────────────────► Labeling → Ready│
//! │             (goods receipt)                                             │
//! │                                                                         │
//! │  Moves only go forward. Ready is terminal.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Move vs Split
//! ```text
//! batch: 10 @ Casting
//!
//! move_stage(Polishing, 10)  →  Advanced   10 @ Polishing          (same row)
//! move_stage(Polishing, 4)   →  Split       6 @ Casting            (same row)
//!                                           4 @ Polishing          (new row)
//! ```
//!
//! [`move_stage`] only plans the change; `aurum-db` applies it in one
//! transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::ProductionPath;
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Production Stage
// =============================================================================

/// Manufacturing stage, in workshop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductionStage {
    /// Imported goods ordered from the supplier, not yet received.
    AwaitingDelivery,
    Waxing,
    Casting,
    /// Stone setting. Skipped for products without stones.
    Setting,
    Polishing,
    Labeling,
    /// Finished. No further transitions.
    Ready,
}

impl ProductionStage {
    /// All stages in order.
    pub const ALL: [ProductionStage; 7] = [
        ProductionStage::AwaitingDelivery,
        ProductionStage::Waxing,
        ProductionStage::Casting,
        ProductionStage::Setting,
        ProductionStage::Polishing,
        ProductionStage::Labeling,
        ProductionStage::Ready,
    ];

    /// Position in [`ProductionStage::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductionStage::AwaitingDelivery => "awaiting_delivery",
            ProductionStage::Waxing => "waxing",
            ProductionStage::Casting => "casting",
            ProductionStage::Setting => "setting",
            ProductionStage::Polishing => "polishing",
            ProductionStage::Labeling => "labeling",
            ProductionStage::Ready => "ready",
        }
    }

    /// Label for the workshop board.
    pub const fn label(&self) -> &'static str {
        match self {
            ProductionStage::AwaitingDelivery => "Awaiting delivery",
            ProductionStage::Waxing => "Waxing",
            ProductionStage::Casting => "Casting",
            ProductionStage::Setting => "Stone setting",
            ProductionStage::Polishing => "Polishing",
            ProductionStage::Labeling => "Labeling",
            ProductionStage::Ready => "Ready",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == ProductionStage::Ready
    }

    /// Initial stage for a production path.
    pub fn initial(path: ProductionPath) -> Self {
        match path {
            ProductionPath::InHouse => ProductionStage::Waxing,
            ProductionPath::Imported => ProductionStage::AwaitingDelivery,
        }
    }

    /// Next stage on the default path, honoring the setting skip.
    pub fn next(&self, requires_setting: bool) -> Option<Self> {
        let next = match self {
            ProductionStage::AwaitingDelivery => ProductionStage::Labeling,
            ProductionStage::Waxing => ProductionStage::Casting,
            ProductionStage::Casting if requires_setting => ProductionStage::Setting,
            ProductionStage::Casting => ProductionStage::Polishing,
            ProductionStage::Setting => ProductionStage::Polishing,
            ProductionStage::Polishing => ProductionStage::Labeling,
            ProductionStage::Labeling => ProductionStage::Ready,
            ProductionStage::Ready => return None,
        };
        Some(next)
    }
}

impl fmt::Display for ProductionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductionStage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductionStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| {
                CoreError::Validation(crate::error::ValidationError::InvalidFormat {
                    field: "stage".to_string(),
                    reason: format!("unknown stage '{s}'"),
                })
            })
    }
}

// =============================================================================
// Production Batch
// =============================================================================

/// A quantity of one SKU variant sitting at one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductionBatch {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Batch this row descends from. A root batch points at itself.
    pub origin_id: String,

    /// Master SKU.
    pub sku: String,

    /// Finish + stone suffix. Empty for lustre without stone.
    pub variant_suffix: String,

    /// Pieces in this row. Always positive.
    pub quantity: i64,

    pub current_stage: ProductionStage,

    pub requires_setting: bool,

    /// Order this batch was produced for, if any.
    pub order_id: Option<String>,

    /// Ring/bracelet size copied from the order line.
    pub size_info: Option<String>,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ProductionBatch {
    /// Creates a root batch at the initial stage of its production path.
    pub fn new(
        sku: impl Into<String>,
        variant_suffix: impl Into<String>,
        quantity: i64,
        path: ProductionPath,
        requires_setting: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        ProductionBatch {
            origin_id: id.clone(),
            id,
            sku: sku.into(),
            variant_suffix: variant_suffix.into(),
            quantity,
            current_stage: ProductionStage::initial(path),
            requires_setting,
            order_id: None,
            size_info: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full code: master + suffix.
    pub fn code(&self) -> String {
        format!("{}{}", self.sku, self.variant_suffix)
    }

    pub fn is_ready(&self) -> bool {
        self.current_stage.is_terminal()
    }

    /// Every stage this batch may move to next.
    pub fn allowed_targets(&self) -> Vec<ProductionStage> {
        ProductionStage::ALL
            .into_iter()
            .filter(|target| check_transition(self, *target).is_ok())
            .collect()
    }
}

// =============================================================================
// Transitions
// =============================================================================

/// Checks whether `batch` may move to `target`.
///
/// ## Rules
/// - Ready batches never move (`TerminalStage`)
/// - Only forward moves
/// - Nothing enters AwaitingDelivery
/// - Batches leaving AwaitingDelivery go to Labeling only (goods receipt)
/// - Setting requires `requires_setting`
pub fn check_transition(batch: &ProductionBatch, target: ProductionStage) -> CoreResult<()> {
    let from = batch.current_stage;

    if from.is_terminal() {
        return Err(CoreError::TerminalStage(batch.id.clone()));
    }

    let allowed = target > from
        && target != ProductionStage::AwaitingDelivery
        && (from != ProductionStage::AwaitingDelivery || target == ProductionStage::Labeling)
        && (target != ProductionStage::Setting || batch.requires_setting);

    if allowed {
        Ok(())
    } else {
        Err(CoreError::StageTransitionNotAllowed {
            batch_id: batch.id.clone(),
            from,
            to: target,
        })
    }
}

/// Outcome of a planned stage move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageMove {
    /// Whole batch moved; the row changes stage in place.
    Advanced { batch: ProductionBatch },
    /// Part of the batch moved to a new row.
    Split {
        /// Original row, quantity reduced, stage unchanged.
        remainder: ProductionBatch,
        /// New row at the target stage.
        moved: ProductionBatch,
    },
}

impl StageMove {
    /// Rows after the move.
    pub fn batches(&self) -> Vec<&ProductionBatch> {
        match self {
            StageMove::Advanced { batch } => vec![batch],
            StageMove::Split { remainder, moved } => vec![remainder, moved],
        }
    }

    /// Total quantity across the resulting rows.
    pub fn total_quantity(&self) -> i64 {
        self.batches().iter().map(|b| b.quantity).sum()
    }

    pub fn is_split(&self) -> bool {
        matches!(self, StageMove::Split { .. })
    }
}

/// Plans moving `move_quantity` pieces of `batch` to `target`.
///
/// ## Errors
/// - `InvalidSplitQuantity` when `move_quantity` is not in `1..=batch.quantity`
/// - `StageTransitionNotAllowed` / `TerminalStage` per [`check_transition`]
///
/// ## Panics
/// If the planned rows do not add up to the original quantity.
pub fn move_stage(
    batch: &ProductionBatch,
    target: ProductionStage,
    move_quantity: i64,
    now: DateTime<Utc>,
) -> CoreResult<StageMove> {
    if move_quantity <= 0 || move_quantity > batch.quantity {
        return Err(CoreError::InvalidSplitQuantity {
            batch_id: batch.id.clone(),
            available: batch.quantity,
            requested: move_quantity,
        });
    }

    check_transition(batch, target)?;

    let outcome = if move_quantity == batch.quantity {
        let mut moved = batch.clone();
        moved.current_stage = target;
        moved.updated_at = now;
        StageMove::Advanced { batch: moved }
    } else {
        let mut remainder = batch.clone();
        remainder.quantity -= move_quantity;
        remainder.updated_at = now;

        let moved = ProductionBatch {
            id: Uuid::new_v4().to_string(),
            origin_id: batch.origin_id.clone(),
            quantity: move_quantity,
            current_stage: target,
            created_at: now,
            updated_at: now,
            ..batch.clone()
        };

        StageMove::Split { remainder, moved }
    };

    assert_eq!(
        outcome.total_quantity(),
        batch.quantity,
        "stage move of batch {} changed total quantity",
        batch.id
    );

    Ok(outcome)
}

// =============================================================================
// Unit Tests
// =============================================================================

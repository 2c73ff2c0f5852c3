//! # aurum-core: SKU Codec and Batch Lifecycle
//!
//! Pure logic for the jewelry workshop: reading product codes, and tracking
//! quantities of each variant through production. Nothing in this crate
//! touches a database, a file or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Aurum Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Inventory UI / label printing / scanner input          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ aurum-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  tables   │  │   codec   │  │   range   │  │   price   │  │   │
//! │  │   │  finish   │  │  decode   │  │  expand   │  │  codify   │  │   │
//! │  │   │  stones   │  │  encode   │  │  lists    │  │  decode   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  barcode  │  │   batch   │  │   order   │  │fulfillment│  │   │
//! │  │   │ translit. │  │  stages   │  │  status   │  │   plan    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    aurum-db (Database Layer)                    │   │
//! │  │     SQLite, migrations, repositories, transactional moves       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`tables`] - Finish and per-gender stone code tables
//! - [`catalog`] - Products and variants, longest-prefix lookup
//! - [`codec`] - Decode/encode of flat product codes
//! - [`barcode`] - Symbology-safe transliteration and scanner normalization
//! - [`price`] - Keyword price cipher for tags
//! - [`range`] - SKU range expansion
//! - [`batch`] - Production stages, transitions, move/split planning
//! - [`order`] - Orders and derived order status
//! - [`fulfillment`] - Order lines → initial batches
//! - [`money`] - Integer-cent money
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use aurum_core::money::Money;
//! use aurum_core::price::PriceCipher;
//! use aurum_core::range::RangeExpander;
//!
//! let tag = PriceCipher::default().codify(Money::from_cents(12550)).unwrap();
//! assert_eq!(tag, "ONTTM");
//!
//! let skus = RangeExpander::default().expand("DA098-DA100X").unwrap();
//! assert_eq!(skus, vec!["DA098X", "DA099X", "DA100X"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod batch;
pub mod catalog;
pub mod codec;
pub mod error;
pub mod fulfillment;
pub mod money;
pub mod order;
pub mod price;
pub mod range;
pub mod tables;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use batch::{move_stage, ProductionBatch, ProductionStage, StageMove};
pub use catalog::{Catalog, Product, ProductVariant, ProductionPath};
pub use codec::{decode, decode_strict, encode, DecodedSku};
pub use error::{CoreError, CoreResult, ValidationError};
pub use fulfillment::plan_production;
pub use money::Money;
pub use order::{derive_order_status, Order, OrderItem, OrderStatus};
pub use price::PriceCipher;
pub use range::RangeExpander;
pub use tables::Gender;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity on one order line or batch.
///
/// Guards against a scanner repeat or a typed extra zero turning 10 rings
/// into 1000.
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Maximum lines on a single order.
pub const MAX_ORDER_LINES: usize = 200;

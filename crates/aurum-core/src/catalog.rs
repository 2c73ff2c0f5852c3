//! # Catalog
//!
//! Read-only view of the product catalog as the codec needs it: products keyed
//! by master SKU, with prefix lookup across the whole catalog.
//!
//! ## Dual-Key Identity
//! A product is identified by its master SKU (`DA050`). Variants are the
//! suffixes (`XKR`, `H`, ...) that have actually been produced for it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog                                                                │
//! │  ├── DA10   (women, in-house, requires_setting)   variants: "", X      │
//! │  ├── DA100  (women, in-house)                     variants: X, XKR     │
//! │  └── MR220  (men, imported)                       variants: ""         │
//! │                                                                         │
//! │  longest_master_prefix("DA100XKR") → DA100                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::tables::Gender;

// =============================================================================
// Production Path
// =============================================================================

/// How a product reaches the shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductionPath {
    /// Waxed, cast, set and polished in the workshop.
    InHouse,
    /// Bought finished; only received, labeled and shelved.
    Imported,
}

impl Default for ProductionPath {
    fn default() -> Self {
        ProductionPath::InHouse
    }
}

// =============================================================================
// Product
// =============================================================================

/// A variant that exists for a product (finish + stone suffix).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductVariant {
    /// Suffix after the master SKU. Empty for the plain lustre piece.
    pub suffix: String,
    /// Free-form description shown next to the code.
    pub description: Option<String>,
}

/// A catalog product (one design).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Master SKU. Stable design code.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Selects the stone table for decoding this product's suffixes.
    pub gender: Gender,

    /// In-house or imported.
    pub production_path: ProductionPath,

    /// Whether the recipe uses stones, computed upstream from materials.
    pub requires_setting: bool,

    /// Retail price in cents.
    pub price_cents: i64,

    /// Variants that exist for this product.
    pub variants: Vec<ProductVariant>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks that a variant suffix exists for this product.
    ///
    /// The bare master (empty suffix) is always a valid variant: every design
    /// can be produced in its default lustre finish without a stone.
    pub fn has_variant(&self, suffix: &str) -> bool {
        suffix.is_empty() || self.variants.iter().any(|v| v.suffix == suffix)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// In-memory catalog keyed by master SKU.
///
/// Built once from the persistence layer and then only read, so it can be
/// shared across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<String, Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a product.
    pub fn insert(&mut self, product: Product) {
        self.products.insert(product.sku.clone(), product);
    }

    /// Exact master lookup.
    pub fn get(&self, master: &str) -> Option<&Product> {
        self.products.get(master)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterates products in master SKU order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Finds the longest master SKU that `code` starts with.
    ///
    /// Prefixes of `code` are tried from longest to shortest, so the first
    /// hit is the longest match. Two distinct masters can never tie at the
    /// same length, which makes the result deterministic.
    pub fn longest_master_prefix(&self, code: &str) -> Option<&Product> {
        code.char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .rev()
            .find_map(|end| self.products.get(&code[..end]))
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for product in iter {
            catalog.insert(product);
        }
        catalog
    }
}


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::fixtures::catalog;

    #[test]
    fn test_longest_master_prefix() {
        let catalog = catalog();
        assert_eq!(catalog.longest_master_prefix("DA100X").unwrap().sku, "DA100");
        assert_eq!(catalog.longest_master_prefix("DA10X").unwrap().sku, "DA10");
        assert_eq!(catalog.longest_master_prefix("DA10").unwrap().sku, "DA10");
        assert!(catalog.longest_master_prefix("DA1").is_none());
        assert!(catalog.longest_master_prefix("").is_none());
    }

    #[test]
    fn test_has_variant() {
        let catalog = catalog();
        let product = catalog.get("DA050").unwrap();
        assert!(product.has_variant(""));
        assert!(product.has_variant("XKR"));
        assert!(!product.has_variant("HKR"));
    }
}

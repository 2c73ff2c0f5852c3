//! # aurum-db: Database Layer for Aurum
//!
//! Persistence for the catalog, orders and production batches, on SQLite
//! through sqlx. Every stage move runs in one transaction that re-checks the
//! batch it read and the quantity of its origin before committing.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Aurum Data Flow                                 │
//! │                                                                         │
//! │  Inventory screen / scanner / seed binary                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     aurum-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ CatalogRepo   │    │  (embedded)  │  │   │
//! │  │   │               │◄───│ OrderRepo     │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │    │ BatchRepo     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │   ┌───────────────┐    ┌───────────────┐                       │   │
//! │  │   │ AurumConfig   │    │ Production    │                       │   │
//! │  │   │ (aurum.toml)  │    │ Service       │                       │   │
//! │  │   └───────────────┘    └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/aurum/aurum.db                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`config`] - `aurum.toml` loading with environment overrides
//! - [`error`] - Database error types
//! - [`repository`] - Catalog, order and batch repositories
//! - [`service`] - Sending orders to production
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aurum_db::{AurumConfig, Database, DbConfig};
//! use aurum_core::ProductionStage;
//!
//! let config = AurumConfig::load(None)?;
//! let db = Database::new(DbConfig::from(&config)).await?;
//!
//! let batches = db.production().send_to_production(&order_id).await?;
//! db.batches().move_stage(&batches[0].id, ProductionStage::Casting, 4).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::AurumConfig;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::ProductionService;

// Repository re-exports for convenience
pub use repository::batch::{BatchRepository, StageCount};
pub use repository::catalog::CatalogRepository;
pub use repository::order::OrderRepository;

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Calling this twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aurum_core=debug,aurum_db=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use aurum_core::{Gender, Product, ProductVariant, ProductionBatch, ProductionPath};
    use chrono::Utc;

    use crate::pool::{Database, DbConfig};

    pub fn product(
        sku: &str,
        gender: Gender,
        path: ProductionPath,
        setting: bool,
        suffixes: &[&str],
    ) -> Product {
        let now = Utc::now();
        Product {
            sku: sku.to_string(),
            name: format!("Design {sku}"),
            gender,
            production_path: path,
            requires_setting: setting,
            price_cents: 4500,
            variants: suffixes
                .iter()
                .map(|s| ProductVariant {
                    suffix: s.to_string(),
                    description: None,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A root batch with no order, at the first stage of its path.
    pub fn stock_batch(
        sku: &str,
        suffix: &str,
        quantity: i64,
        path: ProductionPath,
        setting: bool,
    ) -> ProductionBatch {
        ProductionBatch::new(sku, suffix, quantity, path, setting, Utc::now())
    }

    /// In-memory database with four designs. DA10 and DA100 share a prefix.
    pub async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();
        for p in [
            product("DA10", Gender::Women, ProductionPath::InHouse, true, &["X", "XKR"]),
            product("DA100", Gender::Women, ProductionPath::InHouse, false, &["X", "H", "XKRX"]),
            product("DA050", Gender::Women, ProductionPath::InHouse, true, &["XKR", "PPRL", "KRX"]),
            product("MR220", Gender::Men, ProductionPath::Imported, false, &["HEM", "XONX"]),
        ] {
            catalog.upsert_product(&p).await.unwrap();
        }
        db
    }
}

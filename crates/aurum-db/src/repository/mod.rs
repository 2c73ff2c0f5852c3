//! # Repository Module
//!
//! Database repository implementations for Aurum.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  caller                                                                 │
//! │       │  db.batches().move_stage(id, Polishing, 4)                      │
//! │       ▼                                                                 │
//! │  BatchRepository                                                        │
//! │  ├── read row           (BEGIN IMMEDIATE transaction)                   │
//! │  ├── plan with aurum-core::batch::move_stage                            │
//! │  ├── guarded UPDATE / INSERT                                            │
//! │  └── re-check origin total, refresh order status, commit                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - Products, variants, in-memory catalog load
//! - [`order::OrderRepository`] - Orders, lines and derived status
//! - [`batch::BatchRepository`] - Production batches, stage moves and splits

pub mod batch;
pub mod catalog;
pub mod order;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::DbResult;

/// Opens a transaction that holds the write lock from its first statement.
///
/// A deferred `BEGIN` upgrades its read lock at the first write and fails
/// with `SQLITE_BUSY` if another connection committed in between. With
/// `IMMEDIATE` the second writer waits out `busy_timeout` instead.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

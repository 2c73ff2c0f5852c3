//! # Production Service
//!
//! Turns a pending order into its initial production batches.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  send_to_production(order_id)                                           │
//! │                                                                         │
//! │  pool  ── get order (must be Pending)                                   │
//! │       └─ load catalog                                                   │
//! │  core  ── plan_production(order, catalog)   all lines or nothing        │
//! │  tx    ── no batches exist yet for the order                            │
//! │       ├─ INSERT every batch                                             │
//! │       ├─ UPDATE orders ... WHERE status = 'pending'                     │
//! │       └─ COMMIT                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads happen before the transaction opens so a single-connection pool
//! never waits on itself.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::batch::insert_batch;
use crate::repository::begin_write;
use crate::repository::catalog::CatalogRepository;
use crate::repository::order::fetch_order;
use aurum_core::{plan_production, OrderStatus, ProductionBatch};

/// Sends orders into the workshop.
#[derive(Debug, Clone)]
pub struct ProductionService {
    pool: SqlitePool,
}

impl ProductionService {
    pub fn new(pool: SqlitePool) -> Self {
        ProductionService { pool }
    }

    /// Creates one batch per order line and marks the order InProduction.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown order
    /// - `InvalidState` when the order is not Pending or already has batches
    /// - `Domain(LineItemUnresolvable)` when any line does not resolve;
    ///   nothing is written in that case
    /// - `ConcurrentModification` when the order left Pending meanwhile
    pub async fn send_to_production(&self, order_id: &str) -> DbResult<Vec<ProductionBatch>> {
        let order = {
            let mut conn = self.pool.acquire().await?;
            fetch_order(&mut *conn, order_id)
                .await?
                .ok_or_else(|| DbError::not_found("Order", order_id))?
        };

        if order.status != OrderStatus::Pending {
            return Err(DbError::InvalidState(format!(
                "order {} is {}, only pending orders go to production",
                order.id, order.status
            )));
        }

        let catalog = CatalogRepository::new(self.pool.clone()).load_catalog().await?;
        let batches = plan_production(&order, &catalog, Utc::now())?;

        let mut tx = begin_write(&self.pool).await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM production_batches WHERE order_id = ?1")
                .bind(&order.id)
                .fetch_one(&mut *tx)
                .await?;
        if existing > 0 {
            return Err(DbError::InvalidState(format!(
                "order {} already has {existing} batches",
                order.id
            )));
        }

        for batch in &batches {
            insert_batch(&mut *tx, batch).await?;
        }

        let result = sqlx::query(
            "UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1 AND status = ?4",
        )
        .bind(&order.id)
        .bind(OrderStatus::InProduction)
        .bind(Utc::now())
        .bind(OrderStatus::Pending)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            warn!(order_id = %order.id, "Order changed while sending to production");
            return Err(DbError::conflict("Order", &order.id));
        }

        tx.commit().await?;

        debug!(order_id = %order.id, batches = batches.len(), "Batches committed");
        info!(
            order_id = %order.id,
            customer = %order.customer_name,
            pieces = order.total_quantity(),
            "Order sent to production"
        );
        Ok(batches)
    }
}

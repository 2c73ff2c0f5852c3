//! # Batch Repository
//!
//! Production batches and the transactional stage moves over them.
//!
//! ## Move Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │  ├── SELECT batch                     (current quantity, stage)         │
//! │  ├── SELECT SUM(quantity) per origin  (before)                          │
//! │  ├── aurum_core::move_stage           → Advanced | Split                │
//! │  ├── UPDATE ... WHERE id = ? AND quantity = ? AND current_stage = ?     │
//! │  │      0 rows → ConcurrentModification (rollback)                      │
//! │  ├── INSERT child                     (Split only)                      │
//! │  ├── SELECT SUM(quantity) per origin  (after)                           │
//! │  │      before != after → InvariantViolation (rollback)                 │
//! │  ├── refresh order status                                               │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are never deleted, so the sum per origin is the quantity the batch
//! was created with.

use chrono::Utc;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::begin_write;
use crate::repository::order::refresh_status_on;
use aurum_core::batch::check_transition;
use aurum_core::validation::validate_quantity;
use aurum_core::{move_stage, CoreError, ProductionBatch, ProductionStage, StageMove};

const BATCH_COLUMNS: &str = "id, origin_id, sku, variant_suffix, quantity, current_stage, \
                             requires_setting, order_id, size_info, notes, created_at, updated_at";

/// Batches and pieces at one stage, for the workshop board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: ProductionStage,
    pub batches: i64,
    pub pieces: i64,
}

/// Repository for production batch operations.
#[derive(Debug, Clone)]
pub struct BatchRepository {
    pool: SqlitePool,
}

impl BatchRepository {
    /// Creates a new BatchRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BatchRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a batch by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ProductionBatch>> {
        let mut conn = self.pool.acquire().await?;
        fetch_batch(&mut *conn, id).await
    }

    /// Lists the batches produced for an order.
    pub async fn list_by_order(&self, order_id: &str) -> DbResult<Vec<ProductionBatch>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_order(&mut *conn, order_id).await
    }

    /// Lists every row descending from one root batch, root first.
    pub async fn list_by_origin(&self, origin_id: &str) -> DbResult<Vec<ProductionBatch>> {
        let batches: Vec<ProductionBatch> = sqlx::query_as(&format!(
            "SELECT {BATCH_COLUMNS} FROM production_batches \
             WHERE origin_id = ?1 ORDER BY (id = origin_id) DESC, created_at, id"
        ))
        .bind(origin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Lists batches sitting at a stage, oldest first.
    pub async fn list_by_stage(&self, stage: ProductionStage) -> DbResult<Vec<ProductionBatch>> {
        let batches: Vec<ProductionBatch> = sqlx::query_as(&format!(
            "SELECT {BATCH_COLUMNS} FROM production_batches \
             WHERE current_stage = ?1 ORDER BY created_at, id"
        ))
        .bind(stage)
        .fetch_all(&self.pool)
        .await?;

        debug!(stage = %stage, count = batches.len(), "Listed batches by stage");
        Ok(batches)
    }

    /// Total quantity across all rows sharing an origin.
    pub async fn origin_total(&self, origin_id: &str) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        origin_total_on(&mut *conn, origin_id).await
    }

    /// Batch and piece counts per stage, in stage order.
    pub async fn stage_counts(&self) -> DbResult<Vec<StageCount>> {
        let rows: Vec<(ProductionStage, i64, i64)> = sqlx::query_as(
            r#"
            SELECT current_stage, COUNT(*), COALESCE(SUM(quantity), 0)
            FROM production_batches
            GROUP BY current_stage
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut counts: Vec<StageCount> = rows
            .into_iter()
            .map(|(stage, batches, pieces)| StageCount {
                stage,
                batches,
                pieces,
            })
            .collect();
        counts.sort_by_key(|c| c.stage);
        Ok(counts)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a root batch not tied to an order (stock production).
    pub async fn insert(&self, batch: &ProductionBatch) -> DbResult<()> {
        validate_quantity(batch.quantity)?;
        let mut conn = self.pool.acquire().await?;
        insert_batch(&mut *conn, batch).await
    }

    /// Moves a whole batch to a new stage in place.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown id
    /// - `Domain(StageTransitionNotAllowed | TerminalStage)` per the lifecycle rules
    /// - `ConcurrentModification` when the row changed underneath
    /// - `Busy` when another writer held the database past `busy_timeout`
    pub async fn update_batch_stage(
        &self,
        batch_id: &str,
        new_stage: ProductionStage,
    ) -> DbResult<ProductionBatch> {
        let mut tx = begin_write(&self.pool).await?;

        let before = require_batch(&mut *tx, batch_id).await?;
        check_transition(&before, new_stage)?;

        let mut after = before.clone();
        after.current_stage = new_stage;
        after.updated_at = Utc::now();

        apply_advance(&mut *tx, &before, &after).await?;
        if let Some(order_id) = &after.order_id {
            refresh_status_on(&mut *tx, order_id).await?;
        }

        tx.commit().await?;

        info!(
            batch_id = %batch_id,
            from = %before.current_stage,
            to = %new_stage,
            quantity = after.quantity,
            "Batch advanced"
        );
        Ok(after)
    }

    /// Splits `new_batch.quantity` pieces off a batch into `new_batch`.
    ///
    /// The parent keeps `remainder_quantity` at its stage. `new_batch` must
    /// share the parent's origin, SKU and variant, and its stage must be a
    /// legal target for the parent.
    pub async fn split_batch(
        &self,
        batch_id: &str,
        remainder_quantity: i64,
        new_batch: &ProductionBatch,
    ) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        let parent = require_batch(&mut *tx, batch_id).await?;

        if remainder_quantity <= 0
            || new_batch.quantity <= 0
            || remainder_quantity.checked_add(new_batch.quantity) != Some(parent.quantity)
        {
            return Err(CoreError::InvalidSplitQuantity {
                batch_id: parent.id.clone(),
                available: parent.quantity,
                requested: new_batch.quantity,
            }
            .into());
        }

        if new_batch.origin_id != parent.origin_id
            || new_batch.sku != parent.sku
            || new_batch.variant_suffix != parent.variant_suffix
            || new_batch.order_id != parent.order_id
        {
            return Err(DbError::InvalidState(format!(
                "split child {} does not match parent {}",
                new_batch.id, parent.id
            )));
        }

        check_transition(&parent, new_batch.current_stage)?;

        let expected_total = origin_total_on(&mut *tx, &parent.origin_id).await?;

        let mut remainder = parent.clone();
        remainder.quantity = remainder_quantity;
        remainder.updated_at = Utc::now();

        apply_split(&mut *tx, &parent, &remainder, new_batch).await?;
        verify_origin_total(&mut *tx, &parent.origin_id, expected_total).await?;
        if let Some(order_id) = &parent.order_id {
            refresh_status_on(&mut *tx, order_id).await?;
        }

        tx.commit().await?;

        info!(
            batch_id = %batch_id,
            child_id = %new_batch.id,
            remainder = remainder_quantity,
            moved = new_batch.quantity,
            "Batch split"
        );
        Ok(())
    }

    /// Moves `quantity` pieces of a batch to `target`, splitting if partial.
    ///
    /// Reads, plans with the core lifecycle rules, writes and verifies the
    /// origin total inside one transaction.
    pub async fn move_stage(
        &self,
        batch_id: &str,
        target: ProductionStage,
        quantity: i64,
    ) -> DbResult<StageMove> {
        debug!(batch_id = %batch_id, target = %target, quantity, "Moving batch");

        let mut tx = begin_write(&self.pool).await?;

        let before = require_batch(&mut *tx, batch_id).await?;
        let expected_total = origin_total_on(&mut *tx, &before.origin_id).await?;

        let outcome = move_stage(&before, target, quantity, Utc::now())?;

        match &outcome {
            StageMove::Advanced { batch } => apply_advance(&mut *tx, &before, batch).await?,
            StageMove::Split { remainder, moved } => {
                apply_split(&mut *tx, &before, remainder, moved).await?
            }
        }

        verify_origin_total(&mut *tx, &before.origin_id, expected_total).await?;
        if let Some(order_id) = &before.order_id {
            refresh_status_on(&mut *tx, order_id).await?;
        }

        tx.commit().await?;

        info!(
            batch_id = %batch_id,
            from = %before.current_stage,
            to = %target,
            quantity,
            split = outcome.is_split(),
            "Batch moved"
        );
        Ok(outcome)
    }
}

// =============================================================================
// Connection-level helpers
// =============================================================================

pub(crate) async fn fetch_batch(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<ProductionBatch>> {
    let batch: Option<ProductionBatch> = sqlx::query_as(&format!(
        "SELECT {BATCH_COLUMNS} FROM production_batches WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(batch)
}

async fn require_batch(conn: &mut SqliteConnection, id: &str) -> DbResult<ProductionBatch> {
    fetch_batch(conn, id)
        .await?
        .ok_or_else(|| DbError::not_found("Batch", id))
}

pub(crate) async fn fetch_by_order(
    conn: &mut SqliteConnection,
    order_id: &str,
) -> DbResult<Vec<ProductionBatch>> {
    let batches: Vec<ProductionBatch> = sqlx::query_as(&format!(
        "SELECT {BATCH_COLUMNS} FROM production_batches \
         WHERE order_id = ?1 ORDER BY created_at, id"
    ))
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(batches)
}

pub(crate) async fn insert_batch(conn: &mut SqliteConnection, batch: &ProductionBatch) -> DbResult<()> {
    debug!(id = %batch.id, code = %batch.code(), quantity = batch.quantity, "Inserting batch");

    sqlx::query(
        r#"
        INSERT INTO production_batches (
            id, origin_id, sku, variant_suffix, quantity, current_stage,
            requires_setting, order_id, size_info, notes, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&batch.id)
    .bind(&batch.origin_id)
    .bind(&batch.sku)
    .bind(&batch.variant_suffix)
    .bind(batch.quantity)
    .bind(batch.current_stage)
    .bind(batch.requires_setting)
    .bind(&batch.order_id)
    .bind(&batch.size_info)
    .bind(&batch.notes)
    .bind(batch.created_at)
    .bind(batch.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn origin_total_on(conn: &mut SqliteConnection, origin_id: &str) -> DbResult<i64> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(quantity), 0) FROM production_batches WHERE origin_id = ?1",
    )
    .bind(origin_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(total)
}

/// In-place stage change, guarded on the values read earlier in the transaction.
async fn apply_advance(
    conn: &mut SqliteConnection,
    before: &ProductionBatch,
    after: &ProductionBatch,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE production_batches
        SET current_stage = ?2, updated_at = ?3
        WHERE id = ?1 AND quantity = ?4 AND current_stage = ?5
        "#,
    )
    .bind(&before.id)
    .bind(after.current_stage)
    .bind(after.updated_at)
    .bind(before.quantity)
    .bind(before.current_stage)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        warn!(batch_id = %before.id, "Batch changed during stage move");
        return Err(DbError::conflict("Batch", &before.id));
    }
    Ok(())
}

/// Decrements the parent and inserts the child.
async fn apply_split(
    conn: &mut SqliteConnection,
    before: &ProductionBatch,
    remainder: &ProductionBatch,
    moved: &ProductionBatch,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE production_batches
        SET quantity = ?2, updated_at = ?3
        WHERE id = ?1 AND quantity = ?4 AND current_stage = ?5
        "#,
    )
    .bind(&before.id)
    .bind(remainder.quantity)
    .bind(remainder.updated_at)
    .bind(before.quantity)
    .bind(before.current_stage)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        warn!(batch_id = %before.id, "Batch changed during split");
        return Err(DbError::conflict("Batch", &before.id));
    }

    insert_batch(conn, moved).await
}

async fn verify_origin_total(
    conn: &mut SqliteConnection,
    origin_id: &str,
    expected: i64,
) -> DbResult<()> {
    let actual = origin_total_on(conn, origin_id).await?;
    if actual != expected {
        error!(
            origin_id = %origin_id,
            expected,
            actual,
            "Quantity per origin changed during a stage move"
        );
        return Err(DbError::InvariantViolation {
            origin_id: origin_id.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::test_support::{product, seeded_db, stock_batch};
    use aurum_core::{Gender, ProductionPath};

    #[tokio::test]
    async fn test_split_persists_both_rows() {
        let db = seeded_db().await;
        let batch = stock_batch("DA050", "XKR", 10, ProductionPath::InHouse, true);
        db.batches().insert(&batch).await.unwrap();
        db.batches()
            .update_batch_stage(&batch.id, ProductionStage::Casting)
            .await
            .unwrap();

        let outcome = db
            .batches()
            .move_stage(&batch.id, ProductionStage::Polishing, 4)
            .await
            .unwrap();
        let StageMove::Split { remainder, moved } = outcome else {
            panic!("expected a split");
        };

        let parent = db.batches().get_by_id(&batch.id).await.unwrap().unwrap();
        assert_eq!(parent.quantity, 6);
        assert_eq!(parent.current_stage, ProductionStage::Casting);
        assert_eq!(parent.quantity, remainder.quantity);

        let child = db.batches().get_by_id(&moved.id).await.unwrap().unwrap();
        assert_eq!(child.quantity, 4);
        assert_eq!(child.current_stage, ProductionStage::Polishing);
        assert_eq!(child.origin_id, batch.id);
        assert_eq!(child.variant_suffix, "XKR");

        assert_eq!(db.batches().origin_total(&batch.id).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_origin_total_conserved_through_split_chain() {
        let db = seeded_db().await;
        let batch = stock_batch("DA050", "XKR", 12, ProductionPath::InHouse, true);
        db.batches().insert(&batch).await.unwrap();

        let repo = db.batches();
        let StageMove::Split { moved: first, .. } = repo
            .move_stage(&batch.id, ProductionStage::Casting, 5)
            .await
            .unwrap()
        else {
            panic!("expected a split");
        };
        let StageMove::Split { moved: second, .. } = repo
            .move_stage(&first.id, ProductionStage::Setting, 2)
            .await
            .unwrap()
        else {
            panic!("expected a split");
        };
        repo.move_stage(&second.id, ProductionStage::Ready, 2).await.unwrap();
        repo.move_stage(&batch.id, ProductionStage::Polishing, 7).await.unwrap();

        let rows = repo.list_by_origin(&batch.id).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, batch.id);
        assert!(rows.iter().all(|r| r.origin_id == batch.id));
        assert_eq!(rows.iter().map(|r| r.quantity).sum::<i64>(), 12);
        assert_eq!(repo.origin_total(&batch.id).await.unwrap(), 12);

        assert_eq!(repo.list_by_stage(ProductionStage::Ready).await.unwrap().len(), 1);
        assert_eq!(repo.list_by_stage(ProductionStage::Polishing).await.unwrap().len(), 1);
        assert_eq!(repo.list_by_stage(ProductionStage::Casting).await.unwrap()[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_rejected_moves_leave_rows_untouched() {
        let db = seeded_db().await;
        let batch = stock_batch("DA100", "X", 3, ProductionPath::InHouse, false);
        db.batches().insert(&batch).await.unwrap();
        let repo = db.batches();

        assert!(matches!(
            repo.move_stage(&batch.id, ProductionStage::Setting, 3).await,
            Err(DbError::Domain(CoreError::StageTransitionNotAllowed { .. }))
        ));
        assert!(matches!(
            repo.move_stage(&batch.id, ProductionStage::Casting, 4).await,
            Err(DbError::Domain(CoreError::InvalidSplitQuantity { .. }))
        ));
        assert!(matches!(
            repo.move_stage("missing", ProductionStage::Casting, 1).await,
            Err(DbError::NotFound { .. })
        ));

        let stored = repo.get_by_id(&batch.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 3);
        assert_eq!(stored.current_stage, ProductionStage::Waxing);
        assert_eq!(repo.list_by_origin(&batch.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_terminal_batch() {
        let db = seeded_db().await;
        let batch = stock_batch("MR220", "HEM", 2, ProductionPath::Imported, false);
        db.batches().insert(&batch).await.unwrap();
        let repo = db.batches();

        assert!(matches!(
            repo.update_batch_stage(&batch.id, ProductionStage::Waxing).await,
            Err(DbError::Domain(CoreError::StageTransitionNotAllowed { .. }))
        ));
        assert!(matches!(
            repo.update_batch_stage(&batch.id, ProductionStage::Ready).await,
            Err(DbError::Domain(CoreError::StageTransitionNotAllowed { .. }))
        ));
        repo.update_batch_stage(&batch.id, ProductionStage::Labeling).await.unwrap();
        repo.update_batch_stage(&batch.id, ProductionStage::Ready).await.unwrap();
        assert!(matches!(
            repo.move_stage(&batch.id, ProductionStage::Ready, 1).await,
            Err(DbError::Domain(CoreError::TerminalStage(_)))
        ));
    }

    #[tokio::test]
    async fn test_split_batch_guards() {
        let db = seeded_db().await;
        let batch = stock_batch("DA050", "XKR", 10, ProductionPath::InHouse, true);
        db.batches().insert(&batch).await.unwrap();
        let repo = db.batches();

        let mut child = batch.clone();
        child.id = uuid::Uuid::new_v4().to_string();
        child.quantity = 4;
        child.current_stage = ProductionStage::Casting;

        // Quantities must add up to the parent's
        assert!(matches!(
            repo.split_batch(&batch.id, 5, &child).await,
            Err(DbError::Domain(CoreError::InvalidSplitQuantity { .. }))
        ));

        // A sum past i64::MAX is rejected, not wrapped
        let mut huge = child.clone();
        huge.quantity = 2;
        assert!(matches!(
            repo.split_batch(&batch.id, i64::MAX, &huge).await,
            Err(DbError::Domain(CoreError::InvalidSplitQuantity { .. }))
        ));
        huge.quantity = i64::MAX;
        assert!(matches!(
            repo.split_batch(&batch.id, i64::MAX, &huge).await,
            Err(DbError::Domain(CoreError::InvalidSplitQuantity { .. }))
        ));

        // Child must descend from the same origin
        let mut stranger = child.clone();
        stranger.origin_id = stranger.id.clone();
        assert!(matches!(
            repo.split_batch(&batch.id, 6, &stranger).await,
            Err(DbError::InvalidState(_))
        ));

        repo.split_batch(&batch.id, 6, &child).await.unwrap();
        assert_eq!(repo.origin_total(&batch.id).await.unwrap(), 10);
        assert_eq!(repo.list_by_origin(&batch.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_guarded_update_detects_stale_read() {
        let db = seeded_db().await;
        let batch = stock_batch("DA050", "XKR", 5, ProductionPath::InHouse, true);
        db.batches().insert(&batch).await.unwrap();

        // Another writer moved the batch after `batch` was read
        db.batches()
            .update_batch_stage(&batch.id, ProductionStage::Casting)
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let mut stale_after = batch.clone();
        stale_after.current_stage = ProductionStage::Casting;
        let result = apply_advance(&mut *conn, &batch, &stale_after).await;
        assert!(matches!(result, Err(DbError::ConcurrentModification { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_moves_on_file_database() {
        let path = std::env::temp_dir().join(format!("aurum-{}.db", uuid::Uuid::new_v4()));
        let db = Database::new(DbConfig::new(path.clone()).max_connections(8)).await.unwrap();
        db.catalog()
            .upsert_product(&product("DA050", Gender::Women, ProductionPath::InHouse, true, &["XKR"]))
            .await
            .unwrap();
        let batch = stock_batch("DA050", "XKR", 10, ProductionPath::InHouse, true);
        db.batches().insert(&batch).await.unwrap();

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let repo = db.batches();
                let id = batch.id.clone();
                tokio::spawn(async move { repo.move_stage(&id, ProductionStage::Casting, 3).await })
            })
            .collect();

        let mut moved = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(outcome) => {
                    assert!(outcome.is_split());
                    moved += 3;
                }
                // Writers either wait their turn or report a retryable error,
                // never a raw query failure
                Err(err) => assert!(
                    err.is_retryable()
                        || matches!(err, DbError::Domain(CoreError::InvalidSplitQuantity { .. })),
                    "unexpected error: {err}"
                ),
            }
        }

        let repo = db.batches();
        assert!(moved > 0 && moved <= 9);
        assert_eq!(repo.origin_total(&batch.id).await.unwrap(), 10);
        let cast: i64 = repo
            .list_by_stage(ProductionStage::Casting)
            .await
            .unwrap()
            .iter()
            .map(|b| b.quantity)
            .sum();
        assert_eq!(cast, moved);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }

    #[tokio::test]
    async fn test_schema_rejects_empty_batch() {
        let db = seeded_db().await;
        let mut batch = stock_batch("DA100", "X", 1, ProductionPath::InHouse, false);
        batch.quantity = 0;

        // Bypasses the repository's own validation
        let mut conn = db.pool().acquire().await.unwrap();
        let result = insert_batch(&mut *conn, &batch).await;
        assert!(matches!(result, Err(DbError::CheckViolation { .. })));
        drop(conn);

        assert!(matches!(
            db.batches().insert(&batch).await,
            Err(DbError::Domain(_))
        ));
    }

    #[tokio::test]
    async fn test_stage_counts() {
        let db = seeded_db().await;
        let repo = db.batches();
        repo.insert(&stock_batch("DA050", "XKR", 5, ProductionPath::InHouse, true))
            .await
            .unwrap();
        repo.insert(&stock_batch("DA100", "X", 2, ProductionPath::InHouse, false))
            .await
            .unwrap();
        repo.insert(&stock_batch("MR220", "HEM", 3, ProductionPath::Imported, false))
            .await
            .unwrap();

        let counts = repo.stage_counts().await.unwrap();
        assert_eq!(
            counts,
            vec![
                StageCount {
                    stage: ProductionStage::AwaitingDelivery,
                    batches: 1,
                    pieces: 3
                },
                StageCount {
                    stage: ProductionStage::Waxing,
                    batches: 2,
                    pieces: 7
                },
            ]
        );
    }
}

//! # Order Repository
//!
//! Orders, their lines, and the status derived from their batches.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. create_order()          Order { Pending } + order_items             │
//! │  2. send_to_production()    batches inserted, Order { InProduction }    │
//! │  3. batch moves             refresh_status() after each commit          │
//! │                             → Ready once every batch is Ready           │
//! │  4. set_status(Delivered)   by hand; never derived away                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::batch::fetch_by_order;
use crate::repository::begin_write;
use aurum_core::validation::{validate_name, validate_order_lines, validate_quantity, validate_uuid};
use aurum_core::{derive_order_status, Order, OrderItem, OrderStatus};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    customer_name: String,
    status: OrderStatus,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    sku: String,
    variant_suffix: Option<String>,
    quantity: i64,
    size_info: Option<String>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            customer_name: self.customer_name,
            status: self.status,
            notes: self.notes,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            sku: row.sku,
            variant_suffix: row.variant_suffix,
            quantity: row.quantity,
            size_info: row.size_info,
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order and all its lines in one transaction.
    pub async fn create_order(&self, order: &Order) -> DbResult<()> {
        validate_uuid(&order.id)?;
        validate_name("customer_name", &order.customer_name)?;
        validate_order_lines(order.items.len())?;
        for item in &order.items {
            validate_quantity(item.quantity)?;
        }

        debug!(id = %order.id, lines = order.items.len(), "Creating order");

        let mut tx = begin_write(&self.pool).await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_name, status, notes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&order.id)
        .bind(&order.customer_name)
        .bind(order.status)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (index, item) in order.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, line_no, sku, variant_suffix, quantity, size_info)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&order.id)
            .bind(index as i64 + 1)
            .bind(&item.sku)
            .bind(&item.variant_suffix)
            .bind(item.quantity)
            .bind(&item.size_info)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets an order with its lines.
    pub async fn get_order(&self, id: &str) -> DbResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        fetch_order(&mut *conn, id).await
    }

    /// Sets an order's status by hand (Delivered, Cancelled, ...).
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(id = %id, status = %status, "Setting order status");

        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }
        Ok(())
    }

    /// Re-derives an order's status from its batches and stores it.
    pub async fn refresh_status(&self, id: &str) -> DbResult<OrderStatus> {
        let mut tx = begin_write(&self.pool).await?;
        let status = refresh_status_on(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(status)
    }

    /// Lists orders with a given status, oldest first.
    pub async fn list_by_status(&self, status: OrderStatus) -> DbResult<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, customer_name, status, notes, created_at, updated_at
            FROM orders
            WHERE status = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(status)
        .fetch_all(&mut *conn)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = fetch_items(&mut *conn, &row.id).await?;
            orders.push(row.into_order(items));
        }

        debug!(status = %status, count = orders.len(), "Listed orders");
        Ok(orders)
    }
}

// =============================================================================
// Connection-level helpers (shared with batch moves and the production service)
// =============================================================================

pub(crate) async fn fetch_order(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(
        r#"
        SELECT id, customer_name, status, notes, created_at, updated_at
        FROM orders
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let items = fetch_items(conn, id).await?;
            Ok(Some(row.into_order(items)))
        }
        None => Ok(None),
    }
}

async fn fetch_items(conn: &mut SqliteConnection, order_id: &str) -> DbResult<Vec<OrderItem>> {
    let rows: Vec<OrderItemRow> = sqlx::query_as(
        r#"
        SELECT sku, variant_suffix, quantity, size_info
        FROM order_items
        WHERE order_id = ?1
        ORDER BY line_no
        "#,
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(OrderItem::from).collect())
}

/// Derives and stores an order's status inside the caller's transaction.
pub(crate) async fn refresh_status_on(conn: &mut SqliteConnection, id: &str) -> DbResult<OrderStatus> {
    let current: Option<OrderStatus> = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    let current = current.ok_or_else(|| DbError::not_found("Order", id))?;

    let batches = fetch_by_order(conn, id).await?;
    let derived = derive_order_status(current, &batches);

    if derived != current {
        sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(derived)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;
        debug!(id = %id, from = %current, to = %derived, "Order status changed");
    }

    Ok(derived)
}

// =============================================================================
// Tests
// =============================================================================

//! # Catalog Repository
//!
//! Products and their variants, and loading them into the in-memory
//! [`Catalog`] the codec decodes against.
//!
//! The catalog is loaded once per screen/session and shared read-only;
//! edits go through this repository and a fresh `load_catalog`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::begin_write;
use aurum_core::validation::{validate_name, validate_price_cents, validate_sku, validate_variant_suffix};
use aurum_core::{Catalog, Gender, Product, ProductVariant, ProductionPath};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    sku: String,
    name: String,
    gender: Gender,
    production_path: ProductionPath,
    requires_setting: bool,
    price_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self, variants: Vec<ProductVariant>) -> Product {
        Product {
            sku: self.sku,
            name: self.name,
            gender: self.gender,
            production_path: self.production_path,
            requires_setting: self.requires_setting,
            price_cents: self.price_cents,
            variants,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    product_sku: String,
    suffix: String,
    description: Option<String>,
}

impl From<VariantRow> for ProductVariant {
    fn from(row: VariantRow) -> Self {
        ProductVariant {
            suffix: row.suffix,
            description: row.description,
        }
    }
}

const PRODUCT_COLUMNS: &str = "sku, name, gender, production_path, requires_setting, \
                               price_cents, created_at, updated_at";

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Inserts a product or updates it in place, adding any new variants.
    ///
    /// Existing variants are never removed here: batches may still
    /// reference them.
    pub async fn upsert_product(&self, product: &Product) -> DbResult<()> {
        validate_sku(&product.sku)?;
        validate_name("name", &product.name)?;
        validate_price_cents(product.price_cents)?;
        for variant in &product.variants {
            validate_variant_suffix(&variant.suffix)?;
        }

        debug!(sku = %product.sku, variants = product.variants.len(), "Upserting product");

        let mut tx = begin_write(&self.pool).await?;

        sqlx::query(
            r#"
            INSERT INTO products (
                sku, name, gender, production_path, requires_setting,
                price_cents, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8)
            ON CONFLICT(sku) DO UPDATE SET
                name = excluded.name,
                gender = excluded.gender,
                production_path = excluded.production_path,
                requires_setting = excluded.requires_setting,
                price_cents = excluded.price_cents,
                is_active = 1,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.gender)
        .bind(product.production_path)
        .bind(product.requires_setting)
        .bind(product.price_cents)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        for variant in &product.variants {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO product_variants (product_sku, suffix, description, created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&product.sku)
            .bind(&variant.suffix)
            .bind(&variant.description)
            .bind(product.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Adds a variant to an existing product.
    ///
    /// ## Errors
    /// - `NotFound` when the product does not exist
    /// - `UniqueViolation` when the suffix already exists for the product
    pub async fn add_variant(
        &self,
        sku: &str,
        suffix: &str,
        description: Option<&str>,
    ) -> DbResult<ProductVariant> {
        validate_variant_suffix(suffix)?;

        debug!(sku = %sku, suffix = %suffix, "Adding variant");

        let result = sqlx::query(
            r#"
            INSERT INTO product_variants (product_sku, suffix, description, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(sku)
        .bind(suffix)
        .bind(description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(ProductVariant {
                suffix: suffix.to_string(),
                description: description.map(str::to_string),
            }),
            Err(e) => match DbError::from(e) {
                DbError::UniqueViolation { .. } => {
                    Err(DbError::duplicate("variant", format!("{sku}{suffix}")))
                }
                DbError::ForeignKeyViolation { .. } => Err(DbError::not_found("Product", sku)),
                other => Err(other),
            },
        }
    }

    /// Gets an active product with its variants.
    pub async fn get_product(&self, sku: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1 AND is_active = 1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let variants: Vec<VariantRow> = sqlx::query_as(
            r#"
            SELECT product_sku, suffix, description
            FROM product_variants
            WHERE product_sku = ?1
            ORDER BY suffix
            "#,
        )
        .bind(sku)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_product(
            variants.into_iter().map(ProductVariant::from).collect(),
        )))
    }

    /// Loads every active product and its variants into a [`Catalog`].
    pub async fn load_catalog(&self) -> DbResult<Catalog> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1"
        ))
        .fetch_all(&self.pool)
        .await?;

        let variant_rows: Vec<VariantRow> = sqlx::query_as(
            r#"
            SELECT v.product_sku, v.suffix, v.description
            FROM product_variants v
            INNER JOIN products p ON p.sku = v.product_sku
            WHERE p.is_active = 1
            ORDER BY v.product_sku, v.suffix
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut variants: HashMap<String, Vec<ProductVariant>> = HashMap::new();
        for row in variant_rows {
            variants
                .entry(row.product_sku.clone())
                .or_default()
                .push(row.into());
        }

        let catalog: Catalog = rows
            .into_iter()
            .map(|row| {
                let own = variants.remove(&row.sku).unwrap_or_default();
                row.into_product(own)
            })
            .collect();

        debug!(products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Hides a product from the catalog. Its batches keep their SKU.
    pub async fn deactivate(&self, sku: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE sku = ?1")
            .bind(sku)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", sku));
        }
        Ok(())
    }

    /// Counts active products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::test_support::product;

    #[tokio::test]
    async fn test_upsert_and_load_catalog() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();

        repo.upsert_product(&product("DA10", Gender::Women, ProductionPath::InHouse, true, &["X"]))
            .await
            .unwrap();
        repo.upsert_product(&product("DA100", Gender::Women, ProductionPath::InHouse, false, &["X", "XKRX"]))
            .await
            .unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);

        let catalog = repo.load_catalog().await.unwrap();
        assert_eq!(catalog.len(), 2);
        let decoded = aurum_core::decode("DA100XKRX", &catalog).unwrap();
        assert_eq!(decoded.master, "DA100");
        assert_eq!(decoded.stone.code, "KRX");
        assert!(catalog.get("DA100").unwrap().has_variant("XKRX"));
    }

    #[tokio::test]
    async fn test_upsert_keeps_existing_variants() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();

        repo.upsert_product(&product("MR220", Gender::Men, ProductionPath::Imported, false, &["HEM"]))
            .await
            .unwrap();
        let mut renamed = product("MR220", Gender::Men, ProductionPath::Imported, false, &["XONX"]);
        renamed.name = "Signet ring".to_string();
        repo.upsert_product(&renamed).await.unwrap();

        let stored = repo.get_product("MR220").await.unwrap().unwrap();
        assert_eq!(stored.name, "Signet ring");
        let suffixes: Vec<&str> = stored.variants.iter().map(|v| v.suffix.as_str()).collect();
        assert_eq!(suffixes, vec!["HEM", "XONX"]);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_variant_errors() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();
        repo.upsert_product(&product("DA050", Gender::Women, ProductionPath::InHouse, true, &["XKR"]))
            .await
            .unwrap();

        let variant = repo.add_variant("DA050", "PPRL", Some("Patina + pearl")).await.unwrap();
        assert_eq!(variant.suffix, "PPRL");

        assert!(matches!(
            repo.add_variant("DA050", "XKR", None).await,
            Err(DbError::UniqueViolation { .. })
        ));
        assert!(matches!(
            repo.add_variant("ZZ999", "X", None).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.add_variant("DA050", "x1", None).await,
            Err(DbError::Domain(_))
        ));
    }

    #[tokio::test]
    async fn test_deactivated_product_leaves_catalog() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();
        repo.upsert_product(&product("DA050", Gender::Women, ProductionPath::InHouse, true, &[]))
            .await
            .unwrap();

        repo.deactivate("DA050").await.unwrap();
        assert!(repo.get_product("DA050").await.unwrap().is_none());
        assert!(repo.load_catalog().await.unwrap().is_empty());
        assert!(repo.deactivate("ZZ999").await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_product_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let bad = product("DA-050", Gender::Women, ProductionPath::InHouse, false, &[]);
        assert!(matches!(
            db.catalog().upsert_product(&bad).await,
            Err(DbError::Domain(_))
        ));
    }

    #[tokio::test]
    async fn test_lowercase_master_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let lower = product("da050", Gender::Women, ProductionPath::InHouse, false, &["X"]);
        assert!(matches!(
            db.catalog().upsert_product(&lower).await,
            Err(DbError::Domain(_))
        ));
        assert_eq!(db.catalog().count().await.unwrap(), 0);

        // The accepted spelling decodes from any typed case
        let upper = product("DA050", Gender::Women, ProductionPath::InHouse, false, &["X"]);
        db.catalog().upsert_product(&upper).await.unwrap();
        let catalog = db.catalog().load_catalog().await.unwrap();
        let code = aurum_core::encode("DA050", "X", "");
        assert_eq!(aurum_core::decode(&code, &catalog).unwrap().master, "DA050");
        assert_eq!(aurum_core::decode("da050x", &catalog).unwrap().master, "DA050");
    }
}

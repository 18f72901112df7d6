//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD for the catalog screen
//! - Name/category search for the catalog and POS screens
//! - Stock reads and absolute stock writes for the checkout sequence
//!
//! ## Stock Write Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Checkout re-reads the current stock and writes back an absolute    │
//! │  value (stock − qty for sales, stock + qty for purchases).          │
//! │                                                                     │
//! │  There is NO locking between the read and the write: two            │
//! │  registers checking out the same product at once can lose one       │
//! │  of the two updates (last writer wins). This is a known,            │
//! │  accepted limitation of the current design.                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use khalkhal_core::{Product, StockLevel};

const PRODUCT_COLUMNS: &str =
    "id, name, category, price_cents, cost_cents, stock, min_stock, image_url, \
     created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, optionally filtered by a search term.
    ///
    /// The catalog screen filters by name or category; an empty or absent
    /// term returns the whole catalog ordered by name.
    pub async fn list(&self, search: Option<&str>) -> DbResult<Vec<Product>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        debug!(search = ?search, "Listing products");

        let products = match search {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE name LIKE ? OR category LIKE ? \
                     ORDER BY name"
                ))
                .bind(&pattern)
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(count = products.len(), "Products listed");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, name, category, price_cents, cost_cents,
                stock, min_stock, image_url, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(&product.image_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET
                name = ?,
                category = ?,
                price_cents = ?,
                cost_cents = ?,
                stock = ?,
                min_stock = ?,
                image_url = ?,
                updated_at = ?
            WHERE id = ?",
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(&product.image_url)
        .bind(now)
        .bind(&product.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Hard delete: invoice items keep their snapshot of the product, so
    /// history survives the deletion.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Reads the current stock level of a product.
    ///
    /// Returns `None` when the product no longer exists (checkout skips
    /// the stock step for such lines instead of failing).
    pub async fn get_stock(&self, id: &str) -> DbResult<Option<i64>> {
        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(stock)
    }

    /// Writes an absolute stock level.
    ///
    /// Unlocked read-then-write: the caller computed this value from a
    /// stock figure it read moments ago, and a concurrent checkout may
    /// have changed it since. Last writer wins.
    pub async fn set_stock(&self, id: &str, stock: i64) -> DbResult<()> {
        debug!(id = %id, stock = %stock, "Writing stock level");

        let now = Utc::now();

        let result = sqlx::query("UPDATE products SET stock = ?, updated_at = ? WHERE id = ?")
            .bind(stock)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Fetches the (stock, min_stock) projection for the dashboard.
    pub async fn list_stock_levels(&self) -> DbResult<Vec<StockLevel>> {
        let levels = sqlx::query_as::<_, StockLevel>("SELECT stock, min_stock FROM products")
            .fetch_all(&self.pool)
            .await?;

        Ok(levels)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

//! # Invoice Repository
//!
//! Database operations for invoices and their line items.
//!
//! ## Snapshot Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  invoices                       invoice_items                       │
//! │  ┌───────────────────┐          ┌───────────────────────┐           │
//! │  │ partner_id (loose)│          │ invoice_id (FK) ──────┼──┐        │
//! │  │ partner_name snap │          │ product_id (loose)    │  │        │
//! │  │ totals in cents   │          │ product_name snap     │  │        │
//! │  └───────────────────┘          │ price/cost snap       │  │        │
//! │          ▲                      └───────────────────────┘  │        │
//! │          └─────────────────────────────────────────────────┘        │
//! │                                                                     │
//! │  Only invoice_id is a real foreign key (ON DELETE CASCADE).         │
//! │  Product and partner references are snapshots: deleting the         │
//! │  source record never touches the invoice history.                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use khalkhal_core::{Invoice, InvoiceItem, InvoiceSummary};

const INVOICE_COLUMNS: &str =
    "id, date, kind, partner_id, partner_name, subtotal_cents, discount_cents, \
     final_cents, paid_cents, remaining_cents, status";

const ITEM_COLUMNS: &str =
    "id, invoice_id, product_id, product_name, quantity, price_cents, cost_cents";

/// An invoice together with its line items, as the history screen shows it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InvoiceWithItems {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Inserts an invoice header.
    pub async fn insert_invoice(&self, invoice: &Invoice) -> DbResult<()> {
        debug!(id = %invoice.id, kind = ?invoice.kind, "Inserting invoice");

        sqlx::query(
            "INSERT INTO invoices (
                id, date, kind, partner_id, partner_name,
                subtotal_cents, discount_cents, final_cents,
                paid_cents, remaining_cents, status
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&invoice.id)
        .bind(invoice.date)
        .bind(invoice.kind)
        .bind(&invoice.partner_id)
        .bind(&invoice.partner_name)
        .bind(invoice.subtotal_cents)
        .bind(invoice.discount_cents)
        .bind(invoice.final_cents)
        .bind(invoice.paid_cents)
        .bind(invoice.remaining_cents)
        .bind(invoice.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a single line item.
    pub async fn insert_item(&self, item: &InvoiceItem) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO invoice_items (
                id, invoice_id, product_id, product_name,
                quantity, price_cents, cost_cents
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.invoice_id)
        .bind(&item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.price_cents)
        .bind(item.cost_cents)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an invoice header by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets the line items of an invoice.
    pub async fn get_items(&self, invoice_id: &str) -> DbResult<Vec<InvoiceItem>> {
        let items = sqlx::query_as::<_, InvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = ?"
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists all invoices with their items, newest first.
    ///
    /// The history screen shows the full list; a single shop produces a
    /// volume where loading everything is fine.
    pub async fn list_with_items(&self) -> DbResult<Vec<InvoiceWithItems>> {
        debug!("Listing invoices with items");

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(invoices.len());
        for invoice in invoices {
            let items = self.get_items(&invoice.id).await?;
            result.push(InvoiceWithItems { invoice, items });
        }

        debug!(count = result.len(), "Invoices listed");
        Ok(result)
    }

    /// Fetches the (kind, final_cents, date) projection for the dashboard.
    pub async fn list_summaries(&self) -> DbResult<Vec<InvoiceSummary>> {
        let summaries = sqlx::query_as::<_, InvoiceSummary>(
            "SELECT kind, final_cents, date FROM invoices",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Counts invoices (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new invoice ID.
pub fn generate_invoice_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new invoice item ID.
pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}

//! # Checkout Service
//!
//! The invoice creation sequence, the only multi-step mutation in the
//! system.
//!
//! ## Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  create_invoice(request)                            │
//! │                                                                     │
//! │  1. Compute totals from the cart (subtotal, final, remaining,       │
//! │     derived status)                                                 │
//! │  2. INSERT invoices row (snapshot of partner name + amounts)        │
//! │  3. INSERT one invoice_items row per cart line                      │
//! │  4. Per line: read stock, write stock ∓ quantity                    │
//! │  5. If a partner was selected: read balance, write                  │
//! │     balance ± remaining                                             │
//! │                                                                     │
//! │  The steps are NOT wrapped in a transaction. A failure after        │
//! │  step 2 leaves an invoice without items or stock effects; there     │
//! │  is no compensating rollback. Steps 4 and 5 are unlocked            │
//! │  read-then-write and can lose updates under concurrent checkouts.   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sign Conventions
//! - Sale: stock − quantity, partner balance + remaining (customer debt)
//! - Purchase: stock + quantity, partner balance − remaining (shop debt)

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::invoice::{generate_invoice_id, generate_item_id, InvoiceWithItems};
use khalkhal_core::validation::validate_quantity;
use khalkhal_core::{Cart, CartItem, CoreError, Invoice, InvoiceItem, TransactionKind};

/// Checkout failure.
///
/// Business rule violations (empty cart) and storage failures surface
/// through the same type so callers handle one error path.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Everything the register sends when the cashier confirms a payment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Sale or purchase.
    pub kind: TransactionKind,

    /// The cart lines as built on the POS screen.
    pub items: Vec<CartItem>,

    /// Selected partner, if any. Walk-in sales leave this empty.
    #[serde(default)]
    pub partner_id: Option<String>,

    /// Display name snapshot for the invoice. The register sends the
    /// selected partner's name, or a free-text label for walk-ins.
    #[serde(default)]
    pub partner_name: String,

    /// Whole-invoice discount in cents.
    #[serde(default)]
    pub discount_cents: i64,

    /// Amount paid at the register in cents.
    #[serde(default)]
    pub paid_cents: i64,
}

/// Executes the invoice creation sequence.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    db: Database,
}

impl CheckoutService {
    /// Creates a new CheckoutService.
    pub fn new(db: Database) -> Self {
        CheckoutService { db }
    }

    /// Runs the full checkout sequence and returns the created invoice
    /// with its items, ready for the receipt.
    pub async fn create_invoice(
        &self,
        request: CheckoutRequest,
    ) -> Result<InvoiceWithItems, CheckoutError> {
        let cart = Cart {
            items: request.items,
        };
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        // The register UI caps quantities, but the payload arrives over
        // the wire and is checked again here.
        for line in &cart.items {
            validate_quantity(line.quantity).map_err(CoreError::from)?;
        }

        let totals = cart.totals(request.kind, request.discount_cents, request.paid_cents);

        let invoice = Invoice {
            id: generate_invoice_id(),
            date: Utc::now(),
            kind: request.kind,
            partner_id: request.partner_id.clone(),
            partner_name: request.partner_name.clone(),
            subtotal_cents: totals.subtotal_cents,
            discount_cents: totals.discount_cents,
            final_cents: totals.final_cents,
            paid_cents: totals.paid_cents,
            remaining_cents: totals.remaining_cents,
            status: totals.status,
        };

        info!(
            id = %invoice.id,
            kind = ?invoice.kind,
            final_cents = invoice.final_cents,
            status = ?invoice.status,
            "Creating invoice"
        );

        // Step 2: invoice header.
        self.db.invoices().insert_invoice(&invoice).await?;

        // Step 3: line items, denormalized from the cart snapshots.
        let mut items = Vec::with_capacity(cart.items.len());
        for line in &cart.items {
            let item = InvoiceItem {
                id: generate_item_id(),
                invoice_id: invoice.id.clone(),
                product_id: line.product_id.clone(),
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                price_cents: line.price_cents,
                cost_cents: line.cost_cents,
            };
            self.db.invoices().insert_item(&item).await?;
            items.push(item);
        }

        // Step 4: stock adjustments, one unlocked read-then-write per line.
        for line in &cart.items {
            self.apply_stock_delta(&line.product_id, request.kind, line.quantity)
                .await?;
        }

        // Step 5: partner balance, if a partner was selected.
        if let Some(partner_id) = &request.partner_id {
            self.apply_balance_delta(partner_id, request.kind, totals.remaining_cents)
                .await?;
        }

        info!(id = %invoice.id, items = items.len(), "Invoice created");

        Ok(InvoiceWithItems { invoice, items })
    }

    /// Re-reads the product's stock and writes back the adjusted value.
    ///
    /// A sale may drive the stock negative; nothing prevents overselling.
    /// A line whose product was deleted since it entered the cart is
    /// skipped, the invoice item still records the snapshot.
    async fn apply_stock_delta(
        &self,
        product_id: &str,
        kind: TransactionKind,
        quantity: i64,
    ) -> DbResult<()> {
        let products = self.db.products();

        match products.get_stock(product_id).await? {
            Some(stock) => {
                let new_stock = match kind {
                    TransactionKind::Sale => stock - quantity,
                    TransactionKind::Purchase => stock + quantity,
                };
                debug!(
                    product_id = %product_id,
                    from = stock,
                    to = new_stock,
                    "Adjusting stock"
                );
                products.set_stock(product_id, new_stock).await
            }
            None => {
                warn!(product_id = %product_id, "Product gone, skipping stock adjustment");
                Ok(())
            }
        }
    }

    /// Re-reads the partner's balance and writes back the adjusted value.
    ///
    /// Sales add the remaining amount (the customer now owes it);
    /// purchases subtract it (the shop now owes the supplier).
    async fn apply_balance_delta(
        &self,
        partner_id: &str,
        kind: TransactionKind,
        remaining_cents: i64,
    ) -> DbResult<()> {
        let partners = self.db.partners();

        match partners.get_balance(partner_id).await? {
            Some(balance) => {
                let delta = match kind {
                    TransactionKind::Sale => remaining_cents,
                    TransactionKind::Purchase => -remaining_cents,
                };
                debug!(
                    partner_id = %partner_id,
                    from = balance,
                    to = balance + delta,
                    "Adjusting partner balance"
                );
                partners.set_balance(partner_id, balance + delta).await
            }
            None => {
                warn!(partner_id = %partner_id, "Partner gone, skipping balance adjustment");
                Ok(())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use khalkhal_core::{Partner, PartnerRole, PaymentStatus, Product};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn test_product(id: &str, price_cents: i64, cost_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("صندل {}", id),
            category: "صنادل".to_string(),
            price_cents,
            cost_cents,
            stock,
            min_stock: 2,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_partner(id: &str, role: PartnerRole, balance_cents: i64) -> Partner {
        Partner {
            id: id.to_string(),
            name: "شريك تجريبي".to_string(),
            phone: "01000000000".to_string(),
            role,
            balance_cents,
            created_at: Utc::now(),
        }
    }

    fn lines_for(product: &Product, quantity: i64) -> Vec<CartItem> {
        let mut cart = Cart::new();
        cart.add_item(product, quantity).unwrap();
        cart.items
    }

    #[tokio::test]
    async fn test_sale_decrements_stock() {
        let db = test_db().await;
        let product = test_product("p1", 10000, 7000, 10);
        db.products().insert(&product).await.unwrap();

        let request = CheckoutRequest {
            kind: TransactionKind::Sale,
            items: lines_for(&product, 3),
            partner_id: None,
            partner_name: "زبون نقدي".to_string(),
            discount_cents: 0,
            paid_cents: 30000,
        };
        db.checkout().create_invoice(request).await.unwrap();

        assert_eq!(db.products().get_stock("p1").await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_sale_can_drive_stock_negative() {
        let db = test_db().await;
        let product = test_product("p1", 10000, 7000, 2);
        db.products().insert(&product).await.unwrap();

        let request = CheckoutRequest {
            kind: TransactionKind::Sale,
            items: lines_for(&product, 5),
            partner_id: None,
            partner_name: "زبون نقدي".to_string(),
            discount_cents: 0,
            paid_cents: 50000,
        };
        db.checkout().create_invoice(request).await.unwrap();

        assert_eq!(db.products().get_stock("p1").await.unwrap(), Some(-3));
    }

    #[tokio::test]
    async fn test_purchase_increments_stock() {
        let db = test_db().await;
        let product = test_product("p1", 10000, 7000, 10);
        db.products().insert(&product).await.unwrap();

        let request = CheckoutRequest {
            kind: TransactionKind::Purchase,
            items: lines_for(&product, 4),
            partner_id: None,
            partner_name: "مورد".to_string(),
            discount_cents: 0,
            paid_cents: 28000,
        };
        db.checkout().create_invoice(request).await.unwrap();

        assert_eq!(db.products().get_stock("p1").await.unwrap(), Some(14));
    }

    /// The worked register example: LE 100 × 2, LE 50 discount, LE 100
    /// paid, partner selected. Remaining 50 lands on the balance.
    #[tokio::test]
    async fn test_sale_remaining_lands_on_customer_balance() {
        let db = test_db().await;
        let product = test_product("p1", 10000, 7000, 10);
        db.products().insert(&product).await.unwrap();
        let partner = test_partner("c1", PartnerRole::Customer, 2000);
        db.partners().insert(&partner).await.unwrap();

        let request = CheckoutRequest {
            kind: TransactionKind::Sale,
            items: lines_for(&product, 2),
            partner_id: Some("c1".to_string()),
            partner_name: partner.name.clone(),
            discount_cents: 5000,
            paid_cents: 10000,
        };
        let receipt = db.checkout().create_invoice(request).await.unwrap();

        assert_eq!(receipt.invoice.subtotal_cents, 20000);
        assert_eq!(receipt.invoice.final_cents, 15000);
        assert_eq!(receipt.invoice.remaining_cents, 5000);
        assert_eq!(receipt.invoice.status, PaymentStatus::Partial);

        assert_eq!(db.partners().get_balance("c1").await.unwrap(), Some(7000));
    }

    #[tokio::test]
    async fn test_purchase_remaining_subtracts_from_supplier_balance() {
        let db = test_db().await;
        let product = test_product("p1", 10000, 7000, 10);
        db.products().insert(&product).await.unwrap();
        let partner = test_partner("s1", PartnerRole::Supplier, 0);
        db.partners().insert(&partner).await.unwrap();

        let request = CheckoutRequest {
            kind: TransactionKind::Purchase,
            items: lines_for(&product, 1),
            partner_id: Some("s1".to_string()),
            partner_name: partner.name.clone(),
            discount_cents: 0,
            paid_cents: 2000,
        };
        db.checkout().create_invoice(request).await.unwrap();

        // Cost 7000, paid 2000, remaining 5000 owed to the supplier.
        assert_eq!(db.partners().get_balance("s1").await.unwrap(), Some(-5000));
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let db = test_db().await;

        let request = CheckoutRequest {
            kind: TransactionKind::Sale,
            items: Vec::new(),
            partner_id: None,
            partner_name: "زبون نقدي".to_string(),
            discount_cents: 0,
            paid_cents: 0,
        };
        let result = db.checkout().create_invoice(request).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Core(CoreError::EmptyCart))
        ));
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_quantity_rejected() {
        let db = test_db().await;
        let product = test_product("p1", 10000, 7000, 10);
        db.products().insert(&product).await.unwrap();

        // Bypasses the cart caps the way a hand-crafted payload would.
        let line = CartItem {
            product_id: "p1".to_string(),
            product_name: product.name.clone(),
            price_cents: product.price_cents,
            cost_cents: product.cost_cents,
            quantity: 0,
        };
        let request = CheckoutRequest {
            kind: TransactionKind::Sale,
            items: vec![line],
            partner_id: None,
            partner_name: "زبون نقدي".to_string(),
            discount_cents: 0,
            paid_cents: 0,
        };
        let result = db.checkout().create_invoice(request).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Core(CoreError::Validation(_)))
        ));
        assert_eq!(db.invoices().count().await.unwrap(), 0);
        assert_eq!(db.products().get_stock("p1").await.unwrap(), Some(10));
    }

    #[tokio::test]
    async fn test_deleted_product_line_is_skipped() {
        let db = test_db().await;
        let product = test_product("p1", 10000, 7000, 10);
        // Not inserted: simulates a product deleted after entering the cart.

        let request = CheckoutRequest {
            kind: TransactionKind::Sale,
            items: lines_for(&product, 2),
            partner_id: None,
            partner_name: "زبون نقدي".to_string(),
            discount_cents: 0,
            paid_cents: 20000,
        };
        let receipt = db.checkout().create_invoice(request).await.unwrap();

        // The invoice and its snapshot line still exist.
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].product_name, "صندل p1");
        assert_eq!(db.invoices().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invoice_items_snapshot_survives_product_edit() {
        let db = test_db().await;
        let mut product = test_product("p1", 10000, 7000, 10);
        db.products().insert(&product).await.unwrap();

        let request = CheckoutRequest {
            kind: TransactionKind::Sale,
            items: lines_for(&product, 1),
            partner_id: None,
            partner_name: "زبون نقدي".to_string(),
            discount_cents: 0,
            paid_cents: 10000,
        };
        let receipt = db.checkout().create_invoice(request).await.unwrap();

        product.price_cents = 99999;
        product.name = "اسم جديد".to_string();
        db.products().update(&product).await.unwrap();

        let items = db.invoices().get_items(&receipt.invoice.id).await.unwrap();
        assert_eq!(items[0].price_cents, 10000);
        assert_eq!(items[0].product_name, "صندل p1");
    }

    #[tokio::test]
    async fn test_list_with_items_newest_first() {
        let db = test_db().await;
        let product = test_product("p1", 10000, 7000, 10);
        db.products().insert(&product).await.unwrap();

        for paid in [10000, 0] {
            let request = CheckoutRequest {
                kind: TransactionKind::Sale,
                items: lines_for(&product, 1),
                partner_id: None,
                partner_name: "زبون نقدي".to_string(),
                discount_cents: 0,
                paid_cents: paid,
            };
            db.checkout().create_invoice(request).await.unwrap();
        }

        let invoices = db.invoices().list_with_items().await.unwrap();
        assert_eq!(invoices.len(), 2);
        assert!(invoices[0].invoice.date >= invoices[1].invoice.date);
        assert_eq!(invoices[0].items.len(), 1);
    }
}

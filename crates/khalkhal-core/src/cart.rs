//! # Cart Module
//!
//! The point-of-sale cart and its checkout arithmetic.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Cart Operations                                 │
//! │                                                                     │
//! │  Screen Action            Cart Method             State Change      │
//! │  ─────────────            ───────────             ────────────      │
//! │  Click Product ─────────► add_item() ───────────► merge or push     │
//! │  Change Quantity ───────► update_quantity() ────► qty = n (0 drops) │
//! │  Click Remove ──────────► remove_item() ────────► items.remove(i)   │
//! │  Checkout ──────────────► totals() ─────────────► (read only)       │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pricing Rule
//! A sale invoice prices each line at the product's sale price; a purchase
//! invoice prices it at the product's cost. The discount applies to the
//! whole invoice and the final amount is clamped at zero.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;
use crate::types::{PaymentStatus, Product, TransactionKind};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// ## Design Notes
/// Both the sale price and the cost are frozen when the product is added,
/// so a product edit mid-transaction cannot change a line already in the
/// cart. The same snapshot lands on the invoice item at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product ID (UUID).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub product_name: String,

    /// Sale price in cents at time of adding (frozen).
    pub price_cents: i64,

    /// Unit cost in cents at time of adding (frozen).
    pub cost_cents: i64,

    /// Quantity in the cart.
    pub quantity: i64,
}

impl CartItem {
    /// Creates a cart line from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            price_cents: product.price_cents,
            cost_cents: product.cost_cents,
            quantity,
        }
    }

    /// The unit amount this line contributes per piece: sale price for
    /// sales, cost for purchases.
    #[inline]
    pub fn unit_cents(&self, kind: TransactionKind) -> i64 {
        match kind {
            TransactionKind::Sale => self.price_cents,
            TransactionKind::Purchase => self.cost_cents,
        }
    }

    /// Line total (unit × quantity) for the given transaction kind.
    #[inline]
    pub fn line_total_cents(&self, kind: TransactionKind) -> i64 {
        self.unit_cents(kind) * self.quantity
    }
}

// =============================================================================
// Checkout Totals
// =============================================================================

/// The amounts and derived status for an invoice about to be created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTotals {
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    /// max(0, subtotal − discount).
    pub final_cents: i64,
    pub paid_cents: i64,
    /// final − paid. Negative when the customer over-pays.
    pub remaining_cents: i64,
    pub status: PaymentStatus,
}

// =============================================================================
// Cart
// =============================================================================

/// The POS cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges
///   quantities)
/// - Quantity is always > 0 (updating to 0 removes the line)
/// - At most [`MAX_CART_ITEMS`] lines, [`MAX_ITEM_QUANTITY`] per line
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds a product to the cart or increases quantity if already present.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<(), CoreError> {
        if quantity <= 0 || quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of a line. A quantity of 0 removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), CoreError> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        if quantity < 0 || quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::ProductNotInCart(product_id.to_string())),
        }
    }

    /// Removes a line from the cart by product ID.
    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CoreError> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::ProductNotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Subtotal for the given transaction kind.
    pub fn subtotal_cents(&self, kind: TransactionKind) -> i64 {
        self.items.iter().map(|i| i.line_total_cents(kind)).sum()
    }

    /// Computes the full checkout amounts for this cart.
    ///
    /// ## Arithmetic
    /// ```text
    /// subtotal  = Σ unit(kind) × quantity
    /// final     = max(0, subtotal − discount)
    /// remaining = final − paid
    /// status    = derived from (remaining, paid)
    /// ```
    pub fn totals(
        &self,
        kind: TransactionKind,
        discount_cents: i64,
        paid_cents: i64,
    ) -> CheckoutTotals {
        let subtotal = Money::from_cents(self.subtotal_cents(kind));
        let final_amount = subtotal.less_discount(Money::from_cents(discount_cents));
        let remaining = final_amount.cents() - paid_cents;

        CheckoutTotals {
            subtotal_cents: subtotal.cents(),
            discount_cents,
            final_cents: final_amount.cents(),
            paid_cents,
            remaining_cents: remaining,
            status: PaymentStatus::from_amounts(remaining, paid_cents),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_product(id: &str, price_cents: i64, cost_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            category: "أحذية".to_string(),
            price_cents,
            cost_cents,
            stock: 10,
            min_stock: 2,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 600);

        cart.add_item(&product, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal_cents(TransactionKind::Sale), 1998);
        assert_eq!(cart.subtotal_cents(TransactionKind::Purchase), 1200);
    }

    #[test]
    fn test_cart_add_same_product_merges() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 600);

        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 600);

        cart.add_item(&product, 2).unwrap();
        cart.update_quantity("1", 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_remove_missing_product_fails() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.remove_item("nope"),
            Err(CoreError::ProductNotInCart(_))
        ));
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        let product = test_product("1", 999, 600);
        assert!(cart.add_item(&product, MAX_ITEM_QUANTITY + 1).is_err());

        cart.add_item(&product, MAX_ITEM_QUANTITY).unwrap();
        assert!(cart.add_item(&product, 1).is_err());
    }

    /// The worked register example: one product at LE 100 × 2, LE 50
    /// discount, LE 100 paid.
    #[test]
    fn test_checkout_totals_partial_payment() {
        let mut cart = Cart::new();
        let product = test_product("1", 10000, 7000);
        cart.add_item(&product, 2).unwrap();

        let totals = cart.totals(TransactionKind::Sale, 5000, 10000);

        assert_eq!(totals.subtotal_cents, 20000);
        assert_eq!(totals.final_cents, 15000);
        assert_eq!(totals.remaining_cents, 5000);
        assert_eq!(totals.status, PaymentStatus::Partial);
    }

    #[test]
    fn test_checkout_totals_discount_clamps() {
        let mut cart = Cart::new();
        let product = test_product("1", 1000, 700);
        cart.add_item(&product, 1).unwrap();

        let totals = cart.totals(TransactionKind::Sale, 5000, 0);
        assert_eq!(totals.final_cents, 0);
        assert_eq!(totals.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_checkout_totals_purchase_uses_cost() {
        let mut cart = Cart::new();
        let product = test_product("1", 10000, 7000);
        cart.add_item(&product, 3).unwrap();

        let totals = cart.totals(TransactionKind::Purchase, 0, 21000);
        assert_eq!(totals.subtotal_cents, 21000);
        assert_eq!(totals.remaining_cents, 0);
        assert_eq!(totals.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_checkout_totals_unpaid() {
        let mut cart = Cart::new();
        let product = test_product("1", 10000, 7000);
        cart.add_item(&product, 1).unwrap();

        let totals = cart.totals(TransactionKind::Sale, 0, 0);
        assert_eq!(totals.status, PaymentStatus::Unpaid);
    }
}

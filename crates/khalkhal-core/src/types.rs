//! # Domain Types
//!
//! Core domain types used throughout Khalkhal POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────┐    │
//! │  │    Product     │  │    Partner     │  │      Invoice       │    │
//! │  │  ────────────  │  │  ────────────  │  │  ────────────────  │    │
//! │  │  id (UUID)     │  │  id (UUID)     │  │  id (UUID)         │    │
//! │  │  price_cents   │  │  role          │  │  kind              │    │
//! │  │  cost_cents    │  │  balance_cents │  │  final_cents       │    │
//! │  │  stock         │  └────────────────┘  │  status            │    │
//! │  │  min_stock     │                      └─────────┬──────────┘    │
//! │  └────────────────┘                                │               │
//! │                                          ┌─────────▼──────────┐    │
//! │                                          │   InvoiceItem      │    │
//! │                                          │  (product snapshot)│    │
//! │                                          └────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Invoice items denormalize the product's name, price, and cost at
//! transaction time. Later product edits never rewrite invoice history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Transaction Kind
// =============================================================================

/// The kind of an invoice transaction.
///
/// A sale decreases product stock and increases customer debt; a purchase
/// increases product stock and increases the business's debt to a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Purchase,
}

// =============================================================================
// Payment Status
// =============================================================================

/// Payment status of an invoice, derived from the paid/remaining amounts
/// at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing remains to be collected (remaining ≤ 0).
    Paid,
    /// Something was paid, something remains.
    Partial,
    /// Nothing was paid at checkout.
    Unpaid,
}

impl PaymentStatus {
    /// Derives the status from the remaining and paid amounts.
    ///
    /// ## Derivation Table
    /// ```text
    /// remaining ≤ 0              → Paid
    /// remaining > 0 ∧ paid > 0   → Partial
    /// remaining > 0 ∧ paid = 0   → Unpaid
    /// ```
    pub fn from_amounts(remaining_cents: i64, paid_cents: i64) -> Self {
        if remaining_cents <= 0 {
            PaymentStatus::Paid
        } else if paid_cents > 0 {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the shop catalog.
///
/// Serialized in camelCase for the screens; the database columns stay
/// snake_case (serde renames do not affect sqlx column mapping).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the catalog and on receipts.
    pub name: String,

    /// Category label (e.g., "أحذية", "حقائب").
    pub category: String,

    /// Unit sale price in cents.
    pub price_cents: i64,

    /// Unit cost in cents (used for purchase invoices).
    pub cost_cents: i64,

    /// Current stock level.
    ///
    /// Non-negative in principle; nothing enforces this: a sale can drive
    /// stock negative.
    pub stock: i64,

    /// Threshold at or below which the product counts as low-stock.
    pub min_stock: i64,

    /// Publicly resolvable image URL, if one was uploaded.
    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the unit cost as a Money type.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Whether the product counts towards the dashboard low-stock figure.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

// =============================================================================
// Partner
// =============================================================================

/// Role of a partner in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PartnerRole {
    Customer,
    Supplier,
}

/// A customer or supplier with a running credit/debt balance.
///
/// ## Balance Sign Convention
/// Positive means the partner owes the business. Money the business owes
/// a supplier is stored as a negative balance. Checkout accumulates the
/// signed remaining amount of each credit invoice onto this figure.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: PartnerRole,
    pub balance_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Partner {
    /// Returns the running balance as Money.
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A sale or purchase invoice, created once at checkout.
///
/// There is no update or delete path: invoices are an append-only record
/// of what happened at the register.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub kind: TransactionKind,
    /// Selected partner, if any. Walk-in sales have no partner reference.
    pub partner_id: Option<String>,
    /// Partner display name at transaction time (frozen).
    pub partner_name: String,
    /// Sum of line amounts before discount.
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    /// max(0, subtotal − discount).
    pub final_cents: i64,
    /// Amount collected at checkout.
    pub paid_cents: i64,
    /// final − paid; the credit extended on this invoice.
    pub remaining_cents: i64,
    pub status: PaymentStatus,
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line item on an invoice.
/// Uses the snapshot pattern to freeze product data at transaction time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    /// Product name at transaction time (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Unit sale price in cents at transaction time (frozen).
    pub price_cents: i64,
    /// Unit cost in cents at transaction time (frozen).
    pub cost_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

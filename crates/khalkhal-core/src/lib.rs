//! # khalkhal-core: Pure Business Logic for Khalkhal POS
//!
//! This crate is the **heart** of Khalkhal POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Khalkhal POS Architecture                       │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                   Screens (web front-end)                     │  │
//! │  │   Dashboard ── Catalog ── POS Cart ── Partners ── Invoices    │  │
//! │  └─────────────────────────────┬─────────────────────────────────┘  │
//! │                                │ HTTP (JSON)                        │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐  │
//! │  │                     apps/server (axum)                        │  │
//! │  └─────────────────────────────┬─────────────────────────────────┘  │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐  │
//! │  │               ★ khalkhal-core (THIS CRATE) ★                  │  │
//! │  │                                                               │  │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────┐ │  │
//! │  │   │  types  │ │  money  │ │  cart   │ │  stats  │ │validate│ │  │
//! │  │   │ Product │ │  Money  │ │  Cart   │ │Dashboard│ │ rules  │ │  │
//! │  │   │ Invoice │ │  cents  │ │CartItem │ │  Stats  │ │ checks │ │  │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └────────┘ │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │  │
//! │  └─────────────────────────────┬─────────────────────────────────┘  │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐  │
//! │  │                 khalkhal-db (Database Layer)                  │  │
//! │  │          SQLite queries, migrations, repositories             │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Partner, Invoice, InvoiceItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The POS cart and checkout totals
//! - [`stats`] - Dashboard statistics reducer
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CheckoutTotals};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use stats::{DashboardStats, InvoiceSummary, StockLevel};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

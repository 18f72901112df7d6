//! # Khalkhal POS Database Layer
//!
//! SQLite storage for the shop: connection pooling, embedded migrations,
//! one repository per aggregate, and the checkout write sequence.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         khalkhal-db                                 │
//! │                                                                     │
//! │  ┌──────────────┐   ┌─────────────────────────────────────────┐     │
//! │  │   Database   │──►│ repositories: products, partners,       │     │
//! │  │  (SqlitePool)│   │ invoices, users                         │     │
//! │  └──────────────┘   └─────────────────────────────────────────┘     │
//! │         │                                                           │
//! │         └──────────► CheckoutService (multi-step invoice write)     │
//! │                                                                     │
//! │  Dependencies: khalkhal-core (types) + sqlx. No HTTP, no auth       │
//! │  policy, no business arithmetic beyond wiring core's totals.        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use khalkhal_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("khalkhal.db")).await?;
//! let products = db.products().list(None).await?;
//! ```

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use checkout::{CheckoutError, CheckoutRequest, CheckoutService};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::invoice::{InvoiceRepository, InvoiceWithItems};
pub use repository::partner::PartnerRepository;
pub use repository::product::ProductRepository;
pub use repository::user::{User, UserRepository};

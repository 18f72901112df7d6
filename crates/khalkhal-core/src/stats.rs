//! # Dashboard Statistics
//!
//! Pure reducer that turns invoice and stock projections into the four
//! dashboard figures. The data layer fetches thin projections (not whole
//! entities) and this module does the arithmetic, so the reduction is
//! testable without a database.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::TransactionKind;

// =============================================================================
// Projections
// =============================================================================

/// The slice of an invoice the dashboard needs.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub kind: TransactionKind,
    pub final_cents: i64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

/// The slice of a product the dashboard needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub stock: i64,
    pub min_stock: i64,
}

// =============================================================================
// Dashboard Stats
// =============================================================================

/// The four figures shown on the dashboard screen.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Sum of all sale invoices' final amounts.
    pub total_sales_cents: i64,
    /// Sum of all purchase invoices' final amounts.
    pub total_purchases_cents: i64,
    /// Number of products at or below their minimum stock threshold.
    pub low_stock_count: u64,
    /// Sale revenue for the current calendar month (year and month of `now`).
    pub monthly_revenue_cents: i64,
}

impl DashboardStats {
    /// Reduces the projections into the dashboard figures.
    ///
    /// `now` anchors the "current month"; passing it in keeps the reducer
    /// deterministic for tests.
    pub fn compute(
        invoices: &[InvoiceSummary],
        products: &[StockLevel],
        now: DateTime<Utc>,
    ) -> Self {
        let mut stats = DashboardStats::default();

        for invoice in invoices {
            match invoice.kind {
                TransactionKind::Sale => {
                    stats.total_sales_cents += invoice.final_cents;
                    if invoice.date.year() == now.year() && invoice.date.month() == now.month() {
                        stats.monthly_revenue_cents += invoice.final_cents;
                    }
                }
                TransactionKind::Purchase => {
                    stats.total_purchases_cents += invoice.final_cents;
                }
            }
        }

        stats.low_stock_count = products
            .iter()
            .filter(|p| p.stock <= p.min_stock)
            .count() as u64;

        stats
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary(kind: TransactionKind, final_cents: i64, date: DateTime<Utc>) -> InvoiceSummary {
        InvoiceSummary {
            kind,
            final_cents,
            date,
        }
    }

    #[test]
    fn test_totals_split_by_kind() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        let invoices = vec![
            summary(TransactionKind::Sale, 15000, now),
            summary(TransactionKind::Sale, 5000, now),
            summary(TransactionKind::Purchase, 8000, now),
        ];

        let stats = DashboardStats::compute(&invoices, &[], now);
        assert_eq!(stats.total_sales_cents, 20000);
        assert_eq!(stats.total_purchases_cents, 8000);
    }

    #[test]
    fn test_monthly_revenue_matches_year_and_month() {
        let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        let same_month = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        let last_month = Utc.with_ymd_and_hms(2026, 7, 31, 23, 0, 0).unwrap();
        // Same month number, previous year: must not count
        let last_year = Utc.with_ymd_and_hms(2025, 8, 25, 12, 0, 0).unwrap();

        let invoices = vec![
            summary(TransactionKind::Sale, 10000, same_month),
            summary(TransactionKind::Sale, 7000, last_month),
            summary(TransactionKind::Sale, 4000, last_year),
            summary(TransactionKind::Purchase, 9000, same_month),
        ];

        let stats = DashboardStats::compute(&invoices, &[], now);
        assert_eq!(stats.monthly_revenue_cents, 10000);
        assert_eq!(stats.total_sales_cents, 21000);
    }

    #[test]
    fn test_low_stock_count() {
        let now = Utc::now();
        let products = vec![
            StockLevel { stock: 0, min_stock: 5 },
            StockLevel { stock: 5, min_stock: 5 },  // at the threshold counts
            StockLevel { stock: -2, min_stock: 0 }, // negative stock counts
            StockLevel { stock: 10, min_stock: 5 },
        ];

        let stats = DashboardStats::compute(&[], &products, now);
        assert_eq!(stats.low_stock_count, 3);
    }

    /// Selling stock down can only grow the low-stock figure, never shrink it.
    #[test]
    fn test_low_stock_monotonic_under_stock_decrease() {
        let now = Utc::now();
        let before = vec![
            StockLevel { stock: 6, min_stock: 5 },
            StockLevel { stock: 3, min_stock: 5 },
        ];
        let after = vec![
            StockLevel { stock: 4, min_stock: 5 },
            StockLevel { stock: 1, min_stock: 5 },
        ];

        let count_before = DashboardStats::compute(&[], &before, now).low_stock_count;
        let count_after = DashboardStats::compute(&[], &after, now).low_stock_count;
        assert!(count_after >= count_before);
    }

    #[test]
    fn test_empty_inputs() {
        let stats = DashboardStats::compute(&[], &[], Utc::now());
        assert_eq!(stats.total_sales_cents, 0);
        assert_eq!(stats.total_purchases_cents, 0);
        assert_eq!(stats.low_stock_count, 0);
        assert_eq!(stats.monthly_revenue_cents, 0);
    }
}

//! Dashboard statistics endpoint.
//!
//! Fetches the invoice and stock projections and reduces them in process.
//! The shop's data volume makes a full scan per dashboard load acceptable.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use khalkhal_core::DashboardStats;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let summaries = state.db.invoices().list_summaries().await?;
    let stock_levels = state.db.products().list_stock_levels().await?;

    let stats = DashboardStats::compute(&summaries, &stock_levels, Utc::now());

    Ok(Json(stats))
}

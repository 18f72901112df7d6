//! Invoice history endpoint.
//!
//! Invoices are append-only: they are created by checkout and only ever
//! read here. No update or delete routes exist on purpose.

use axum::extract::State;
use axum::Json;

use khalkhal_db::InvoiceWithItems;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/invoices
///
/// Full history, newest first, each invoice with its line items.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<InvoiceWithItems>>> {
    let invoices = state.db.invoices().list_with_items().await?;
    Ok(Json(invoices))
}

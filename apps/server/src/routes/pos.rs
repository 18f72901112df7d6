//! Point-of-sale checkout endpoint.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;
use tracing::info;

use khalkhal_core::{Invoice, InvoiceItem};
use khalkhal_db::CheckoutRequest;

use crate::auth::Claims;
use crate::error::ApiResult;
use crate::state::AppState;

/// Shop name printed at the top of every receipt.
const STORE_NAME: &str = "خلخال";

/// Everything the receipt template needs, returned right after checkout
/// so the screen can trigger printing without a second fetch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub store_name: &'static str,
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

/// POST /api/pos/checkout
///
/// The session middleware attaches the cashier's claims; the audit line
/// below ties each invoice to the account that rang it up.
pub async fn checkout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CheckoutRequest>,
) -> ApiResult<Json<Receipt>> {
    let created = state.db.checkout().create_invoice(request).await?;

    info!(
        cashier = %claims.email,
        invoice = %created.invoice.id,
        "Checkout completed"
    );

    Ok(Json(Receipt {
        store_name: STORE_NAME,
        invoice: created.invoice,
        items: created.items,
    }))
}

//! Partner directory endpoints (customers and suppliers).

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use khalkhal_core::validation::{validate_name, validate_phone};
use khalkhal_core::{CoreError, Partner, PartnerRole};
use khalkhal_db::repository::partner::generate_partner_id;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `customer` or `supplier`; absent means everyone.
    pub role: Option<PartnerRole>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartnerPayload {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub role: PartnerRole,
}

/// The edit form additionally exposes the balance for manual corrections.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartnerPayload {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub role: PartnerRole,
    pub balance_cents: i64,
}

fn validate_partner(name: &str, phone: &str) -> Result<(), CoreError> {
    validate_name(name)?;
    validate_phone(phone)?;
    Ok(())
}

/// GET /api/partners?role=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Partner>>> {
    let partners = state.db.partners().list(query.role).await?;
    Ok(Json(partners))
}

/// POST /api/partners
///
/// New partners always start with a zero balance; credit accrues only
/// through checkout.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreatePartnerPayload>,
) -> ApiResult<Json<Partner>> {
    validate_partner(&payload.name, &payload.phone)?;

    let partner = Partner {
        id: generate_partner_id(),
        name: payload.name.trim().to_string(),
        phone: payload.phone.trim().to_string(),
        role: payload.role,
        balance_cents: 0,
        created_at: Utc::now(),
    };

    state.db.partners().insert(&partner).await?;

    Ok(Json(partner))
}

/// PUT /api/partners/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePartnerPayload>,
) -> ApiResult<Json<Partner>> {
    validate_partner(&payload.name, &payload.phone)?;

    let mut partner = state
        .db
        .partners()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Partner not found: {}", id)))?;

    partner.name = payload.name.trim().to_string();
    partner.phone = payload.phone.trim().to_string();
    partner.role = payload.role;
    partner.balance_cents = payload.balance_cents;

    state.db.partners().update(&partner).await?;

    Ok(Json(partner))
}

/// DELETE /api/partners/:id
///
/// Hard delete. Past invoices keep the partner name snapshot.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.db.partners().delete(&id).await?;
    Ok(())
}

//! Product catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use khalkhal_core::validation::{
    validate_amount, validate_category, validate_name, validate_stock_level,
};
use khalkhal_core::{CoreError, Product};
use khalkhal_db::repository::product::generate_product_id;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Matches against product name or category, substring, case as stored.
    pub search: Option<String>,
}

/// What the product form submits. Amounts in cents.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub cost_cents: i64,
    pub stock: i64,
    pub min_stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductPayload {
    fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        validate_category(&self.category)?;
        validate_amount("price", self.price_cents)?;
        validate_amount("cost", self.cost_cents)?;
        validate_stock_level("stock", self.stock)?;
        validate_stock_level("min_stock", self.min_stock)?;
        Ok(())
    }
}

/// GET /api/products?search=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db.products().list(query.search.as_deref()).await?;
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Product not found: {}", id)))?;

    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> ApiResult<Json<Product>> {
    payload.validate()?;

    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        name: payload.name.trim().to_string(),
        category: payload.category.trim().to_string(),
        price_cents: payload.price_cents,
        cost_cents: payload.cost_cents,
        stock: payload.stock,
        min_stock: payload.min_stock,
        image_url: payload.image_url,
        created_at: now,
        updated_at: now,
    };

    state.db.products().insert(&product).await?;

    Ok(Json(product))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> ApiResult<Json<Product>> {
    payload.validate()?;

    let mut product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Product not found: {}", id)))?;

    product.name = payload.name.trim().to_string();
    product.category = payload.category.trim().to_string();
    product.price_cents = payload.price_cents;
    product.cost_cents = payload.cost_cents;
    product.stock = payload.stock;
    product.min_stock = payload.min_stock;
    product.image_url = payload.image_url;
    product.updated_at = Utc::now();

    state.db.products().update(&product).await?;

    Ok(Json(product))
}

/// DELETE /api/products/:id
///
/// Hard delete. Past invoices keep their snapshot of the product.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.db.products().delete(&id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A listed product must deserialize straight back into the edit
    /// form payload, so responses and forms share one set of keys.
    #[test]
    fn test_serialized_product_matches_form_payload() {
        let product = Product {
            id: "p1".to_string(),
            name: "جزمة جلد".to_string(),
            category: "أحذية".to_string(),
            price_cents: 45000,
            cost_cents: 30000,
            stock: 3,
            min_stock: 5,
            image_url: Some("/uploads/a.jpg".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).unwrap();
        let payload: ProductPayload = serde_json::from_value(json).unwrap();

        assert_eq!(payload.name, product.name);
        assert_eq!(payload.price_cents, 45000);
        assert_eq!(payload.min_stock, 5);
        assert_eq!(payload.image_url.as_deref(), Some("/uploads/a.jpg"));
    }
}

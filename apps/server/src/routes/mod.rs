//! # Route Modules
//!
//! One module per screen area, assembled into the application router here.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Public                                                             │
//! │    POST /api/auth/login          login                              │
//! │    GET  /health                  liveness probe                     │
//! │    GET  /uploads/*               stored product images              │
//! │                                                                     │
//! │  Session required (bearer token)                                    │
//! │    GET  /api/dashboard/stats     dashboard reducer                  │
//! │    GET/POST /api/products        catalog list (?search) / create    │
//! │    GET/PUT/DELETE /api/products/:id                                 │
//! │    GET/POST /api/partners        directory list (?role) / create    │
//! │    PUT/DELETE /api/partners/:id                                     │
//! │    GET  /api/invoices            history with line items            │
//! │    POST /api/pos/checkout        the invoice creation sequence      │
//! │    POST /api/uploads/images      product image upload               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod dashboard;
pub mod invoices;
pub mod partners;
pub mod pos;
pub mod products;
pub mod uploads;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::require_session;
use crate::state::AppState;

/// Builds the full application router.
pub fn app_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/:id",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/api/partners", get(partners::list).post(partners::create))
        .route(
            "/api/partners/:id",
            put(partners::update).delete(partners::delete),
        )
        .route("/api/invoices", get(invoices::list))
        .route("/api/pos/checkout", post(pos::checkout))
        .route("/api/uploads/images", post(uploads::upload))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/health", get(health))
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(state.upload_dir.clone()))
        .layer(TraceLayer::new_for_http())
        // The screens are served from another origin on the shop LAN
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use khalkhal_core::Product;
    use khalkhal_db::repository::user::{generate_user_id, User};
    use khalkhal_db::{Database, DbConfig};

    use crate::auth::JwtManager;

    async fn test_app() -> (Router, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let jwt = JwtManager::new("test-secret".to_string(), 3600);
        let state = AppState::new(
            db.clone(),
            jwt,
            std::env::temp_dir().join("khalkhal-test-uploads"),
        );
        (app_router(state), db)
    }

    async fn seed_user(db: &Database) {
        let user = User {
            id: generate_user_id(),
            email: "admin@shop.local".to_string(),
            password_hash: auth::hash_password("s3cret").unwrap(),
            created_at: Utc::now(),
        };
        db.users().insert(&user).await.unwrap();
    }

    fn test_product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: "جزمة جلد".to_string(),
            category: "أحذية".to_string(),
            price_cents: 10000,
            cost_cents: 7000,
            stock: 10,
            min_stock: 2,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                json!({ "email": "admin@shop.local", "password": "s3cret" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body.get("expiresIn").is_some());
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_routes_without_token_rejected() {
        let (app, _db) = test_app().await;

        let request = Request::builder()
            .uri("/api/products")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    /// A screen reads a product from the list and resubmits the edit
    /// form; list responses and form payloads must use the same keys.
    #[tokio::test]
    async fn test_product_list_round_trips_into_edit_form() {
        let (app, db) = test_app().await;
        seed_user(&db).await;
        db.products().insert(&test_product("p1")).await.unwrap();

        let token = login(&app).await;

        let response = app
            .clone()
            .oneshot(json_request("GET", "/api/products", Some(&token), json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let listed = body_json(response).await;
        let product = listed[0].clone();
        assert!(product.get("priceCents").is_some());
        assert!(product.get("minStock").is_some());

        // Resubmit the listed product unchanged as the edit form would.
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/products/p1",
                Some(&token),
                product,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let updated = body_json(response).await;
        assert_eq!(updated["priceCents"], 10000);
    }

    /// Full register flow: login, checkout with a bearer token, receipt
    /// comes back in camelCase with the store header.
    #[tokio::test]
    async fn test_checkout_flow_returns_receipt() {
        let (app, db) = test_app().await;
        seed_user(&db).await;
        db.products().insert(&test_product("p1")).await.unwrap();

        let token = login(&app).await;

        let checkout = json!({
            "kind": "sale",
            "items": [{
                "productId": "p1",
                "productName": "جزمة جلد",
                "priceCents": 10000,
                "costCents": 7000,
                "quantity": 2
            }],
            "partnerName": "زبون نقدي",
            "discountCents": 5000,
            "paidCents": 10000
        });
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/pos/checkout",
                Some(&token),
                checkout,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let receipt = body_json(response).await;
        assert_eq!(receipt["storeName"], "خلخال");
        assert_eq!(receipt["subtotalCents"], 20000);
        assert_eq!(receipt["finalCents"], 15000);
        assert_eq!(receipt["remainingCents"], 5000);
        assert_eq!(receipt["status"], "partial");
        assert_eq!(receipt["items"][0]["productName"], "جزمة جلد");

        assert_eq!(db.products().get_stock("p1").await.unwrap(), Some(8));
    }
}

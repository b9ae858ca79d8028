//! HTTP interface.
//!
//! # Routes
//!
//! - `GET  /api/products` - every product, ordered by id
//! - `GET  /api/products/:id` - one product, `404` if unknown
//! - `POST /api/flashsale/:user_id/:product_id` - one purchase attempt
//! - `GET  /api/stats` - arbiter and gateway counters
//! - `GET  /health` - liveness

pub mod dto;
pub mod errors;
pub mod handlers;

use crate::arbiter::Arbiter;
use crate::catalog::Catalog;
use crate::gateway::Gateway;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub gateway: Gateway<Arbiter>,
}

impl AppState {
    pub fn new(catalog: Catalog, gateway: Gateway<Arbiter>) -> Self {
        Self { catalog, gateway }
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/:id", get(handlers::get_product))
        .route(
            "/flashsale/:user_id/:product_id",
            post(handlers::flash_sale),
        )
        .route("/stats", get(handlers::stats));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

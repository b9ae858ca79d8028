use super::dto::{FlashSaleResponse, StatsResponse};
use super::errors::json_error;
use super::AppState;
use crate::arbiter::ArbiterError;
use crate::catalog::CatalogError;
use crate::model::{Product, ProductId, UserId};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.list())
}

pub async fn get_product(State(state): State<AppState>, Path(id): Path<u32>) -> Response {
    match state.catalog.get(ProductId(id)) {
        Ok(product) => Json(product).into_response(),
        Err(CatalogError::NotFound(id)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{id} does not exist"))
        }
    }
}

pub async fn flash_sale(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(u64, u32)>,
) -> Response {
    match state
        .gateway
        .submit(UserId(user_id), ProductId(product_id))
        .await
    {
        Ok(outcome) => Json(FlashSaleResponse::from(outcome)).into_response(),
        Err(ArbiterError::NotFound(id)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{id} does not exist"))
        }
        Err(ArbiterError::Unavailable(reason)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(FlashSaleResponse::failed(format!(
                "The sale is not available: {reason}"
            ))),
        )
            .into_response(),
        Err(e @ ArbiterError::Inconsistent(_)) => {
            error!(error = %e, "Purchase left the ledger inconsistent");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "The purchase could not be completed",
            )
        }
    }
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        arbiter: state.gateway.arbiter().stats(),
        gateway: state.gateway.stats(),
    })
}

pub async fn health() -> &'static str {
    "ok"
}

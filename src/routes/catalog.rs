use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::catalog::{ProductList, ProductQuery, StoreList, StoreQuery, UpdateAvailabilityRequest},
    error::AppResult,
    models::Product,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn stores_router() -> Router<AppState> {
    Router::new().route("/", get(list_stores))
}

pub fn products_router() -> Router<AppState> {
    Router::new().route("/", get(list_products).patch(update_availability))
}

#[utoipa::path(
    get,
    path = "/api/stores",
    params(
        ("vendor_id" = Option<Uuid>, Query, description = "Stores owned by this vendor"),
        ("city" = Option<String>, Query, description = "Stores in this city")
    ),
    responses(
        (status = 200, description = "List stores", body = ApiResponse<StoreList>)
    ),
    tag = "Catalog"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    let resp = catalog_service::list_stores(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("store_id" = Uuid, Query, description = "Store whose products to list")
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 404, description = "Store not found")
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/products",
    request_body = UpdateAvailabilityRequest,
    responses(
        (status = 200, description = "Availability updated", body = ApiResponse<Product>),
        (status = 404, description = "Product not found")
    ),
    tag = "Catalog"
)]
pub async fn update_availability(
    State(state): State<AppState>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::update_availability(&state, payload).await?;
    Ok(Json(resp))
}

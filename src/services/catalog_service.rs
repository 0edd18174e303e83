use crate::{
    db::Repository,
    dto::catalog::{ProductList, ProductQuery, StoreList, StoreQuery, UpdateAvailabilityRequest},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_stores(state: &AppState, query: StoreQuery) -> AppResult<ApiResponse<StoreList>> {
    let items = state.db.stores.filter(|s| {
        query.vendor_id.is_none_or(|id| s.vendor_id == id)
            && query.city.as_deref().is_none_or(|city| s.city == city)
    })?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Stores", StoreList { items }, Some(meta)))
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    if state.db.stores.get(&query.store_id)?.is_none() {
        return Err(AppError::not_found("Store"));
    }
    let items = state.db.products.filter(|p| p.store_id == query.store_id)?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn update_availability(
    state: &AppState,
    payload: UpdateAvailabilityRequest,
) -> AppResult<ApiResponse<Product>> {
    let product = state
        .db
        .products
        .update(&payload.product_id, |p| {
            p.available = payload.available;
            Ok(p.clone())
        })?
        .ok_or_else(|| AppError::not_found("Product"))?;

    tracing::info!(product_id = %product.id, available = product.available, "product availability updated");
    Ok(ApiResponse::success("Updated", product, Some(Meta::empty())))
}

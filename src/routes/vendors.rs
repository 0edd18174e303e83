use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::{
        orders::OrderList,
        vendors::{VendorOrdersQuery, VendorStatusRequest},
    },
    error::AppResult,
    models::Order,
    response::ApiResponse,
    services::vendor_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/orders", get(list_vendor_orders).patch(update_order_status))
}

#[utoipa::path(
    get,
    path = "/api/vendors/orders",
    params(
        ("vendor_id" = Option<Uuid>, Query, description = "Orders across all of this vendor's stores"),
        ("store_id" = Option<Uuid>, Query, description = "Orders of one store"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Vendor orders", body = ApiResponse<OrderList>),
        (status = 400, description = "Neither vendor_id nor store_id given")
    ),
    tag = "Vendors"
)]
pub async fn list_vendor_orders(
    State(state): State<AppState>,
    Query(query): Query<VendorOrdersQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = vendor_service::list_vendor_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/vendors/orders",
    request_body = VendorStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Status not allowed for vendors"),
        (status = 403, description = "Order belongs to another vendor"),
        (status = 409, description = "Illegal transition")
    ),
    tag = "Vendors"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Json(payload): Json<VendorStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = vendor_service::update_order_status(&state, payload).await?;
    Ok(Json(resp))
}

use crate::{
    dto::{
        orders::OrderList,
        vendors::{VendorOrdersQuery, VendorStatusRequest},
    },
    error::{AppError, AppResult},
    models::{Order, OrderStatus},
    response::{ApiResponse, Meta},
    services::order_service,
    state::AppState,
};

/// Statuses a vendor may move its own orders to.
pub const VENDOR_STATUSES: [OrderStatus; 4] = [
    OrderStatus::Accepted,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::Cancelled,
];

pub async fn list_vendor_orders(
    state: &AppState,
    query: VendorOrdersQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let store_ids = match (query.store_id, query.vendor_id) {
        (Some(store_id), _) => vec![store_id],
        (None, Some(vendor_id)) => state.db.stores.ids_for_vendor(vendor_id)?,
        (None, None) => return Err(AppError::bad_request("vendor_id or store_id is required")),
    };

    let mut items = state.db.orders.by_stores(&store_ids)?;
    if let Some(status) = query.status {
        items.retain(|o| o.status == status);
    }
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Vendor orders", OrderList { items }, Some(meta)))
}

pub async fn update_order_status(
    state: &AppState,
    payload: VendorStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    if !VENDOR_STATUSES.contains(&payload.status) {
        return Err(AppError::bad_request("Invalid status for vendor"));
    }

    let owned_stores = match payload.vendor_id {
        Some(vendor_id) => Some(state.db.stores.ids_for_vendor(vendor_id)?),
        None => None,
    };
    let order = order_service::transition(state, payload.order_id, payload.status, None, |order| {
        match &owned_stores {
            Some(ids) if !ids.contains(&order.store_id) => Err(AppError::Forbidden(
                "Order does not belong to this vendor".into(),
            )),
            _ => Ok(()),
        }
    })?;

    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

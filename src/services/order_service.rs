use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::Repository,
    dto::orders::{CreateOrderRequest, OrderList},
    error::{AppError, AppResult},
    events::{OrderEvent, OrderEventKind},
    lifecycle,
    models::{Order, OrderItem, OrderStatus, PaymentMethod},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::delivery_service,
    state::AppState,
};

pub(crate) fn publish(state: &AppState, kind: OrderEventKind, order: &Order) {
    state.events.publish(&OrderEvent::new(kind, order.clone()));
}

pub(crate) fn load_order(state: &AppState, id: Uuid) -> AppResult<Order> {
    state
        .db
        .orders
        .get(&id)?
        .ok_or_else(|| AppError::not_found("Order"))
}

/// Apply a lifecycle transition inside the order's write lock and announce it.
///
/// `guard` runs under the same lock, before the transition, so ownership
/// checks cannot race with another writer.
pub(crate) fn transition<G>(
    state: &AppState,
    order_id: Uuid,
    next: OrderStatus,
    driver_id: Option<Uuid>,
    guard: G,
) -> AppResult<Order>
where
    G: FnOnce(&Order) -> AppResult<()>,
{
    let order = state
        .db
        .orders
        .update(&order_id, |order| {
            guard(order)?;
            lifecycle::update_status(order, next, driver_id, Utc::now())?;
            Ok(order.clone())
        })?
        .ok_or_else(|| AppError::not_found("Order"))?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status changed");
    let kind = match order.status {
        OrderStatus::Delivered => OrderEventKind::OrderDelivered,
        OrderStatus::Assigned => OrderEventKind::OrderAssigned,
        _ => OrderEventKind::OrderUpdated,
    };
    publish(state, kind, &order);
    if let Err(err) = delivery_service::record_progress(state, &order) {
        tracing::warn!(order_id = %order.id, error = %err, "delivery record not updated");
    }
    Ok(order)
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let mut orders = state.db.orders.filter(|o| {
        query.customer_id.is_none_or(|id| o.customer_id == id)
            && query.store_id.is_none_or(|id| o.store_id == id)
            && query.status.is_none_or(|s| o.status == s)
    })?;
    match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => orders.sort_by_key(|o| o.created_at),
        SortOrder::Desc => orders.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    let (items, meta) = query.pagination().apply(orders);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Order>> {
    let order = load_order(state, id)?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    if payload.items.is_empty() {
        return Err(AppError::bad_request("Order has no items"));
    }
    if [&payload.delivery_address, &payload.city, &payload.customer_phone]
        .iter()
        .any(|v| v.trim().is_empty())
    {
        return Err(AppError::bad_request("Missing required fields"));
    }
    if state.db.users.get(&payload.customer_id)?.is_none() {
        return Err(AppError::not_found("Customer"));
    }
    let store = state
        .db
        .stores
        .get(&payload.store_id)?
        .ok_or_else(|| AppError::not_found("Store"))?;

    let mut items = Vec::with_capacity(payload.items.len());
    for input in &payload.items {
        if input.quantity <= 0 {
            return Err(AppError::bad_request("Order has invalid quantity"));
        }
        let product = state
            .db
            .products
            .get(&input.product_id)?
            .filter(|p| p.store_id == store.id)
            .ok_or_else(|| {
                AppError::bad_request(format!("Product {} is not sold by this store", input.product_id))
            })?;
        if !product.available {
            return Err(AppError::bad_request(format!("{} is unavailable", product.name)));
        }
        items.push(OrderItem {
            product_id: product.id,
            quantity: input.quantity,
            price: product.price,
        });
    }

    let delivery_fee = match payload.delivery_fee {
        Some(fee) if fee < 0 => return Err(AppError::bad_request("Delivery fee cannot be negative")),
        Some(fee) => fee,
        None => state
            .db
            .delivery_zones
            .filter(|z| z.city == payload.city)?
            .first()
            .map_or(0, |z| z.delivery_fee),
    };
    let subtotal = items
        .iter()
        .try_fold(0i64, |acc, i| i.price.checked_mul(i64::from(i.quantity))?.checked_add(acc))
        .ok_or_else(|| AppError::bad_request("Order total out of range"))?;
    let total = subtotal
        .checked_add(delivery_fee)
        .ok_or_else(|| AppError::bad_request("Order total out of range"))?;
    let now = Utc::now();

    let order = state.db.orders.insert(Order {
        id: Uuid::new_v4(),
        customer_id: payload.customer_id,
        store_id: store.id,
        driver_id: None,
        items,
        subtotal,
        delivery_fee,
        total,
        status: OrderStatus::Pending,
        payment_method: payload.payment_method.unwrap_or(PaymentMethod::Cash),
        delivery_address: payload.delivery_address,
        city: payload.city,
        customer_phone: payload.customer_phone,
        created_at: now,
        updated_at: now,
        accepted_at: None,
        preparing_at: None,
        ready_at: None,
        assigned_at: None,
        delivered_at: None,
    })?;

    if let Err(err) = log_audit(
        &state.db,
        Some(order.customer_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "total": order.total })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }
    tracing::info!(order_id = %order.id, store_id = %order.store_id, total = order.total, "order created");
    publish(state, OrderEventKind::OrderCreated, &order);

    Ok(ApiResponse::success("Order created", order, Some(Meta::empty())))
}

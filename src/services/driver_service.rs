use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::Repository,
    dispatch,
    dto::{
        drivers::{
            AcceptDeliveryRequest, DeliveriesQuery, DriverStatusRequest, LocationUpdateRequest,
            NearbyDriver, NearbyQuery,
        },
        orders::OrderList,
    },
    error::{AppError, AppResult},
    models::{Coordinate, DriverLocation, Order, OrderStatus, UserRole},
    response::{ApiResponse, Meta},
    services::{auth_service::ensure_role, delivery_service, order_service},
    state::AppState,
};

/// Statuses a driver may report on an order they carry.
pub const DRIVER_STATUSES: [OrderStatus; 2] = [OrderStatus::InDelivery, OrderStatus::Delivered];

pub async fn list_deliveries(
    state: &AppState,
    query: DeliveriesQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let items = match (query.available, query.driver_id) {
        (Some(true), _) => state.db.orders.available_deliveries()?,
        (_, Some(driver_id)) => state.db.orders.by_driver(driver_id)?,
        _ => return Err(AppError::bad_request("driver_id or available=true is required")),
    };
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Deliveries", OrderList { items }, Some(meta)))
}

pub async fn accept_delivery(
    state: &AppState,
    payload: AcceptDeliveryRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_role(&state.db, payload.driver_id, UserRole::Driver)?;
    let (order, _) = delivery_service::claim_order(state, payload.order_id, payload.driver_id)?;
    Ok(ApiResponse::success("Delivery accepted", order, Some(Meta::empty())))
}

pub async fn update_delivery_status(
    state: &AppState,
    order_id: Uuid,
    payload: DriverStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    if !DRIVER_STATUSES.contains(&payload.status) {
        return Err(AppError::bad_request("Invalid status for driver"));
    }

    let driver_id = payload.driver_id;
    let order = order_service::transition(state, order_id, payload.status, None, |order| {
        if order.driver_id != Some(driver_id) {
            return Err(AppError::Forbidden("Order not assigned to this driver".into()));
        }
        Ok(())
    })?;
    Ok(ApiResponse::success("Delivery status updated", order, Some(Meta::empty())))
}

pub async fn update_location(
    state: &AppState,
    payload: LocationUpdateRequest,
) -> AppResult<ApiResponse<DriverLocation>> {
    if !(-90.0..=90.0).contains(&payload.latitude) || !(-180.0..=180.0).contains(&payload.longitude) {
        return Err(AppError::bad_request("Coordinates out of range"));
    }
    ensure_role(&state.db, payload.driver_id, UserRole::Driver)?;

    let location = state.db.driver_locations.insert(DriverLocation {
        driver_id: payload.driver_id,
        latitude: payload.latitude,
        longitude: payload.longitude,
        is_available: payload.is_available.unwrap_or(true),
        updated_at: Utc::now(),
    })?;
    tracing::debug!(driver_id = %location.driver_id, available = location.is_available, "driver location updated");
    Ok(ApiResponse::success("Location updated", location, Some(Meta::empty())))
}

pub async fn nearby_drivers(
    state: &AppState,
    query: NearbyQuery,
) -> AppResult<ApiResponse<Vec<NearbyDriver>>> {
    let radius = query
        .radius
        .filter(|r| *r > 0.0)
        .unwrap_or(state.config.dispatch_radius_km);
    let origin = Coordinate {
        latitude: query.lat,
        longitude: query.lng,
    };
    let locations = state.db.driver_locations.list()?;
    let drivers: Vec<NearbyDriver> = dispatch::nearby(origin, &locations, radius)
        .map(|(loc, distance_km)| NearbyDriver {
            driver_id: loc.driver_id,
            latitude: loc.latitude,
            longitude: loc.longitude,
            distance_km,
        })
        .collect();
    let meta = Meta::total(drivers.len());
    Ok(ApiResponse::success("Nearby drivers", drivers, Some(meta)))
}

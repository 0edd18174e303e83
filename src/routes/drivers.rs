use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        drivers::{
            AcceptDeliveryRequest, DeliveriesQuery, DriverStatusRequest, LocationUpdateRequest,
            NearbyDriver, NearbyQuery,
        },
        orders::OrderList,
    },
    error::AppResult,
    models::{DriverLocation, Order},
    response::ApiResponse,
    services::driver_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deliveries", get(list_deliveries).post(accept_delivery))
        .route("/deliveries/{order_id}/status", patch(update_delivery_status))
        .route("/location", post(update_location))
        .route("/nearby", get(nearby_drivers))
}

#[utoipa::path(
    get,
    path = "/api/drivers/deliveries",
    params(
        ("driver_id" = Option<Uuid>, Query, description = "Orders carried by this driver"),
        ("available" = Option<bool>, Query, description = "true lists ready orders nobody claimed")
    ),
    responses(
        (status = 200, description = "Deliveries", body = ApiResponse<OrderList>),
        (status = 400, description = "No filter given")
    ),
    tag = "Drivers"
)]
pub async fn list_deliveries(
    State(state): State<AppState>,
    Query(query): Query<DeliveriesQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = driver_service::list_deliveries(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/drivers/deliveries",
    request_body = AcceptDeliveryRequest,
    responses(
        (status = 200, description = "Delivery accepted", body = ApiResponse<Order>),
        (status = 403, description = "Not a driver"),
        (status = 409, description = "Order not ready or already claimed")
    ),
    tag = "Drivers"
)]
pub async fn accept_delivery(
    State(state): State<AppState>,
    Json(payload): Json<AcceptDeliveryRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = driver_service::accept_delivery(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/drivers/deliveries/{order_id}/status",
    params(
        ("order_id" = Uuid, Path, description = "Order ID")
    ),
    request_body = DriverStatusRequest,
    responses(
        (status = 200, description = "Delivery progressed", body = ApiResponse<Order>),
        (status = 400, description = "Status not allowed for drivers"),
        (status = 403, description = "Order assigned to another driver"),
        (status = 409, description = "Illegal transition")
    ),
    tag = "Drivers"
)]
pub async fn update_delivery_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<DriverStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = driver_service::update_delivery_status(&state, order_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/drivers/location",
    request_body = LocationUpdateRequest,
    responses(
        (status = 200, description = "Location stored", body = ApiResponse<DriverLocation>),
        (status = 400, description = "Coordinates out of range")
    ),
    tag = "Drivers"
)]
pub async fn update_location(
    State(state): State<AppState>,
    Json(payload): Json<LocationUpdateRequest>,
) -> AppResult<Json<ApiResponse<DriverLocation>>> {
    let resp = driver_service::update_location(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/drivers/nearby",
    params(
        ("lat" = f64, Query, description = "Latitude"),
        ("lng" = f64, Query, description = "Longitude"),
        ("radius" = Option<f64>, Query, description = "Radius in km, default from config")
    ),
    responses(
        (status = 200, description = "Available drivers within the radius, nearest first", body = ApiResponse<Vec<NearbyDriver>>)
    ),
    tag = "Drivers"
)]
pub async fn nearby_drivers(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<ApiResponse<Vec<NearbyDriver>>>> {
    let resp = driver_service::nearby_drivers(&state, query).await?;
    Ok(Json(resp))
}

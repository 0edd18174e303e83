use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::delivery::{
        AssignNearestRequest, AssignNearestResponse, BatchOptimizeRequest, BatchOptimizeResponse,
        CreateZoneRequest, DeliveryList, DeliveryPrediction, DriverFilter, OptimizeRouteRequest,
        PredictionRequest, RecordPerformanceRequest, RouteList, ZoneQuery,
    },
    error::AppResult,
    models::{DeliveryRoute, DeliveryZone, DriverPerformance},
    response::ApiResponse,
    services::delivery_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assign-nearest-driver", post(assign_nearest_driver))
        .route("/batch-optimize", post(batch_optimize))
        .route("/optimize-route", post(optimize_route))
        .route("/routes", get(list_routes))
        .route("/records", get(list_records))
        .route("/zones", get(list_zones).post(create_zone))
        .route("/predictions", post(predict_delivery))
        .route(
            "/driver-performance",
            get(driver_performance).post(record_performance),
        )
}

#[utoipa::path(
    post,
    path = "/api/delivery/assign-nearest-driver",
    request_body = AssignNearestRequest,
    responses(
        (status = 200, description = "Best scored driver assigned", body = ApiResponse<AssignNearestResponse>),
        (status = 400, description = "No drivers available nearby"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order not ready or already claimed")
    ),
    tag = "Delivery"
)]
pub async fn assign_nearest_driver(
    State(state): State<AppState>,
    Json(payload): Json<AssignNearestRequest>,
) -> AppResult<Json<ApiResponse<AssignNearestResponse>>> {
    let resp = delivery_service::assign_nearest_driver(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/batch-optimize",
    request_body = BatchOptimizeRequest,
    responses(
        (status = 200, description = "Routes planned for ready orders in the city", body = ApiResponse<BatchOptimizeResponse>),
        (status = 400, description = "City missing")
    ),
    tag = "Delivery"
)]
pub async fn batch_optimize(
    State(state): State<AppState>,
    Json(payload): Json<BatchOptimizeRequest>,
) -> AppResult<Json<ApiResponse<BatchOptimizeResponse>>> {
    let resp = delivery_service::batch_optimize(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/optimize-route",
    request_body = OptimizeRouteRequest,
    responses(
        (status = 200, description = "Route for one driver", body = ApiResponse<DeliveryRoute>),
        (status = 400, description = "No orders given"),
        (status = 404, description = "None of the orders exist")
    ),
    tag = "Delivery"
)]
pub async fn optimize_route(
    State(state): State<AppState>,
    Json(payload): Json<OptimizeRouteRequest>,
) -> AppResult<Json<ApiResponse<DeliveryRoute>>> {
    let resp = delivery_service::optimize_route(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/delivery/routes",
    params(
        ("driver_id" = Option<Uuid>, Query, description = "Only this driver's routes")
    ),
    responses(
        (status = 200, description = "Planned routes", body = ApiResponse<RouteList>)
    ),
    tag = "Delivery"
)]
pub async fn list_routes(
    State(state): State<AppState>,
    Query(filter): Query<DriverFilter>,
) -> AppResult<Json<ApiResponse<RouteList>>> {
    let resp = delivery_service::list_routes(&state, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/delivery/records",
    params(
        ("driver_id" = Option<Uuid>, Query, description = "Only this driver's deliveries")
    ),
    responses(
        (status = 200, description = "Delivery records", body = ApiResponse<DeliveryList>)
    ),
    tag = "Delivery"
)]
pub async fn list_records(
    State(state): State<AppState>,
    Query(filter): Query<DriverFilter>,
) -> AppResult<Json<ApiResponse<DeliveryList>>> {
    let resp = delivery_service::list_records(&state, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/delivery/zones",
    params(
        ("city" = Option<String>, Query, description = "Zones in this city")
    ),
    responses(
        (status = 200, description = "Delivery zones", body = ApiResponse<Vec<DeliveryZone>>)
    ),
    tag = "Delivery"
)]
pub async fn list_zones(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> AppResult<Json<ApiResponse<Vec<DeliveryZone>>>> {
    let resp = delivery_service::list_zones(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/zones",
    request_body = CreateZoneRequest,
    responses(
        (status = 200, description = "Zone created", body = ApiResponse<DeliveryZone>),
        (status = 400, description = "Missing fields")
    ),
    tag = "Delivery"
)]
pub async fn create_zone(
    State(state): State<AppState>,
    Json(payload): Json<CreateZoneRequest>,
) -> AppResult<Json<ApiResponse<DeliveryZone>>> {
    let resp = delivery_service::create_zone(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/predictions",
    request_body = PredictionRequest,
    responses(
        (status = 200, description = "Delivery time estimate", body = ApiResponse<DeliveryPrediction>),
        (status = 404, description = "Order not found")
    ),
    tag = "Delivery"
)]
pub async fn predict_delivery(
    State(state): State<AppState>,
    Json(payload): Json<PredictionRequest>,
) -> AppResult<Json<ApiResponse<DeliveryPrediction>>> {
    let resp = delivery_service::predict_delivery(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/delivery/driver-performance",
    params(
        ("driver_id" = Option<Uuid>, Query, description = "One driver; top rated drivers otherwise")
    ),
    responses(
        (status = 200, description = "Driver performance", body = ApiResponse<Vec<DriverPerformance>>)
    ),
    tag = "Delivery"
)]
pub async fn driver_performance(
    State(state): State<AppState>,
    Query(filter): Query<DriverFilter>,
) -> AppResult<Json<ApiResponse<Vec<DriverPerformance>>>> {
    let resp = delivery_service::driver_performance(&state, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/driver-performance",
    request_body = RecordPerformanceRequest,
    responses(
        (status = 200, description = "Performance stored", body = ApiResponse<DriverPerformance>),
        (status = 400, description = "Rating out of range")
    ),
    tag = "Delivery"
)]
pub async fn record_performance(
    State(state): State<AppState>,
    Json(payload): Json<RecordPerformanceRequest>,
) -> AppResult<Json<ApiResponse<DriverPerformance>>> {
    let resp = delivery_service::record_performance(&state, payload).await?;
    Ok(Json(resp))
}

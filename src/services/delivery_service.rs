use std::collections::HashMap;

use chrono::{Duration, Timelike, Utc};
use uuid::Uuid;

use crate::{
    db::Repository,
    dispatch,
    dto::delivery::{
        AssignNearestRequest, AssignNearestResponse, BatchOptimizeRequest, BatchOptimizeResponse,
        CreateZoneRequest, DeliveryList, DeliveryPrediction, DriverFilter, OptimizeRouteRequest,
        PredictionRequest, RecordPerformanceRequest, RouteList, ZoneQuery,
    },
    error::{AppError, AppResult},
    events::OrderEventKind,
    lifecycle,
    models::{
        Coordinate, Delivery, DeliveryRoute, DeliveryStatus, DeliveryZone, DriverPerformance,
        Order, OrderStatus, RouteStatus, UserRole,
    },
    response::{ApiResponse, Meta},
    routing,
    services::order_service,
    state::AppState,
};

const PREPARATION_MINUTES: i64 = 15;
const DEFAULT_ZONE_MINUTES: i64 = 30;
const BASE_CONFIDENCE: f64 = 0.7;
const CONFIDENCE_PER_ITEM: f64 = 0.05;
const MAX_CONFIDENCE: f64 = 0.95;
const TOP_DRIVERS: usize = 10;

fn open_delivery(state: &AppState, order: &Order, driver_id: Uuid) -> AppResult<Delivery> {
    let pickup_address = state
        .db
        .stores
        .get(&order.store_id)?
        .map(|s| s.address)
        .unwrap_or_default();
    state.db.deliveries.insert(Delivery {
        id: Uuid::new_v4(),
        order_id: order.id,
        driver_id,
        status: DeliveryStatus::Assigned,
        pickup_address,
        delivery_address: order.delivery_address.clone(),
        customer_phone: order.customer_phone.clone(),
        assigned_at: order.assigned_at.unwrap_or(order.updated_at),
        picked_up_at: None,
        delivered_at: None,
    })
}

/// Give a ready, unclaimed order to `driver_id` and open its delivery record.
///
/// The ready/unclaimed check and the assignment happen under one write lock,
/// so two drivers racing for the same order cannot both win.
pub(crate) fn claim_order(
    state: &AppState,
    order_id: Uuid,
    driver_id: Uuid,
) -> AppResult<(Order, Delivery)> {
    let order = state
        .db
        .orders
        .update(&order_id, |order| {
            lifecycle::assign_driver(order, driver_id, Utc::now())?;
            Ok(order.clone())
        })?
        .ok_or_else(|| AppError::not_found("Order"))?;

    let delivery = open_delivery(state, &order, driver_id)?;
    tracing::info!(order_id = %order.id, driver_id = %driver_id, "driver assigned");
    order_service::publish(state, OrderEventKind::OrderAssigned, &order);
    Ok((order, delivery))
}

/// Mirror an order's progress, or its cancellation, into the open delivery record.
pub(crate) fn record_progress(state: &AppState, order: &Order) -> AppResult<()> {
    let now = Utc::now();
    let Some(delivery) = state
        .db
        .deliveries
        .filter(|d| d.order_id == order.id && !d.status.is_closed())?
        .pop()
    else {
        return Ok(());
    };

    state.db.deliveries.update(&delivery.id, |d| {
        match order.status {
            OrderStatus::InDelivery => {
                d.status = DeliveryStatus::InTransit;
                d.picked_up_at.get_or_insert(now);
            }
            OrderStatus::Delivered => {
                d.status = DeliveryStatus::Delivered;
                d.picked_up_at.get_or_insert(now);
                d.delivered_at = Some(now);
            }
            OrderStatus::Cancelled => d.status = DeliveryStatus::Cancelled,
            _ => {}
        }
        Ok(())
    })?;

    if order.status == OrderStatus::Delivered {
        let minutes = (now - delivery.assigned_at).num_seconds() as f64 / 60.0;
        let fresh = DriverPerformance {
            driver_id: delivery.driver_id,
            total_deliveries: 0,
            average_delivery_time: 0.0,
            on_time_percentage: 0.0,
            rating: 0.0,
            earnings: 0,
            created_at: now,
            updated_at: now,
        };
        state.db.driver_performance.get_or_insert_with(delivery.driver_id, || fresh)?;
        state.db.driver_performance.update(&delivery.driver_id, |p| {
            let done = p.total_deliveries as f64;
            p.average_delivery_time = (p.average_delivery_time * done + minutes) / (done + 1.0);
            p.total_deliveries += 1;
            p.earnings += order.delivery_fee;
            p.updated_at = now;
            Ok(())
        })?;
    }
    Ok(())
}

pub async fn assign_nearest_driver(
    state: &AppState,
    payload: AssignNearestRequest,
) -> AppResult<ApiResponse<AssignNearestResponse>> {
    let order = order_service::load_order(state, payload.order_id)?;
    if state.db.stores.get(&order.store_id)?.is_none() {
        return Err(AppError::bad_request("Order has no valid store"));
    }

    let origin = Coordinate {
        latitude: payload.latitude,
        longitude: payload.longitude,
    };
    let locations = state.db.driver_locations.list()?;
    let ratings: HashMap<Uuid, f64> = state
        .db
        .driver_performance
        .list()?
        .into_iter()
        .map(|p| (p.driver_id, p.rating))
        .collect();

    let candidates = dispatch::rank_candidates(
        origin,
        &locations,
        state.config.dispatch_radius_km,
        |id| ratings.get(&id).copied(),
    );
    let best = candidates
        .into_iter()
        .next()
        .ok_or_else(|| AppError::bad_request("No drivers available nearby"))?;

    tracing::debug!(
        order_id = %order.id,
        driver_id = %best.driver_id,
        distance_km = best.distance_km,
        score = best.score,
        "nearest driver selected"
    );
    let (order, delivery) = claim_order(state, order.id, best.driver_id)?;

    Ok(ApiResponse::success(
        "Driver assigned",
        AssignNearestResponse {
            order,
            assigned_driver: best,
            delivery,
        },
        Some(Meta::empty()),
    ))
}

fn store_route(
    state: &AppState,
    driver_id: Uuid,
    deliveries: Vec<Uuid>,
    optimized_sequence: Vec<Uuid>,
) -> AppResult<DeliveryRoute> {
    let stops = deliveries.len();
    state.db.delivery_routes.insert(DeliveryRoute {
        id: Uuid::new_v4(),
        driver_id,
        deliveries,
        optimized_sequence,
        total_distance_km: routing::estimated_distance_km(stops),
        estimated_time_minutes: routing::estimated_minutes(stops),
        status: RouteStatus::Planned,
        created_at: Utc::now(),
    })
}

pub async fn batch_optimize(
    state: &AppState,
    payload: BatchOptimizeRequest,
) -> AppResult<ApiResponse<BatchOptimizeResponse>> {
    let city = payload.city.trim();
    if city.is_empty() {
        return Err(AppError::bad_request("City required"));
    }
    let limit = payload
        .max_deliveries_per_route
        .filter(|n| *n > 0)
        .unwrap_or(state.config.default_route_size);

    let order_ids: Vec<Uuid> = state
        .db
        .orders
        .available_in_city(city)?
        .into_iter()
        .map(|o| o.id)
        .collect();
    if order_ids.is_empty() {
        return Ok(ApiResponse::success(
            "No deliveries available for optimization",
            BatchOptimizeResponse {
                routes: Vec::new(),
                total_deliveries: 0,
                routes_created: 0,
            },
            Some(Meta::empty()),
        ));
    }

    let driver_ids: Vec<Uuid> = state
        .db
        .users
        .by_role(UserRole::Driver)?
        .into_iter()
        .map(|u| u.id)
        .collect();

    let routes = routing::plan_batches(&order_ids, &driver_ids, limit)
        .into_iter()
        .map(|planned| {
            store_route(
                state,
                planned.driver_id,
                planned.order_ids.clone(),
                planned.order_ids,
            )
        })
        .collect::<AppResult<Vec<_>>>()?;

    tracing::info!(
        city,
        deliveries = order_ids.len(),
        routes = routes.len(),
        "batch routes planned"
    );
    Ok(ApiResponse::success(
        "Routes planned",
        BatchOptimizeResponse {
            routes_created: routes.len(),
            total_deliveries: order_ids.len(),
            routes,
        },
        Some(Meta::empty()),
    ))
}

pub async fn optimize_route(
    state: &AppState,
    payload: OptimizeRouteRequest,
) -> AppResult<ApiResponse<DeliveryRoute>> {
    if payload.order_ids.is_empty() {
        return Err(AppError::bad_request("Missing required fields"));
    }

    let mut orders = Vec::with_capacity(payload.order_ids.len());
    for id in &payload.order_ids {
        if let Some(order) = state.db.orders.get(id)? {
            orders.push(order);
        }
    }
    if orders.is_empty() {
        return Err(AppError::not_found("Orders"));
    }

    let deliveries = orders.iter().map(|o| o.id).collect();
    let sequence = routing::sequence_by_address(&orders);
    let route = store_route(state, payload.driver_id, deliveries, sequence)?;
    Ok(ApiResponse::success(
        "Route optimized successfully",
        route,
        Some(Meta::empty()),
    ))
}

pub async fn list_routes(state: &AppState, filter: DriverFilter) -> AppResult<ApiResponse<RouteList>> {
    let items = state
        .db
        .delivery_routes
        .filter(|r| filter.driver_id.is_none_or(|id| r.driver_id == id))?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Routes", RouteList { items }, Some(meta)))
}

pub async fn list_records(
    state: &AppState,
    filter: DriverFilter,
) -> AppResult<ApiResponse<DeliveryList>> {
    let items = state
        .db
        .deliveries
        .filter(|d| filter.driver_id.is_none_or(|id| d.driver_id == id))?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Deliveries", DeliveryList { items }, Some(meta)))
}

pub async fn list_zones(state: &AppState, query: ZoneQuery) -> AppResult<ApiResponse<Vec<DeliveryZone>>> {
    let zones = state
        .db
        .delivery_zones
        .filter(|z| query.city.as_deref().is_none_or(|city| z.city == city))?;
    let meta = Meta::total(zones.len());
    Ok(ApiResponse::success("Zones", zones, Some(meta)))
}

pub async fn create_zone(
    state: &AppState,
    payload: CreateZoneRequest,
) -> AppResult<ApiResponse<DeliveryZone>> {
    if payload.name.trim().is_empty() || payload.city.trim().is_empty() || payload.coordinates.is_empty() {
        return Err(AppError::bad_request("Missing required fields"));
    }
    if payload.delivery_fee < 0 {
        return Err(AppError::bad_request("Delivery fee cannot be negative"));
    }

    let zone = state.db.delivery_zones.insert(DeliveryZone {
        id: Uuid::new_v4(),
        name: payload.name,
        city: payload.city,
        coordinates: payload.coordinates,
        delivery_fee: payload.delivery_fee,
        estimated_time: payload
            .estimated_time
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_ZONE_MINUTES),
        active_drivers: 0,
        created_at: Utc::now(),
    })?;
    Ok(ApiResponse::success("Zone created", zone, Some(Meta::empty())))
}

/// Fixed preparation time plus the zone's travel estimate.
pub async fn predict_delivery(
    state: &AppState,
    payload: PredictionRequest,
) -> AppResult<ApiResponse<DeliveryPrediction>> {
    let order = order_service::load_order(state, payload.order_id)?;
    let store_name = state
        .db
        .stores
        .get(&order.store_id)?
        .map_or_else(|| "Unknown".to_string(), |s| s.name);
    let delivery_minutes = state
        .db
        .delivery_zones
        .filter(|z| z.city == order.city)?
        .first()
        .map_or(DEFAULT_ZONE_MINUTES, |z| z.estimated_time);

    let item_count = order.items.len();
    let confidence = (BASE_CONFIDENCE + item_count as f64 * CONFIDENCE_PER_ITEM).min(MAX_CONFIDENCE);
    let now = Utc::now();

    let prediction = DeliveryPrediction {
        order_id: order.id,
        estimated_pickup_time: PREPARATION_MINUTES,
        estimated_delivery_time: delivery_minutes,
        estimated_arrival: now + Duration::minutes(PREPARATION_MINUTES + delivery_minutes),
        confidence,
        factors: vec![
            format!("{item_count} items in order"),
            format!("Store: {store_name}"),
            format!("Zone: {}", order.city),
            format!("Time: {}:00", now.hour()),
        ],
    };
    Ok(ApiResponse::success("Prediction", prediction, Some(Meta::empty())))
}

/// One driver's record, or the best-rated drivers when no id is given.
pub async fn driver_performance(
    state: &AppState,
    filter: DriverFilter,
) -> AppResult<ApiResponse<Vec<DriverPerformance>>> {
    let items = match filter.driver_id {
        Some(driver_id) => {
            let record = state
                .db
                .driver_performance
                .get(&driver_id)?
                .ok_or_else(|| AppError::not_found("Driver performance"))?;
            vec![record]
        }
        None => {
            let mut all = state.db.driver_performance.list()?;
            all.sort_by(|a, b| b.rating.total_cmp(&a.rating));
            all.truncate(TOP_DRIVERS);
            all
        }
    };
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Driver performance", items, Some(meta)))
}

pub async fn record_performance(
    state: &AppState,
    payload: RecordPerformanceRequest,
) -> AppResult<ApiResponse<DriverPerformance>> {
    if payload.rating.is_some_and(|r| !(0.0..=5.0).contains(&r)) {
        return Err(AppError::bad_request("Rating must be between 0 and 5"));
    }
    let now = Utc::now();
    let created_at = state
        .db
        .driver_performance
        .get(&payload.driver_id)?
        .map_or(now, |p| p.created_at);

    let performance = state.db.driver_performance.insert(DriverPerformance {
        driver_id: payload.driver_id,
        total_deliveries: payload.total_deliveries.unwrap_or(0),
        average_delivery_time: payload.average_delivery_time.unwrap_or(0.0),
        on_time_percentage: payload.on_time_percentage.unwrap_or(0.0),
        rating: payload.rating.unwrap_or(0.0),
        earnings: payload.earnings.unwrap_or(0),
        created_at,
        updated_at: now,
    })?;
    Ok(ApiResponse::success("Performance recorded", performance, Some(Meta::empty())))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dispatch::DriverCandidate,
    models::{Coordinate, Delivery, DeliveryRoute, Order},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignNearestRequest {
    pub order_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignNearestResponse {
    pub order: Order,
    pub assigned_driver: DriverCandidate,
    pub delivery: Delivery,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchOptimizeRequest {
    pub city: String,
    pub max_deliveries_per_route: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchOptimizeResponse {
    pub routes: Vec<DeliveryRoute>,
    pub total_deliveries: usize,
    pub routes_created: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OptimizeRouteRequest {
    pub driver_id: Uuid,
    pub order_ids: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DriverFilter {
    pub driver_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RouteList {
    pub items: Vec<DeliveryRoute>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryList {
    pub items: Vec<Delivery>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ZoneQuery {
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateZoneRequest {
    pub name: String,
    pub city: String,
    pub coordinates: Vec<Coordinate>,
    pub delivery_fee: i64,
    /// Minutes; defaults to 30.
    pub estimated_time: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictionRequest {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryPrediction {
    pub order_id: Uuid,
    /// Minutes until pickup.
    pub estimated_pickup_time: i64,
    /// Minutes from pickup to the door.
    pub estimated_delivery_time: i64,
    pub estimated_arrival: DateTime<Utc>,
    pub confidence: f64,
    pub factors: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordPerformanceRequest {
    pub driver_id: Uuid,
    pub total_deliveries: Option<i64>,
    pub average_delivery_time: Option<f64>,
    pub on_time_percentage: Option<f64>,
    pub rating: Option<f64>,
    pub earnings: Option<i64>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::OrderStatus;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeliveriesQuery {
    pub driver_id: Option<Uuid>,
    /// `true` lists ready orders nobody has claimed.
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AcceptDeliveryRequest {
    pub order_id: Uuid,
    pub driver_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DriverStatusRequest {
    pub driver_id: Uuid,
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationUpdateRequest {
    pub driver_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub is_available: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyDriver {
    pub driver_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_km: f64,
}

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::OrderStatus;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VendorOrdersQuery {
    pub vendor_id: Option<Uuid>,
    pub store_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VendorStatusRequest {
    pub order_id: Uuid,
    /// When present, the order's store must belong to this vendor.
    pub vendor_id: Option<Uuid>,
    pub status: OrderStatus,
}

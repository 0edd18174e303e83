use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderStatus, PaymentMethod};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Prices come from the catalog; totals are computed server-side.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub store_id: Uuid,
    pub items: Vec<OrderItemInput>,
    /// Defaults to the fee of the first delivery zone in `city`, or 0.
    pub delivery_fee: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_address: String,
    pub city: String,
    pub customer_phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    pub driver_id: Option<Uuid>,
}

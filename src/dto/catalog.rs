use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Product, Store};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StoreQuery {
    pub vendor_id: Option<Uuid>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub store_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAvailabilityRequest {
    pub product_id: Uuid,
    pub available: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreList {
    pub items: Vec<Store>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::VendorReview;

#[derive(Debug, Deserialize, ToSchema)]
pub struct VendorQuery {
    pub vendor_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// Sub-scores default to the overall rating.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub vendor_id: Uuid,
    pub customer_id: Uuid,
    pub order_id: Uuid,
    pub rating: u8,
    pub food_quality: Option<u8>,
    pub delivery_time: Option<u8>,
    pub customer_service: Option<u8>,
    pub comment: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub items: Vec<VendorReview>,
}

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::analytics::ForecastPeriod;

#[derive(Debug, Deserialize, ToSchema)]
pub struct VendorAnalyticsQuery {
    pub vendor_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForecastQuery {
    pub vendor_id: Uuid,
    #[serde(default)]
    pub period: ForecastPeriod,
}

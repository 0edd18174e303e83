use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    analytics::{CustomerInsights, SalesForecast, VendorMetrics},
    dto::analytics::{ForecastQuery, VendorAnalyticsQuery},
    error::AppResult,
    response::ApiResponse,
    services::analytics_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/customer-insights", get(customer_insights))
        .route("/sales-forecast", get(sales_forecast))
}

#[utoipa::path(
    get,
    path = "/api/analytics/dashboard",
    params(
        ("vendor_id" = Uuid, Query, description = "Vendor whose stores to aggregate")
    ),
    responses(
        (status = 200, description = "Revenue and order counts", body = ApiResponse<VendorMetrics>)
    ),
    tag = "Analytics"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<VendorAnalyticsQuery>,
) -> AppResult<Json<ApiResponse<VendorMetrics>>> {
    let resp = analytics_service::dashboard(&state, query.vendor_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/customer-insights",
    params(
        ("vendor_id" = Uuid, Query, description = "Vendor whose stores to aggregate")
    ),
    responses(
        (status = 200, description = "Repeat customers and top spenders", body = ApiResponse<CustomerInsights>)
    ),
    tag = "Analytics"
)]
pub async fn customer_insights(
    State(state): State<AppState>,
    Query(query): Query<VendorAnalyticsQuery>,
) -> AppResult<Json<ApiResponse<CustomerInsights>>> {
    let resp = analytics_service::customer_insights(&state, query.vendor_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/sales-forecast",
    params(
        ("vendor_id" = Uuid, Query, description = "Vendor whose stores to aggregate"),
        ("period" = Option<String>, Query, description = "week (default) or month")
    ),
    responses(
        (status = 200, description = "Projected revenue", body = ApiResponse<SalesForecast>)
    ),
    tag = "Analytics"
)]
pub async fn sales_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<ApiResponse<SalesForecast>>> {
    let resp = analytics_service::sales_forecast(&state, query.vendor_id, query.period).await?;
    Ok(Json(resp))
}

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::response::{ApiResponse, Meta};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Liveness check for load balancers; touches no repository.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Marketplace API is up", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    };
    Json(ApiResponse::success("Marketplace API is healthy", data, Some(Meta::empty())))
}

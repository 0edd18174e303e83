use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    analytics::VendorPerformance,
    dto::ratings::{CreateReviewRequest, LeaderboardQuery, ReviewList, VendorQuery},
    error::AppResult,
    models::VendorReview,
    response::ApiResponse,
    services::rating_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .route("/vendor-performance", get(vendor_performance))
        .route("/vendor-leaderboard", get(vendor_leaderboard))
}

#[utoipa::path(
    get,
    path = "/api/ratings/reviews",
    params(
        ("vendor_id" = Uuid, Query, description = "Reviewed vendor")
    ),
    responses(
        (status = 200, description = "Reviews, newest first", body = ApiResponse<ReviewList>)
    ),
    tag = "Ratings"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<VendorQuery>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = rating_service::list_reviews(&state, query.vendor_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/ratings/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review created", body = ApiResponse<VendorReview>),
        (status = 400, description = "Score out of range or order already reviewed"),
        (status = 403, description = "Order belongs to another customer"),
        (status = 404, description = "Order not found")
    ),
    tag = "Ratings"
)]
pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<VendorReview>>> {
    let resp = rating_service::create_review(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/ratings/vendor-performance",
    params(
        ("vendor_id" = Uuid, Query, description = "Reviewed vendor")
    ),
    responses(
        (status = 200, description = "Review aggregates", body = ApiResponse<VendorPerformance>),
        (status = 404, description = "No reviews yet")
    ),
    tag = "Ratings"
)]
pub async fn vendor_performance(
    State(state): State<AppState>,
    Query(query): Query<VendorQuery>,
) -> AppResult<Json<ApiResponse<VendorPerformance>>> {
    let resp = rating_service::vendor_performance(&state, query.vendor_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/ratings/vendor-leaderboard",
    params(
        ("limit" = Option<usize>, Query, description = "Vendors to return, default 10")
    ),
    responses(
        (status = 200, description = "Vendors by average rating", body = ApiResponse<Vec<VendorPerformance>>)
    ),
    tag = "Ratings"
)]
pub async fn vendor_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<ApiResponse<Vec<VendorPerformance>>>> {
    let resp = rating_service::vendor_leaderboard(&state, query.limit).await?;
    Ok(Json(resp))
}

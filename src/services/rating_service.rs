use chrono::Utc;
use uuid::Uuid;

use crate::{
    analytics::{self, VendorPerformance},
    db::Repository,
    dto::ratings::{CreateReviewRequest, ReviewList},
    error::{AppError, AppResult},
    models::VendorReview,
    response::{ApiResponse, Meta},
    services::order_service,
    state::AppState,
};

const DEFAULT_LEADERBOARD_SIZE: usize = 10;

fn check_score(name: &str, score: u8) -> AppResult<u8> {
    if (1..=5).contains(&score) {
        Ok(score)
    } else {
        Err(AppError::bad_request(format!("{name} must be between 1 and 5")))
    }
}

pub async fn list_reviews(state: &AppState, vendor_id: Uuid) -> AppResult<ApiResponse<ReviewList>> {
    let mut items = state.db.reviews.filter(|r| r.vendor_id == vendor_id)?;
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Reviews", ReviewList { items }, Some(meta)))
}

/// One review per order, written by the order's customer about the store's vendor.
pub async fn create_review(
    state: &AppState,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<VendorReview>> {
    let rating = check_score("rating", payload.rating)?;
    let food_quality = check_score("food_quality", payload.food_quality.unwrap_or(rating))?;
    let delivery_time = check_score("delivery_time", payload.delivery_time.unwrap_or(rating))?;
    let customer_service =
        check_score("customer_service", payload.customer_service.unwrap_or(rating))?;

    let order = order_service::load_order(state, payload.order_id)?;
    if order.customer_id != payload.customer_id {
        return Err(AppError::Forbidden("Order belongs to another customer".into()));
    }
    let store = state
        .db
        .stores
        .get(&order.store_id)?
        .ok_or_else(|| AppError::not_found("Store"))?;
    if store.vendor_id != payload.vendor_id {
        return Err(AppError::bad_request("Order was not placed with this vendor"));
    }
    if !state.db.reviews.filter(|r| r.order_id == order.id)?.is_empty() {
        return Err(AppError::bad_request("Order already reviewed"));
    }

    let now = Utc::now();
    let review = state.db.reviews.insert(VendorReview {
        id: Uuid::new_v4(),
        vendor_id: payload.vendor_id,
        customer_id: payload.customer_id,
        order_id: order.id,
        rating,
        food_quality,
        delivery_time,
        customer_service,
        comment: payload.comment,
        photos: payload.photos,
        helpful: 0,
        unhelpful: 0,
        created_at: now,
        updated_at: now,
    })?;

    tracing::info!(review_id = %review.id, vendor_id = %review.vendor_id, rating, "review created");
    Ok(ApiResponse::success("Review created", review, Some(Meta::empty())))
}

pub async fn vendor_performance(
    state: &AppState,
    vendor_id: Uuid,
) -> AppResult<ApiResponse<VendorPerformance>> {
    let reviews = state.db.reviews.list()?;
    let performance = analytics::vendor_performance(vendor_id, &reviews)
        .ok_or_else(|| AppError::NotFound("No performance data found".into()))?;
    Ok(ApiResponse::success("Vendor performance", performance, Some(Meta::empty())))
}

pub async fn vendor_leaderboard(
    state: &AppState,
    limit: Option<usize>,
) -> AppResult<ApiResponse<Vec<VendorPerformance>>> {
    let reviews = state.db.reviews.list()?;
    let limit = limit.filter(|n| *n > 0).unwrap_or(DEFAULT_LEADERBOARD_SIZE);
    let board = analytics::vendor_leaderboard(&reviews, limit);
    let meta = Meta::total(board.len());
    Ok(ApiResponse::success("Vendor leaderboard", board, Some(meta)))
}

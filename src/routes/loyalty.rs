use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::{
        loyalty::{
            LoyaltyTransactionList, PointsAdjustRequest, PointsUpdate, RedeemRequest,
            RedeemResponse, RedemptionList, RewardList,
        },
        wallet::CustomerQuery,
    },
    error::AppResult,
    models::LoyaltyAccount,
    response::ApiResponse,
    services::loyalty_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/account", get(get_account).post(adjust_points))
        .route("/rewards", get(list_rewards).post(redeem_reward))
        .route("/transactions", get(list_transactions))
        .route("/redemptions", get(list_redemptions))
}

#[utoipa::path(
    get,
    path = "/api/loyalty/account",
    params(
        ("customer_id" = Uuid, Query, description = "Account owner; the account is created on first use")
    ),
    responses(
        (status = 200, description = "Loyalty account", body = ApiResponse<LoyaltyAccount>)
    ),
    tag = "Loyalty"
)]
pub async fn get_account(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<ApiResponse<LoyaltyAccount>>> {
    let resp = loyalty_service::get_account(&state, query.customer_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/loyalty/account",
    request_body = PointsAdjustRequest,
    responses(
        (status = 200, description = "Points awarded or deducted", body = ApiResponse<PointsUpdate>),
        (status = 400, description = "Zero points or insufficient points"),
        (status = 404, description = "Loyalty account not found")
    ),
    tag = "Loyalty"
)]
pub async fn adjust_points(
    State(state): State<AppState>,
    Json(payload): Json<PointsAdjustRequest>,
) -> AppResult<Json<ApiResponse<PointsUpdate>>> {
    let resp = loyalty_service::adjust_points(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/loyalty/rewards",
    responses(
        (status = 200, description = "Active rewards", body = ApiResponse<RewardList>)
    ),
    tag = "Loyalty"
)]
pub async fn list_rewards(State(state): State<AppState>) -> AppResult<Json<ApiResponse<RewardList>>> {
    let resp = loyalty_service::list_rewards(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/loyalty/rewards",
    request_body = RedeemRequest,
    responses(
        (status = 200, description = "Reward redeemed", body = ApiResponse<RedeemResponse>),
        (status = 400, description = "Insufficient points"),
        (status = 404, description = "Reward or account not found")
    ),
    tag = "Loyalty"
)]
pub async fn redeem_reward(
    State(state): State<AppState>,
    Json(payload): Json<RedeemRequest>,
) -> AppResult<Json<ApiResponse<RedeemResponse>>> {
    let resp = loyalty_service::redeem_reward(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/loyalty/transactions",
    params(
        ("customer_id" = Uuid, Query, description = "Account owner")
    ),
    responses(
        (status = 200, description = "Points ledger", body = ApiResponse<LoyaltyTransactionList>),
        (status = 404, description = "Loyalty account not found")
    ),
    tag = "Loyalty"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<ApiResponse<LoyaltyTransactionList>>> {
    let resp = loyalty_service::list_transactions(&state, query.customer_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/loyalty/redemptions",
    params(
        ("customer_id" = Uuid, Query, description = "Redeeming customer")
    ),
    responses(
        (status = 200, description = "Redemptions", body = ApiResponse<RedemptionList>)
    ),
    tag = "Loyalty"
)]
pub async fn list_redemptions(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<ApiResponse<RedemptionList>>> {
    let resp = loyalty_service::list_redemptions(&state, query.customer_id).await?;
    Ok(Json(resp))
}

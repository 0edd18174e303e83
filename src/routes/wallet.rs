use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::wallet::{CustomerQuery, WalletAdjustRequest, WalletTransactionList, WalletUpdate},
    error::AppResult,
    models::Wallet,
    response::ApiResponse,
    services::wallet_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/balance", get(get_wallet).post(adjust_wallet))
        .route("/transactions", get(list_transactions))
}

#[utoipa::path(
    get,
    path = "/api/wallet/balance",
    params(
        ("customer_id" = Uuid, Query, description = "Wallet owner; the wallet is created on first use")
    ),
    responses(
        (status = 200, description = "Wallet", body = ApiResponse<Wallet>)
    ),
    tag = "Wallet"
)]
pub async fn get_wallet(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<ApiResponse<Wallet>>> {
    let resp = wallet_service::get_wallet(&state, query.customer_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wallet/balance",
    request_body = WalletAdjustRequest,
    responses(
        (status = 200, description = "Wallet credited or debited", body = ApiResponse<WalletUpdate>),
        (status = 400, description = "Zero amount or insufficient balance")
    ),
    tag = "Wallet"
)]
pub async fn adjust_wallet(
    State(state): State<AppState>,
    Json(payload): Json<WalletAdjustRequest>,
) -> AppResult<Json<ApiResponse<WalletUpdate>>> {
    let resp = wallet_service::adjust_wallet(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/wallet/transactions",
    params(
        ("customer_id" = Uuid, Query, description = "Wallet owner")
    ),
    responses(
        (status = 200, description = "Wallet ledger", body = ApiResponse<WalletTransactionList>)
    ),
    tag = "Wallet"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<ApiResponse<WalletTransactionList>>> {
    let resp = wallet_service::list_transactions(&state, query.customer_id).await?;
    Ok(Json(resp))
}

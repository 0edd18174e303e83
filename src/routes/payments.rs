use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::{
        payments::{CreatePaymentRequest, CreateRefundRequest, PaymentList, RefundList},
        wallet::CustomerQuery,
    },
    error::AppResult,
    models::{Payment, Refund},
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment))
        .route("/history", get(payment_history))
        .route("/refunds", get(list_refunds).post(create_refund))
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Payment recorded; wallet payments debit the wallet", body = ApiResponse<Payment>),
        (status = 400, description = "Invalid amount or insufficient balance"),
        (status = 403, description = "Order belongs to another customer"),
        (status = 404, description = "Order not found")
    ),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let resp = payment_service::create_payment(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/history",
    params(
        ("customer_id" = Uuid, Query, description = "Paying customer")
    ),
    responses(
        (status = 200, description = "Payments", body = ApiResponse<PaymentList>)
    ),
    tag = "Payments"
)]
pub async fn payment_history(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    let resp = payment_service::payment_history(&state, query.customer_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/refunds",
    params(
        ("customer_id" = Uuid, Query, description = "Refunded customer")
    ),
    responses(
        (status = 200, description = "Refunds", body = ApiResponse<RefundList>)
    ),
    tag = "Payments"
)]
pub async fn list_refunds(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<ApiResponse<RefundList>>> {
    let resp = payment_service::list_refunds(&state, query.customer_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/refunds",
    request_body = CreateRefundRequest,
    responses(
        (status = 200, description = "Refund requested", body = ApiResponse<Refund>),
        (status = 400, description = "Amount exceeds the payment"),
        (status = 404, description = "Payment not found")
    ),
    tag = "Payments"
)]
pub async fn create_refund(
    State(state): State<AppState>,
    Json(payload): Json<CreateRefundRequest>,
) -> AppResult<Json<ApiResponse<Refund>>> {
    let resp = payment_service::create_refund(&state, payload).await?;
    Ok(Json(resp))
}

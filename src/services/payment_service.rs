use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::Repository,
    dto::payments::{CreatePaymentRequest, CreateRefundRequest, PaymentList, RefundList},
    error::{AppError, AppResult},
    models::{Payment, PaymentMethod, PaymentStatus, Refund, RefundStatus},
    response::{ApiResponse, Meta},
    services::{order_service, wallet_service},
    state::AppState,
};

pub async fn create_payment(
    state: &AppState,
    payload: CreatePaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    let order = order_service::load_order(state, payload.order_id)?;
    if order.customer_id != payload.customer_id {
        return Err(AppError::Forbidden("Order belongs to another customer".into()));
    }
    let amount = payload.amount.unwrap_or(order.total);
    if amount <= 0 {
        return Err(AppError::bad_request("Amount must be positive"));
    }

    // The debit runs first so a short wallet never leaves a payment behind.
    // The debit and the payment insert are separate writes.
    let status = match payload.method {
        PaymentMethod::Wallet => {
            wallet_service::apply_amount(
                &state.db,
                payload.customer_id,
                -amount,
                &format!("Payment for order {}", order.id),
                Some(order.id),
            )?;
            PaymentStatus::Completed
        }
        PaymentMethod::Cash | PaymentMethod::Card => PaymentStatus::Pending,
    };

    let payment = state.db.payments.insert(Payment {
        id: Uuid::new_v4(),
        order_id: order.id,
        customer_id: payload.customer_id,
        amount,
        method: payload.method,
        status,
        transaction_id: payload.transaction_id,
        created_at: Utc::now(),
    })?;

    if let Err(err) = log_audit(
        &state.db,
        Some(payment.customer_id),
        "payment_create",
        Some("payments"),
        Some(serde_json::json!({ "payment_id": payment.id, "order_id": order.id, "amount": amount })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }
    Ok(ApiResponse::success("Payment recorded", payment, Some(Meta::empty())))
}

pub async fn payment_history(
    state: &AppState,
    customer_id: Uuid,
) -> AppResult<ApiResponse<PaymentList>> {
    let items = state.db.payments.filter(|p| p.customer_id == customer_id)?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Payments", PaymentList { items }, Some(meta)))
}

pub async fn create_refund(
    state: &AppState,
    payload: CreateRefundRequest,
) -> AppResult<ApiResponse<Refund>> {
    if payload.reason.trim().is_empty() {
        return Err(AppError::bad_request("Missing required fields"));
    }
    let payment = state
        .db
        .payments
        .get(&payload.payment_id)?
        .ok_or_else(|| AppError::not_found("Payment"))?;

    let already_requested: i64 = state
        .db
        .refunds
        .filter(|r| r.payment_id == payment.id && r.status != RefundStatus::Rejected)?
        .iter()
        .map(|r| r.amount)
        .sum();
    let requested = payload.amount.checked_add(already_requested);
    if payload.amount <= 0 || requested.is_none_or(|total| total > payment.amount) {
        return Err(AppError::bad_request("Refund amount exceeds the payment"));
    }

    let refund = state.db.refunds.insert(Refund {
        id: Uuid::new_v4(),
        payment_id: payment.id,
        order_id: payment.order_id,
        customer_id: payment.customer_id,
        amount: payload.amount,
        reason: payload.reason,
        status: RefundStatus::Pending,
        created_at: Utc::now(),
    })?;

    tracing::info!(refund_id = %refund.id, payment_id = %payment.id, amount = refund.amount, "refund requested");
    Ok(ApiResponse::success("Refund requested", refund, Some(Meta::empty())))
}

pub async fn list_refunds(state: &AppState, customer_id: Uuid) -> AppResult<ApiResponse<RefundList>> {
    let items = state.db.refunds.filter(|r| r.customer_id == customer_id)?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Refunds", RefundList { items }, Some(meta)))
}

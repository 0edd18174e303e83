use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::Repository,
    dto::{
        admin::{
            AdminOrderStatusRequest, AuditLogList, AuditLogQuery, RegistrationAction,
            RegistrationDecision, RegistrationDecisionResponse, RegistrationRequestList, UserList,
            UserListQuery,
        },
        orders::OrderList,
    },
    error::{AppError, AppResult},
    models::{ApprovalStatus, Order, OrderStatus, UserRole},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, Pagination, SortOrder},
    services::{
        auth_service::{ensure_admin, ensure_role, materialize_user},
        delivery_service, order_service,
    },
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    admin_id: Uuid,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(&state.db, admin_id)?;
    let mut orders = state.db.orders.filter(|o| {
        query.status.is_none_or(|s| o.status == s)
            && query.customer_id.is_none_or(|id| o.customer_id == id)
            && query.store_id.is_none_or(|id| o.store_id == id)
    })?;
    match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => orders.sort_by_key(|o| o.created_at),
        SortOrder::Desc => orders.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    let (items, meta) = query.pagination().apply(orders);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order_admin(
    state: &AppState,
    admin_id: Uuid,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(&state.db, admin_id)?;
    let order = order_service::load_order(state, id)?;
    Ok(ApiResponse::success("Order found", order, Some(Meta::empty())))
}

/// Move an order through the lifecycle on an admin's behalf.
///
/// Assignment goes through the same claim as a driver accepting the order,
/// so it still opens a delivery record.
pub async fn update_order_status(
    state: &AppState,
    id: Uuid,
    payload: AdminOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(&state.db, payload.admin_id)?;

    let order = if payload.status == OrderStatus::Assigned {
        let driver_id = payload
            .driver_id
            .ok_or_else(|| AppError::bad_request("driver_id is required to assign"))?;
        ensure_role(&state.db, driver_id, UserRole::Driver)?;
        delivery_service::claim_order(state, id, driver_id)?.0
    } else {
        order_service::transition(state, id, payload.status, None, |_| Ok(()))?
    };

    if let Err(err) = log_audit(
        &state.db,
        Some(payload.admin_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

/// Every account except administrators.
pub async fn list_users(state: &AppState, query: UserListQuery) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(&state.db, query.admin_id)?;
    let items = state
        .db
        .users
        .filter(|u| u.role != UserRole::Admin && query.role.is_none_or(|r| u.role == r))?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn list_registration_requests(
    state: &AppState,
    admin_id: Uuid,
) -> AppResult<ApiResponse<RegistrationRequestList>> {
    ensure_admin(&state.db, admin_id)?;
    let items = state
        .db
        .registration_requests
        .filter(|r| r.status == ApprovalStatus::Pending)?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Pending registration requests",
        RegistrationRequestList { items },
        Some(meta),
    ))
}

/// Approve or reject a pending request. Approval creates the account.
pub async fn decide_registration(
    state: &AppState,
    payload: RegistrationDecision,
) -> AppResult<ApiResponse<RegistrationDecisionResponse>> {
    ensure_admin(&state.db, payload.admin_id)?;

    if payload.action == RegistrationAction::Approve {
        let pending = state
            .db
            .registration_requests
            .get(&payload.request_id)?
            .ok_or_else(|| AppError::not_found("Pending request"))?;
        if state.db.users.by_email(&pending.email)?.is_some() {
            return Err(AppError::bad_request("Email is already taken"));
        }
    }

    let status = match payload.action {
        RegistrationAction::Approve => ApprovalStatus::Approved,
        RegistrationAction::Reject => ApprovalStatus::Rejected,
    };
    let request = state
        .db
        .registration_requests
        .update(&payload.request_id, |r| {
            if r.status != ApprovalStatus::Pending {
                return Err(AppError::not_found("Pending request"));
            }
            r.status = status;
            r.reviewed_at = Some(Utc::now());
            r.reviewed_by = Some(payload.admin_id);
            Ok(r.clone())
        })?
        .ok_or_else(|| AppError::not_found("Pending request"))?;

    let user = match payload.action {
        RegistrationAction::Approve => Some(materialize_user(&state.db, &request)?),
        RegistrationAction::Reject => None,
    };

    if let Err(err) = log_audit(
        &state.db,
        Some(payload.admin_id),
        "registration_review",
        Some("registration_requests"),
        Some(serde_json::json!({ "request_id": request.id, "status": request.status })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }
    tracing::info!(request_id = %request.id, role = request.role.as_str(), "registration reviewed");

    let message = match payload.action {
        RegistrationAction::Approve => "Registration approved",
        RegistrationAction::Reject => "Registration rejected",
    };
    Ok(ApiResponse::success(
        message,
        RegistrationDecisionResponse { request, user },
        Some(Meta::empty()),
    ))
}

pub async fn list_audit_logs(
    state: &AppState,
    query: AuditLogQuery,
) -> AppResult<ApiResponse<AuditLogList>> {
    ensure_admin(&state.db, query.admin_id)?;
    let mut logs = state.db.audit_logs.filter(|l| {
        query.user_id.is_none_or(|id| l.user_id == Some(id))
            && query.action.as_deref().is_none_or(|a| l.action == a)
    })?;
    logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let pagination = Pagination {
        page: query.page,
        per_page: query.per_page,
    };
    let (items, meta) = pagination.apply(logs);
    Ok(ApiResponse::success("Audit logs", AuditLogList { items }, Some(meta)))
}

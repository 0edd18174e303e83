use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{
            AdminOrderStatusRequest, AdminQuery, AuditLogList, AuditLogQuery,
            RegistrationDecision, RegistrationDecisionResponse, RegistrationRequestList, UserList,
            UserListQuery,
        },
        orders::OrderList,
    },
    error::AppResult,
    models::Order,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/users", get(list_users))
        .route(
            "/registration-requests",
            get(list_registration_requests).post(decide_registration),
        )
        .route("/audit-logs", get(list_audit_logs))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("admin_id" = Uuid, Query, description = "Acting administrator"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Get all orders (admin only)", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    Query(admin): Query<AdminQuery>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, admin.admin_id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("admin_id" = Uuid, Query, description = "Acting administrator")
    ),
    responses(
        (status = 200, description = "Get order (admin only)", body = ApiResponse<Order>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(admin): Query<AdminQuery>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::get_order_admin(&state, admin.admin_id, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = AdminOrderStatusRequest,
    responses(
        (status = 200, description = "Update order status (admin only)", body = ApiResponse<Order>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Illegal transition"),
    ),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("admin_id" = Uuid, Query, description = "Acting administrator"),
        ("role" = Option<String>, Query, description = "customer, vendor or driver")
    ),
    responses(
        (status = 200, description = "Non-admin users", body = ApiResponse<UserList>),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/registration-requests",
    params(
        ("admin_id" = Uuid, Query, description = "Acting administrator")
    ),
    responses(
        (status = 200, description = "Pending registration requests", body = ApiResponse<RegistrationRequestList>),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn list_registration_requests(
    State(state): State<AppState>,
    Query(admin): Query<AdminQuery>,
) -> AppResult<Json<ApiResponse<RegistrationRequestList>>> {
    let resp = admin_service::list_registration_requests(&state, admin.admin_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/registration-requests",
    request_body = RegistrationDecision,
    responses(
        (status = 200, description = "Request approved or rejected", body = ApiResponse<RegistrationDecisionResponse>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No pending request"),
    ),
    tag = "Admin"
)]
pub async fn decide_registration(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationDecision>,
) -> AppResult<Json<ApiResponse<RegistrationDecisionResponse>>> {
    let resp = admin_service::decide_registration(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(
        ("admin_id" = Uuid, Query, description = "Acting administrator"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("user_id" = Option<Uuid>, Query, description = "Entries by this user"),
        ("action" = Option<String>, Query, description = "Entries with this action")
    ),
    responses(
        (status = 200, description = "Audit trail, newest first", body = ApiResponse<AuditLogList>),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(query): Query<AuditLogQuery>,
) -> AppResult<Json<ApiResponse<AuditLogList>>> {
    let resp = admin_service::list_audit_logs(&state, query).await?;
    Ok(Json(resp))
}

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::support::{
        CreateTicketRequest, TicketList, TicketQuery, TicketReplyRequest, TicketStatusRequest,
    },
    error::AppResult,
    models::SupportTicket,
    response::ApiResponse,
    services::support_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tickets", get(list_tickets).post(create_ticket))
        .route("/tickets/{id}/status", patch(update_ticket_status))
        .route("/tickets/{id}/messages", post(reply_to_ticket))
}

#[utoipa::path(
    get,
    path = "/api/support/tickets",
    params(
        ("customer_id" = Option<Uuid>, Query, description = "Tickets of this customer"),
        ("status" = Option<String>, Query, description = "Tickets in this status")
    ),
    responses(
        (status = 200, description = "Tickets, newest first", body = ApiResponse<TicketList>),
        (status = 400, description = "No filter given")
    ),
    tag = "Support"
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<TicketQuery>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let resp = support_service::list_tickets(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/support/tickets",
    request_body = CreateTicketRequest,
    responses(
        (status = 200, description = "Ticket opened", body = ApiResponse<SupportTicket>),
        (status = 400, description = "Missing fields")
    ),
    tag = "Support"
)]
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(payload): Json<CreateTicketRequest>,
) -> AppResult<Json<ApiResponse<SupportTicket>>> {
    let resp = support_service::create_ticket(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/support/tickets/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Ticket ID")
    ),
    request_body = TicketStatusRequest,
    responses(
        (status = 200, description = "Ticket updated", body = ApiResponse<SupportTicket>),
        (status = 404, description = "Ticket not found")
    ),
    tag = "Support"
)]
pub async fn update_ticket_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TicketStatusRequest>,
) -> AppResult<Json<ApiResponse<SupportTicket>>> {
    let resp = support_service::update_ticket_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/support/tickets/{id}/messages",
    params(
        ("id" = Uuid, Path, description = "Ticket ID")
    ),
    request_body = TicketReplyRequest,
    responses(
        (status = 200, description = "Reply added", body = ApiResponse<SupportTicket>),
        (status = 400, description = "Empty message or closed ticket"),
        (status = 404, description = "Ticket not found")
    ),
    tag = "Support"
)]
pub async fn reply_to_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TicketReplyRequest>,
) -> AppResult<Json<ApiResponse<SupportTicket>>> {
    let resp = support_service::reply_to_ticket(&state, id, payload).await?;
    Ok(Json(resp))
}

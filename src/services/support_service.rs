use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::Repository,
    dto::support::{
        CreateTicketRequest, TicketList, TicketQuery, TicketReplyRequest, TicketStatusRequest,
    },
    error::{AppError, AppResult},
    models::{SupportTicket, TicketCategory, TicketMessage, TicketPriority, TicketStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Tickets of one customer, or every ticket in a status.
pub async fn list_tickets(state: &AppState, query: TicketQuery) -> AppResult<ApiResponse<TicketList>> {
    if query.customer_id.is_none() && query.status.is_none() {
        return Err(AppError::bad_request("customer_id or status is required"));
    }
    let mut items = state.db.support_tickets.filter(|t| {
        query.customer_id.is_none_or(|id| t.customer_id == id)
            && query.status.is_none_or(|s| t.status == s)
    })?;
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Tickets", TicketList { items }, Some(meta)))
}

pub async fn create_ticket(
    state: &AppState,
    payload: CreateTicketRequest,
) -> AppResult<ApiResponse<SupportTicket>> {
    if payload.subject.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(AppError::bad_request("Missing required fields"));
    }

    let now = Utc::now();
    let ticket = state.db.support_tickets.insert(SupportTicket {
        id: Uuid::new_v4(),
        customer_id: payload.customer_id,
        subject: payload.subject,
        description: payload.description,
        category: payload.category.unwrap_or(TicketCategory::Other),
        priority: payload.priority.unwrap_or(TicketPriority::Medium),
        status: TicketStatus::Open,
        messages: Vec::new(),
        created_at: now,
        updated_at: now,
        resolved_at: None,
    })?;

    tracing::info!(ticket_id = %ticket.id, customer_id = %ticket.customer_id, "support ticket opened");
    Ok(ApiResponse::success("Ticket created", ticket, Some(Meta::empty())))
}

pub async fn update_ticket_status(
    state: &AppState,
    id: Uuid,
    payload: TicketStatusRequest,
) -> AppResult<ApiResponse<SupportTicket>> {
    let ticket = state
        .db
        .support_tickets
        .update(&id, |t| {
            let now = Utc::now();
            t.status = payload.status;
            t.updated_at = now;
            t.resolved_at = match payload.status {
                TicketStatus::Resolved | TicketStatus::Closed => t.resolved_at.or(Some(now)),
                TicketStatus::Open | TicketStatus::InProgress => None,
            };
            Ok(t.clone())
        })?
        .ok_or_else(|| AppError::not_found("Ticket"))?;
    Ok(ApiResponse::success("Ticket updated", ticket, Some(Meta::empty())))
}

pub async fn reply_to_ticket(
    state: &AppState,
    id: Uuid,
    payload: TicketReplyRequest,
) -> AppResult<ApiResponse<SupportTicket>> {
    if payload.message.trim().is_empty() {
        return Err(AppError::bad_request("Message is empty"));
    }

    let ticket = state
        .db
        .support_tickets
        .update(&id, |t| {
            if t.status == TicketStatus::Closed {
                return Err(AppError::bad_request("Ticket is closed"));
            }
            let now = Utc::now();
            t.messages.push(TicketMessage {
                id: Uuid::new_v4(),
                author_id: payload.author_id,
                author_role: payload.author_role,
                message: payload.message,
                created_at: now,
            });
            t.updated_at = now;
            Ok(t.clone())
        })?
        .ok_or_else(|| AppError::not_found("Ticket"))?;
    Ok(ApiResponse::success("Reply added", ticket, Some(Meta::empty())))
}

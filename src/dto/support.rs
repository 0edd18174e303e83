use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{SupportTicket, TicketCategory, TicketPriority, TicketStatus, UserRole};

#[derive(Debug, Deserialize, ToSchema)]
pub struct TicketQuery {
    pub customer_id: Option<Uuid>,
    pub status: Option<TicketStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTicketRequest {
    pub customer_id: Uuid,
    pub subject: String,
    pub description: String,
    pub category: Option<TicketCategory>,
    pub priority: Option<TicketPriority>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TicketStatusRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TicketReplyRequest {
    pub author_id: Uuid,
    pub author_role: UserRole,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketList {
    pub items: Vec<SupportTicket>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{AuditLog, OrderStatus, RegistrationRequest, User, UserRole};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminQuery {
    pub admin_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminOrderStatusRequest {
    pub admin_id: Uuid,
    pub status: OrderStatus,
    /// Required when assigning.
    pub driver_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserListQuery {
    pub admin_id: Uuid,
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationAction {
    Approve,
    Reject,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegistrationDecision {
    pub request_id: Uuid,
    pub action: RegistrationAction,
    pub admin_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationDecisionResponse {
    pub request: RegistrationRequest,
    /// Present when the request was approved.
    pub user: Option<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationRequestList {
    pub items: Vec<RegistrationRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AuditLogQuery {
    pub admin_id: Uuid,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogList {
    pub items: Vec<AuditLog>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{User, UserRole};

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub role: UserRole,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub license_number: Option<String>,
    pub shop_type: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Customers get a user straight away; drivers and vendors get a pending request.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub auto_approved: bool,
    pub user: Option<User>,
    pub request_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: User,
}

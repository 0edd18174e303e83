use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{ChatMessage, Conversation, ConversationKind, UserRole};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenConversationRequest {
    pub participant_ids: Vec<Uuid>,
    pub participant_roles: Vec<UserRole>,
    pub kind: ConversationKind,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MessagesQuery {
    pub conversation_id: Uuid,
    /// Messages from others are marked read for this user.
    pub user_id: Option<Uuid>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub sender_role: UserRole,
    pub sender_name: Option<String>,
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationList {
    pub items: Vec<Conversation>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageList {
    pub items: Vec<ChatMessage>,
}

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::chat::{
        ConversationList, MessageList, MessagesQuery, OpenConversationRequest, SendMessageRequest,
        UserQuery,
    },
    error::AppResult,
    models::{ChatMessage, Conversation},
    response::ApiResponse,
    services::chat_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(list_conversations).post(open_conversation))
        .route("/messages", get(list_messages))
        .route("/send", post(send_message))
}

#[utoipa::path(
    get,
    path = "/api/chat/conversations",
    params(
        ("user_id" = Uuid, Query, description = "Participant")
    ),
    responses(
        (status = 200, description = "Conversations, most recent first", body = ApiResponse<ConversationList>)
    ),
    tag = "Chat"
)]
pub async fn list_conversations(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<ApiResponse<ConversationList>>> {
    let resp = chat_service::list_conversations(&state, query.user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/chat/conversations",
    request_body = OpenConversationRequest,
    responses(
        (status = 200, description = "Existing or new conversation", body = ApiResponse<Conversation>),
        (status = 400, description = "Fewer than two participants")
    ),
    tag = "Chat"
)]
pub async fn open_conversation(
    State(state): State<AppState>,
    Json(payload): Json<OpenConversationRequest>,
) -> AppResult<Json<ApiResponse<Conversation>>> {
    let resp = chat_service::open_conversation(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/chat/messages",
    params(
        ("conversation_id" = Uuid, Query, description = "Conversation"),
        ("user_id" = Option<Uuid>, Query, description = "Reader; messages from others are marked read"),
        ("limit" = Option<usize>, Query, description = "Most recent messages to return, default 50")
    ),
    responses(
        (status = 200, description = "Messages, oldest first", body = ApiResponse<MessageList>),
        (status = 404, description = "Conversation not found")
    ),
    tag = "Chat"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
) -> AppResult<Json<ApiResponse<MessageList>>> {
    let resp = chat_service::list_messages(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/chat/send",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message sent", body = ApiResponse<ChatMessage>),
        (status = 403, description = "Sender not in the conversation"),
        (status = 404, description = "Conversation not found")
    ),
    tag = "Chat"
)]
pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> AppResult<Json<ApiResponse<ChatMessage>>> {
    let resp = chat_service::send_message(&state, payload).await?;
    Ok(Json(resp))
}

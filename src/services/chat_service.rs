use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::Repository,
    dto::chat::{
        ConversationList, MessageList, MessagesQuery, OpenConversationRequest, SendMessageRequest,
    },
    error::{AppError, AppResult},
    models::{ChatMessage, Conversation},
    response::{ApiResponse, Meta},
    state::AppState,
};

const DEFAULT_MESSAGE_LIMIT: usize = 50;

fn same_participants(a: &[Uuid], b: &[Uuid]) -> bool {
    a.len() == b.len() && a.iter().all(|id| b.contains(id))
}

pub async fn list_conversations(
    state: &AppState,
    user_id: Uuid,
) -> AppResult<ApiResponse<ConversationList>> {
    let mut items = state
        .db
        .conversations
        .filter(|c| c.participant_ids.contains(&user_id))?;
    items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Conversations", ConversationList { items }, Some(meta)))
}

/// Reuse the conversation with the same participants, kind and order, or start one.
pub async fn open_conversation(
    state: &AppState,
    payload: OpenConversationRequest,
) -> AppResult<ApiResponse<Conversation>> {
    if payload.participant_ids.len() < 2 {
        return Err(AppError::bad_request("A conversation needs at least two participants"));
    }
    if payload.participant_ids.len() != payload.participant_roles.len() {
        return Err(AppError::bad_request("Each participant needs a role"));
    }

    let existing = state
        .db
        .conversations
        .filter(|c| {
            c.kind == payload.kind
                && c.order_id == payload.order_id
                && same_participants(&c.participant_ids, &payload.participant_ids)
        })?
        .into_iter()
        .next();
    if let Some(conversation) = existing {
        return Ok(ApiResponse::success("Conversation", conversation, Some(Meta::empty())));
    }

    let now = Utc::now();
    let conversation = state.db.conversations.insert(Conversation {
        id: Uuid::new_v4(),
        participant_ids: payload.participant_ids,
        participant_roles: payload.participant_roles,
        kind: payload.kind,
        order_id: payload.order_id,
        last_message: None,
        last_message_time: None,
        created_at: now,
        updated_at: now,
    })?;
    Ok(ApiResponse::success(
        "Conversation created",
        conversation,
        Some(Meta::empty()),
    ))
}

/// The most recent `limit` messages, oldest first.
pub async fn list_messages(
    state: &AppState,
    query: MessagesQuery,
) -> AppResult<ApiResponse<MessageList>> {
    if state.db.conversations.get(&query.conversation_id)?.is_none() {
        return Err(AppError::not_found("Conversation"));
    }

    let mut items = state
        .db
        .chat_messages
        .filter(|m| m.conversation_id == query.conversation_id)?;
    if let Some(reader) = query.user_id {
        let now = Utc::now();
        for message in items.iter_mut().filter(|m| m.sender_id != reader && !m.is_read) {
            state.db.chat_messages.update(&message.id, |m| {
                m.is_read = true;
                m.updated_at = now;
                Ok(())
            })?;
            message.is_read = true;
            message.updated_at = now;
        }
    }

    let limit = query.limit.filter(|n| *n > 0).unwrap_or(DEFAULT_MESSAGE_LIMIT);
    let skip = items.len().saturating_sub(limit);
    let items: Vec<ChatMessage> = items.into_iter().skip(skip).collect();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Messages", MessageList { items }, Some(meta)))
}

pub async fn send_message(
    state: &AppState,
    payload: SendMessageRequest,
) -> AppResult<ApiResponse<ChatMessage>> {
    if payload.message.trim().is_empty() {
        return Err(AppError::bad_request("Message is empty"));
    }

    let now = Utc::now();
    let preview = payload.message.clone();
    state
        .db
        .conversations
        .update(&payload.conversation_id, |c| {
            if !c.participant_ids.contains(&payload.sender_id) {
                return Err(AppError::Forbidden("Sender is not in this conversation".into()));
            }
            c.last_message = Some(preview);
            c.last_message_time = Some(now);
            c.updated_at = now;
            Ok(())
        })?
        .ok_or_else(|| AppError::not_found("Conversation"))?;

    let message = state.db.chat_messages.insert(ChatMessage {
        id: Uuid::new_v4(),
        conversation_id: payload.conversation_id,
        sender_id: payload.sender_id,
        sender_role: payload.sender_role,
        sender_name: payload.sender_name,
        message: payload.message,
        attachments: payload.attachments,
        is_read: false,
        created_at: now,
        updated_at: now,
    })?;
    Ok(ApiResponse::success("Message sent", message, Some(Meta::empty())))
}

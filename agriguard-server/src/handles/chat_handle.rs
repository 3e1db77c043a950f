use std::sync::Arc;

use agriguard_api::models::{ChatReplyResponse, ChatSessionResponse, SendChatMessageRequest};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::services::ChatService;

#[derive(Clone)]
pub struct ChatState {
    pub chat_service: Arc<ChatService>,
}

pub fn chat_router(chat_state: ChatState) -> Router {
    Router::new()
        .route("/api/chats", post(create_chat))
        .route("/api/chats/:session_id", get(get_chat))
        .route("/api/chats/:session_id/messages", post(send_chat_message))
        .with_state(chat_state)
}

#[utoipa::path(
    post,
    path = "/api/chats",
    tag = "chat",
    responses(
        (status = 200, description = "Chat session opened with the assistant greeting", body = ChatSessionResponse)
    )
)]
pub async fn create_chat(State(state): State<ChatState>) -> Json<ChatSessionResponse> {
    Json(state.chat_service.open().await)
}

#[utoipa::path(
    get,
    path = "/api/chats/{session_id}",
    tag = "chat",
    params(
        ("session_id" = Uuid, Path, description = "Chat session ID")
    ),
    responses(
        (status = 200, description = "Session transcript", body = ChatSessionResponse),
        (status = 404, description = "Chat session not found")
    )
)]
pub async fn get_chat(
    State(state): State<ChatState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ChatSessionResponse>, ApiError> {
    Ok(Json(state.chat_service.transcript(session_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/chats/{session_id}/messages",
    tag = "chat",
    params(
        ("session_id" = Uuid, Path, description = "Chat session ID")
    ),
    request_body = SendChatMessageRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatReplyResponse),
        (status = 400, description = "Message is empty"),
        (status = 404, description = "Chat session not found"),
        (status = 503, description = "No API key configured")
    )
)]
pub async fn send_chat_message(
    State(state): State<ChatState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<SendChatMessageRequest>,
) -> Result<Json<ChatReplyResponse>, ApiError> {
    let reply = state.chat_service.send(session_id, &body.message).await?;

    Ok(Json(ChatReplyResponse { reply }))
}

use std::collections::HashMap;
use std::sync::Arc;

use agriguard_api::models::{ChatMessage, ChatSessionResponse};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::ChatError;
use crate::services::GenerativeBackend;

pub const WELCOME_MESSAGE: &str =
    "Welcome to your farm hub. I am Farmy, your AI assistant. How can I assist your farm today?";
pub const EMPTY_REPLY_MESSAGE: &str =
    "I apologize, I encountered a transmission error. Please try again.";
pub const BACKEND_FAILURE_MESSAGE: &str =
    "Error: Could not connect to Farmy's brain. Please check your connection.";

#[derive(Debug, Clone, Default)]
struct ChatSession {
    /// Everything shown to the user, greeting included
    transcript: Vec<ChatMessage>,
    /// Exchanges the backend has accepted
    history: Vec<ChatMessage>,
}

/// In-memory chat sessions with the farm assistant.
pub struct ChatService {
    backend: Arc<dyn GenerativeBackend>,
    sessions: RwLock<HashMap<Uuid, ChatSession>>,
}

impl ChatService {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn open(&self) -> ChatSessionResponse {
        let id = Uuid::new_v4();
        let session = ChatSession {
            transcript: vec![ChatMessage::model(WELCOME_MESSAGE)],
            history: Vec::new(),
        };

        let messages = session.transcript.clone();
        self.sessions.write().await.insert(id, session);

        tracing::debug!(session_id = %id, "chat session opened");

        ChatSessionResponse { id, messages }
    }

    pub async fn transcript(&self, id: Uuid) -> Result<ChatSessionResponse, ChatError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).ok_or(ChatError::SessionNotFound)?;

        Ok(ChatSessionResponse {
            id,
            messages: session.transcript.clone(),
        })
    }

    /// Sends a user message and returns the model turn appended to the transcript.
    ///
    /// Backend failures surface as an apology in the transcript rather than an
    /// error, except for a missing API key which callers must fix.
    pub async fn send(&self, id: Uuid, message: &str) -> Result<ChatMessage, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        // the lock is not held across the backend call
        let history = {
            let sessions = self.sessions.read().await;
            sessions
                .get(&id)
                .ok_or(ChatError::SessionNotFound)?
                .history
                .clone()
        };

        let result = self.backend.chat(&history, message).await;

        let (reply, accepted) = match result {
            Ok(text) if text.trim().is_empty() => (ChatMessage::model(EMPTY_REPLY_MESSAGE), false),
            Ok(text) => (ChatMessage::model(text), true),
            Err(ChatError::MissingApiKey) => return Err(ChatError::MissingApiKey),
            Err(e) => {
                tracing::warn!(session_id = %id, "chat backend failed: {}", e);
                (ChatMessage::model(BACKEND_FAILURE_MESSAGE), false)
            }
        };

        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(ChatError::SessionNotFound)?;

        let user_message = ChatMessage::user(message);
        if accepted {
            session.history.push(user_message.clone());
            session.history.push(reply.clone());
        }
        session.transcript.push(user_message);
        session.transcript.push(reply.clone());

        Ok(reply)
    }
}

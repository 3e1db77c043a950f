use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat session not found")]
    SessionNotFound,

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Gemini API key is missing. Please configure an API key.")]
    MissingApiKey,

    #[error("Could not reach the assistant backend")]
    BackendUnavailable,
}

impl ChatError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::SessionNotFound => StatusCode::NOT_FOUND,
            ChatError::EmptyMessage => StatusCode::BAD_REQUEST,
            ChatError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
            ChatError::BackendUnavailable => StatusCode::BAD_GATEWAY,
        }
    }
}

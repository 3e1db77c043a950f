use super::{ChatError, DiagnosisError, IrrigationError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Irrigation error: {0}")]
    IrrigationError(#[from] IrrigationError),

    #[error("Diagnosis error: {0}")]
    DiagnosisError(#[from] DiagnosisError),

    #[error("Chat error: {0}")]
    ChatError(#[from] ChatError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

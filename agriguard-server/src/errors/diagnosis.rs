use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    #[error("Gemini API key is missing. Please configure an API key.")]
    MissingApiKey,

    #[error("Image payload is empty or malformed")]
    InvalidImage,

    #[error("Unable to analyze image. Please ensure the crop is clearly visible and try again.")]
    AnalysisFailed,
}

impl DiagnosisError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DiagnosisError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
            DiagnosisError::InvalidImage => StatusCode::BAD_REQUEST,
            DiagnosisError::AnalysisFailed => StatusCode::BAD_GATEWAY,
        }
    }
}

use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum IrrigationError {
    #[error("Pump is managed by the control loop while auto mode is active")]
    AutoModeActive,

    #[error("Threshold must be between {min} and {max}")]
    InvalidThreshold { min: i32, max: i32 },

    #[error("No sensor reading available")]
    NoReading,
}

impl IrrigationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IrrigationError::AutoModeActive => StatusCode::CONFLICT,
            IrrigationError::InvalidThreshold { .. } => StatusCode::BAD_REQUEST,
            IrrigationError::NoReading => StatusCode::NOT_FOUND,
        }
    }
}

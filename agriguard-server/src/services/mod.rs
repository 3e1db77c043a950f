pub mod chat_service;
pub mod control_loop;
pub mod diagnosis_service;
pub mod export_service;
pub mod generative_backend;
pub mod history_store;
pub mod irrigation_service;
pub mod sensor_window;

pub use chat_service::*;
pub use control_loop::{ControlContext, TickOutcome};
pub use diagnosis_service::*;
pub use export_service::*;
pub use generative_backend::*;
pub use history_store::*;
pub use irrigation_service::*;
pub use sensor_window::SensorWindow;

use agriguard_api::models::{DiagnosisRecordResponse, IrrigationState, SensorReading};
use serde::{Deserialize, Serialize};

/// Events fanned out to SSE subscribers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServiceEvent {
    ReadingCreated(SensorReading),
    IrrigationChanged(IrrigationState),
    DiagnosisCreated(DiagnosisRecordResponse),
}

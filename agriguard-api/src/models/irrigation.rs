use serde::{Deserialize, Serialize};

/// Lowest threshold a user may configure.
pub const MIN_THRESHOLD: i32 = 10;

/// Highest threshold a user may configure.
pub const MAX_THRESHOLD: i32 = 90;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrigationState {
    /// Whether the control loop governs the pump
    pub auto_mode: bool,
    /// Whether the pump is currently running
    pub pump_on: bool,
    /// Moisture percentage under which the pump starts in auto mode
    pub threshold: i32,
}

impl Default for IrrigationState {
    fn default() -> Self {
        Self {
            auto_mode: true,
            pump_on: false,
            threshold: 45,
        }
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateIrrigationRequest {
    /// New auto mode flag
    pub auto_mode: Option<bool>,
    /// New trigger threshold (10-90)
    pub threshold: Option<i32>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PumpTransition {
    /// Pump switched from off to on
    Started,
    /// Pump switched from on to off
    Stopped,
}

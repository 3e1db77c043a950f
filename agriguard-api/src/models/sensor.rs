use alloc::string::String;

use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Display label of the reading (weekday or time of day)
    pub timestamp: String,
    /// Soil moisture percentage (0-100)
    pub moisture: f64,
    /// Air humidity percentage
    pub humidity: f64,
    /// Air temperature in Celsius
    pub temperature: f64,
    /// Water tank level percentage (0-100)
    pub water_level: f64,
}

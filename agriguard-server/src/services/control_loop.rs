//! Irrigation control loop.
//!
//! A two-state (pump on/off) hysteresis controller. Each tick advances the
//! simulated soil and tank by one step, then, in auto mode, switches the pump
//! when the fresh readings cross the dead-band edges:
//!
//! - off -> on when `moisture < threshold` and `water_level > 5`
//! - on -> off when `moisture > threshold + 10` or `water_level <= 2`
//!
//! The tick is pure arithmetic on clamped values and cannot fail.

use agriguard_api::models::{
    IrrigationState, MAX_THRESHOLD, MIN_THRESHOLD, PumpTransition, SensorReading,
};

use crate::errors::IrrigationError;
use crate::services::sensor_window::SensorWindow;

/// Moisture gained per tick while the pump runs.
pub const PUMP_MOISTURE_GAIN: f64 = 0.8;
/// Tank level drawn per tick while the pump runs.
pub const PUMP_WATER_DRAW: f64 = 0.3;
/// Moisture lost per tick while the pump is idle.
pub const IDLE_MOISTURE_DECAY: f64 = 0.08;
/// Tank level recovered per tick while the pump is idle.
pub const IDLE_WATER_RECOVERY: f64 = 0.02;
/// Width of the dead-band above the threshold.
pub const DEAD_BAND: i32 = 10;
/// The pump only starts when the tank holds more than this.
pub const MIN_START_WATER_LEVEL: f64 = 5.0;
/// The pump is forced off at or below this tank level.
pub const CRITICAL_WATER_LEVEL: f64 = 2.0;

/// Everything the control loop reads and mutates.
#[derive(Debug, Clone)]
pub struct ControlContext {
    pub window: SensorWindow,
    pub irrigation: IrrigationState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub reading: SensorReading,
    pub transition: Option<PumpTransition>,
}

impl ControlContext {
    pub fn new(window: SensorWindow, irrigation: IrrigationState) -> Self {
        Self { window, irrigation }
    }

    /// Manual pump toggle. Rejected while auto mode owns the pump.
    pub fn toggle_pump(&mut self) -> Result<PumpTransition, IrrigationError> {
        if self.irrigation.auto_mode {
            return Err(IrrigationError::AutoModeActive);
        }

        self.irrigation.pump_on = !self.irrigation.pump_on;

        Ok(if self.irrigation.pump_on {
            PumpTransition::Started
        } else {
            PumpTransition::Stopped
        })
    }

    /// Switches auto mode; the pump always stops on a mode change.
    pub fn set_auto_mode(&mut self, enabled: bool) {
        self.irrigation.auto_mode = enabled;
        self.irrigation.pump_on = false;
    }

    pub fn set_threshold(&mut self, threshold: i32) -> Result<(), IrrigationError> {
        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&threshold) {
            return Err(IrrigationError::InvalidThreshold {
                min: MIN_THRESHOLD,
                max: MAX_THRESHOLD,
            });
        }

        self.irrigation.threshold = threshold;

        Ok(())
    }
}

/// Advances moisture and tank level by one tick for the given pump state.
pub fn advance(moisture: f64, water_level: f64, pump_on: bool) -> (f64, f64) {
    if pump_on {
        (
            (moisture + PUMP_MOISTURE_GAIN).min(100.0),
            (water_level - PUMP_WATER_DRAW).max(0.0),
        )
    } else {
        (
            (moisture - IDLE_MOISTURE_DECAY).max(0.0),
            (water_level + IDLE_WATER_RECOVERY).min(100.0),
        )
    }
}

/// Pump transition demanded by the auto mode rules, if any.
pub fn decide(state: &IrrigationState, moisture: f64, water_level: f64) -> Option<PumpTransition> {
    if !state.auto_mode {
        return None;
    }

    let low = f64::from(state.threshold);
    let high = f64::from(state.threshold + DEAD_BAND);

    if !state.pump_on && moisture < low && water_level > MIN_START_WATER_LEVEL {
        Some(PumpTransition::Started)
    } else if state.pump_on && (moisture > high || water_level <= CRITICAL_WATER_LEVEL) {
        Some(PumpTransition::Stopped)
    } else {
        None
    }
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Runs one control step, appending the new reading to the window.
///
/// Humidity and temperature carry over from the previous reading. Returns
/// `None` when there is no previous reading to advance from.
pub fn tick(context: &mut ControlContext, label: String) -> Option<TickOutcome> {
    let previous = context.window.latest()?;
    let state = context.irrigation;

    let (moisture, water_level) = advance(previous.moisture, previous.water_level, state.pump_on);
    let transition = decide(&state, moisture, water_level);

    let reading = SensorReading {
        timestamp: label,
        moisture: round_one_decimal(moisture),
        humidity: previous.humidity,
        temperature: previous.temperature,
        water_level: round_one_decimal(water_level),
    };

    match transition {
        Some(PumpTransition::Started) => context.irrigation.pump_on = true,
        Some(PumpTransition::Stopped) => context.irrigation.pump_on = false,
        None => {}
    }

    context.window.push(reading.clone());

    Some(TickOutcome {
        reading,
        transition,
    })
}

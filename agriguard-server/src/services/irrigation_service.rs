use std::sync::Arc;
use std::time::Duration;

use agriguard_api::models::{IrrigationState, PumpTransition, SensorReading, UpdateIrrigationRequest};
use time::OffsetDateTime;
use time::macros::format_description;
use tokio::sync::Mutex;
use tokio::sync::broadcast::Sender;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::configs::Irrigation;
use crate::errors::IrrigationError;
use crate::services::ServiceEvent;
use crate::services::control_loop::{self, ControlContext};
use crate::services::sensor_window::SensorWindow;

/// Owns the control context and the periodic timer driving it.
pub struct IrrigationService {
    context: Arc<Mutex<ControlContext>>,
    period: Duration,
    sender: Sender<ServiceEvent>,
}

impl IrrigationService {
    pub fn new(settings: &Irrigation, sender: &Sender<ServiceEvent>) -> Self {
        let window = SensorWindow::seeded(
            settings.window_capacity,
            OffsetDateTime::now_utc(),
            &mut rand::rng(),
        );
        let irrigation = IrrigationState {
            auto_mode: settings.auto_mode,
            pump_on: false,
            threshold: settings.threshold,
        };

        Self::with_context(
            ControlContext::new(window, irrigation),
            Duration::from_millis(settings.tick_millis.max(1)),
            sender,
        )
    }

    pub fn with_context(context: ControlContext, period: Duration, sender: &Sender<ServiceEvent>) -> Self {
        Self {
            context: Arc::new(Mutex::new(context)),
            period,
            sender: sender.clone(),
        }
    }

    /// Spawns the timer task. Dropping the handle does not stop it; abort it instead.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = interval(service.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                service.tick().await;
            }
        })
    }

    /// Runs a single control step and publishes the result.
    pub async fn tick(&self) -> Option<SensorReading> {
        let (outcome, state) = {
            let mut context = self.context.lock().await;
            let outcome = control_loop::tick(&mut context, Self::label(OffsetDateTime::now_utc()))?;
            (outcome, context.irrigation)
        };

        match outcome.transition {
            Some(PumpTransition::Started) => tracing::info!(
                moisture = outcome.reading.moisture,
                water_level = outcome.reading.water_level,
                threshold = state.threshold,
                "auto mode started pump"
            ),
            Some(PumpTransition::Stopped) => tracing::info!(
                moisture = outcome.reading.moisture,
                water_level = outcome.reading.water_level,
                threshold = state.threshold,
                "auto mode stopped pump"
            ),
            None => tracing::trace!(reading = ?outcome.reading, "control tick"),
        }

        self.publish(ServiceEvent::ReadingCreated(outcome.reading.clone()));
        if outcome.transition.is_some() {
            self.publish(ServiceEvent::IrrigationChanged(state));
        }

        Some(outcome.reading)
    }

    pub async fn state(&self) -> IrrigationState {
        self.context.lock().await.irrigation
    }

    pub async fn readings(&self) -> Vec<SensorReading> {
        self.context.lock().await.window.to_vec()
    }

    pub async fn latest(&self) -> Result<SensorReading, IrrigationError> {
        self.context
            .lock()
            .await
            .window
            .latest()
            .cloned()
            .ok_or(IrrigationError::NoReading)
    }

    /// Manual pump toggle, rejected while auto mode is active.
    pub async fn toggle_pump(&self) -> Result<IrrigationState, IrrigationError> {
        let state = {
            let mut context = self.context.lock().await;
            let transition = context.toggle_pump()?;
            tracing::info!(?transition, "manual pump toggle");
            context.irrigation
        };

        self.publish(ServiceEvent::IrrigationChanged(state));

        Ok(state)
    }

    pub async fn toggle_auto_mode(&self) -> IrrigationState {
        let state = {
            let mut context = self.context.lock().await;
            let enabled = !context.irrigation.auto_mode;
            context.set_auto_mode(enabled);
            context.irrigation
        };

        tracing::info!(auto_mode = state.auto_mode, "auto mode toggled");
        self.publish(ServiceEvent::IrrigationChanged(state));

        state
    }

    /// Applies a partial update atomically; nothing changes if any field is invalid.
    pub async fn update(&self, request: UpdateIrrigationRequest) -> Result<IrrigationState, IrrigationError> {
        let state = {
            let mut context = self.context.lock().await;
            let mut next = context.clone();

            if let Some(threshold) = request.threshold {
                next.set_threshold(threshold)?;
            }
            if let Some(auto_mode) = request.auto_mode {
                if auto_mode != next.irrigation.auto_mode {
                    next.set_auto_mode(auto_mode);
                }
            }

            context.irrigation = next.irrigation;
            context.irrigation
        };

        tracing::debug!(?state, "irrigation settings updated");
        self.publish(ServiceEvent::IrrigationChanged(state));

        Ok(state)
    }

    fn publish(&self, event: ServiceEvent) {
        // no subscribers is not an error
        let _ = self.sender.send(event);
    }

    fn label(now: OffsetDateTime) -> String {
        now.format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast;

    use super::*;

    fn service(moisture: f64, state: IrrigationState) -> (IrrigationService, broadcast::Receiver<ServiceEvent>) {
        let (sender, receiver) = broadcast::channel(16);
        let mut window = SensorWindow::new(7);
        window.push(SensorReading {
            timestamp: "Sun".to_string(),
            moisture,
            humidity: 55.0,
            temperature: 26.0,
            water_level: 50.0,
        });

        let service = IrrigationService::with_context(
            ControlContext::new(window, state),
            Duration::from_millis(10),
            &sender,
        );

        (service, receiver)
    }

    #[tokio::test]
    async fn test_tick_publishes_reading_and_transition() {
        let (service, mut receiver) = service(44.0, IrrigationState::default());

        let reading = service.tick().await.unwrap();

        assert_eq!(reading.moisture, 43.9);
        assert!(service.state().await.pump_on);
        assert!(matches!(receiver.recv().await.unwrap(), ServiceEvent::ReadingCreated(r) if r == reading));
        assert!(matches!(
            receiver.recv().await.unwrap(),
            ServiceEvent::IrrigationChanged(IrrigationState { pump_on: true, .. })
        ));
    }

    #[tokio::test]
    async fn test_update_is_all_or_nothing() {
        let (service, _receiver) = service(60.0, IrrigationState::default());

        let result = service
            .update(UpdateIrrigationRequest {
                auto_mode: Some(false),
                threshold: Some(95),
            })
            .await;

        assert!(matches!(result, Err(IrrigationError::InvalidThreshold { .. })));
        assert_eq!(service.state().await, IrrigationState::default());

        let state = service
            .update(UpdateIrrigationRequest {
                auto_mode: Some(false),
                threshold: Some(30),
            })
            .await
            .unwrap();

        assert!(!state.auto_mode);
        assert_eq!(state.threshold, 30);
    }

    #[tokio::test]
    async fn test_threshold_update_keeps_pump_running() {
        let (service, _receiver) = service(60.0, IrrigationState {
            auto_mode: true,
            pump_on: true,
            threshold: 45,
        });

        let state = service
            .update(UpdateIrrigationRequest {
                auto_mode: Some(true),
                threshold: Some(50),
            })
            .await
            .unwrap();

        assert!(state.pump_on);
        assert_eq!(state.threshold, 50);
    }

    #[tokio::test]
    async fn test_manual_toggle_round_trip() {
        let (service, _receiver) = service(60.0, IrrigationState::default());

        assert!(matches!(service.toggle_pump().await, Err(IrrigationError::AutoModeActive)));

        let state = service.toggle_auto_mode().await;
        assert!(!state.auto_mode);

        assert!(service.toggle_pump().await.unwrap().pump_on);
        assert!(!service.toggle_pump().await.unwrap().pump_on);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_advances_window() {
        let (service, _receiver) = service(60.0, IrrigationState::default());
        let service = Arc::new(service);

        let handle = service.start();
        tokio::time::sleep(Duration::from_millis(75)).await;
        handle.abort();

        let readings = service.readings().await;
        assert_eq!(readings.len(), 7);
        assert!(readings.last().unwrap().moisture < 60.0);
    }
}

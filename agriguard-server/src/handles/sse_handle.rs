use std::convert::Infallible;

use axum::Router;
use axum::extract::State;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use axum::routing::get;
use tokio::sync::broadcast::Sender;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::services::ServiceEvent;

#[derive(Clone)]
pub struct SSEState {
    pub sender: Sender<ServiceEvent>,
}

pub fn sse_router(sse_state: SSEState) -> Router {
    Router::new()
        .route("/api/events", get(sse_handler))
        .with_state(sse_state)
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "event",
    responses(
        (status = 200, description = "Stream of readings, irrigation changes and diagnoses", content_type = "text/event-stream", body = String)
    )
)]
pub async fn sse_handler(
    State(state): State<SSEState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.sender.subscribe();

    // lagged receivers skip what they missed
    let stream = BroadcastStream::new(receiver).filter_map(|result| {
        let event = result.ok()?;
        let name = match &event {
            ServiceEvent::ReadingCreated(_) => "reading",
            ServiceEvent::IrrigationChanged(_) => "irrigation",
            ServiceEvent::DiagnosisCreated(_) => "diagnosis",
        };

        Event::default()
            .event(name)
            .json_data(&event)
            .ok()
            .map(Ok::<Event, Infallible>)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

use std::sync::Arc;

use agriguard_api::models::SensorReading;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::errors::ApiError;
use crate::services::{CSV_FILE_NAME, IrrigationService, readings_to_csv};

#[derive(Clone)]
pub struct SensorState {
    pub irrigation_service: Arc<IrrigationService>,
}

pub fn sensor_router(sensor_state: SensorState) -> Router {
    Router::new()
        .route("/api/sensors/readings", get(get_readings))
        .route("/api/sensors/latest", get(get_latest_reading))
        .route("/api/sensors/export", get(export_readings))
        .with_state(sensor_state)
}

#[utoipa::path(
    get,
    path = "/api/sensors/readings",
    tag = "sensor",
    responses(
        (status = 200, description = "Rolling window of readings, oldest first", body = Vec<SensorReading>)
    )
)]
pub async fn get_readings(State(state): State<SensorState>) -> Json<Vec<SensorReading>> {
    Json(state.irrigation_service.readings().await)
}

#[utoipa::path(
    get,
    path = "/api/sensors/latest",
    tag = "sensor",
    responses(
        (status = 200, description = "Newest reading", body = SensorReading),
        (status = 404, description = "No reading available")
    )
)]
pub async fn get_latest_reading(
    State(state): State<SensorState>,
) -> Result<Json<SensorReading>, ApiError> {
    Ok(Json(state.irrigation_service.latest().await?))
}

#[utoipa::path(
    get,
    path = "/api/sensors/export",
    tag = "sensor",
    responses(
        (status = 200, description = "Readings as a CSV attachment", content_type = "text/csv", body = String),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn export_readings(State(state): State<SensorState>) -> Result<impl IntoResponse, ApiError> {
    let readings = state.irrigation_service.readings().await;
    let csv = readings_to_csv(&readings)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        csv,
    ))
}

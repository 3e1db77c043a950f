use std::sync::Arc;

use agriguard_api::models::{IrrigationState, UpdateIrrigationRequest};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::errors::ApiError;
use crate::services::IrrigationService;

#[derive(Clone)]
pub struct IrrigationHandleState {
    pub irrigation_service: Arc<IrrigationService>,
}

pub fn irrigation_router(irrigation_state: IrrigationHandleState) -> Router {
    Router::new()
        .route(
            "/api/irrigation",
            get(get_irrigation_state).put(update_irrigation_state),
        )
        .route("/api/irrigation/pump/toggle", post(toggle_pump))
        .route("/api/irrigation/auto/toggle", post(toggle_auto_mode))
        .with_state(irrigation_state)
}

#[utoipa::path(
    get,
    path = "/api/irrigation",
    tag = "irrigation",
    responses(
        (status = 200, description = "Current irrigation state", body = IrrigationState)
    )
)]
pub async fn get_irrigation_state(State(state): State<IrrigationHandleState>) -> Json<IrrigationState> {
    Json(state.irrigation_service.state().await)
}

#[utoipa::path(
    put,
    path = "/api/irrigation",
    tag = "irrigation",
    request_body = UpdateIrrigationRequest,
    responses(
        (status = 200, description = "Irrigation settings updated", body = IrrigationState),
        (status = 400, description = "Threshold out of range")
    )
)]
pub async fn update_irrigation_state(
    State(state): State<IrrigationHandleState>,
    Json(body): Json<UpdateIrrigationRequest>,
) -> Result<Json<IrrigationState>, ApiError> {
    Ok(Json(state.irrigation_service.update(body).await?))
}

#[utoipa::path(
    post,
    path = "/api/irrigation/pump/toggle",
    tag = "irrigation",
    responses(
        (status = 200, description = "Pump toggled", body = IrrigationState),
        (status = 409, description = "Auto mode owns the pump")
    )
)]
pub async fn toggle_pump(
    State(state): State<IrrigationHandleState>,
) -> Result<Json<IrrigationState>, ApiError> {
    Ok(Json(state.irrigation_service.toggle_pump().await?))
}

#[utoipa::path(
    post,
    path = "/api/irrigation/auto/toggle",
    tag = "irrigation",
    responses(
        (status = 200, description = "Auto mode toggled and pump stopped", body = IrrigationState)
    )
)]
pub async fn toggle_auto_mode(State(state): State<IrrigationHandleState>) -> Json<IrrigationState> {
    Json(state.irrigation_service.toggle_auto_mode().await)
}

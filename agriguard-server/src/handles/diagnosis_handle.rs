use std::sync::Arc;

use agriguard_api::models::{AnalyzeCropRequest, DiagnosisRecordResponse};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::errors::ApiError;
use crate::services::DiagnosisService;

#[derive(Clone)]
pub struct DiagnosisState {
    pub diagnosis_service: Arc<DiagnosisService>,
}

pub fn diagnosis_router(diagnosis_state: DiagnosisState) -> Router {
    Router::new()
        .route("/api/diagnoses", post(analyze_crop).get(get_diagnoses))
        .with_state(diagnosis_state)
}

#[utoipa::path(
    post,
    path = "/api/diagnoses",
    tag = "diagnosis",
    request_body = AnalyzeCropRequest,
    responses(
        (status = 200, description = "Crop analyzed and recorded", body = DiagnosisRecordResponse),
        (status = 400, description = "Image payload is empty or malformed"),
        (status = 502, description = "The model could not analyze the image"),
        (status = 503, description = "No API key configured"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn analyze_crop(
    State(state): State<DiagnosisState>,
    Json(body): Json<AnalyzeCropRequest>,
) -> Result<Json<DiagnosisRecordResponse>, ApiError> {
    Ok(Json(state.diagnosis_service.analyze(body).await?))
}

#[utoipa::path(
    get,
    path = "/api/diagnoses",
    tag = "diagnosis",
    responses(
        (status = 200, description = "Diagnoses from the last 24 hours, newest first", body = Vec<DiagnosisRecordResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_diagnoses(
    State(state): State<DiagnosisState>,
) -> Result<Json<Vec<DiagnosisRecordResponse>>, ApiError> {
    Ok(Json(state.diagnosis_service.history().await?))
}

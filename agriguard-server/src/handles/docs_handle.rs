use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use super::{chat_handle, diagnosis_handle, irrigation_handle, sensor_handle, sse_handle};

#[derive(OpenApi)]
#[openapi(
    info(title = "AgriGuard", description = "Irrigation control and crop diagnosis API"),
    paths(
        sensor_handle::get_readings,
        sensor_handle::get_latest_reading,
        sensor_handle::export_readings,
        irrigation_handle::get_irrigation_state,
        irrigation_handle::update_irrigation_state,
        irrigation_handle::toggle_pump,
        irrigation_handle::toggle_auto_mode,
        diagnosis_handle::analyze_crop,
        diagnosis_handle::get_diagnoses,
        chat_handle::create_chat,
        chat_handle::get_chat,
        chat_handle::send_chat_message,
        sse_handle::sse_handler,
    ),
    tags(
        (name = "sensor", description = "Rolling sensor window"),
        (name = "irrigation", description = "Pump and auto mode control"),
        (name = "diagnosis", description = "AI crop diagnosis and history"),
        (name = "chat", description = "Farm assistant chat"),
        (name = "event", description = "Server sent events"),
    )
)]
pub struct ApiDoc;

pub fn docs_router() -> Router {
    Router::new().route("/api/docs/openapi.json", get(get_openapi))
}

pub async fn get_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

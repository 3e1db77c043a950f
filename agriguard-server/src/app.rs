use std::sync::Arc;

use axum::Router;
use tokio::sync::broadcast::{self, Sender};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::{SchemaManager, Settings, Storage};
use crate::handles::*;
use crate::repositories::DiagnosisRecordRepository;
use crate::services::{
    ChatService, DiagnosisService, GeminiClient, GenerativeBackend, HistoryStore, IrrigationService,
    ServiceEvent,
};

/// Shared services behind the HTTP surface.
#[derive(Clone)]
pub struct AppServices {
    pub irrigation_service: Arc<IrrigationService>,
    pub diagnosis_service: Arc<DiagnosisService>,
    pub chat_service: Arc<ChatService>,
    pub sender: Sender<ServiceEvent>,
}

impl AppServices {
    pub fn new(
        irrigation_service: Arc<IrrigationService>,
        backend: Arc<dyn GenerativeBackend>,
        history: Arc<dyn HistoryStore>,
        sender: &Sender<ServiceEvent>,
    ) -> Self {
        Self {
            irrigation_service,
            diagnosis_service: Arc::new(DiagnosisService::new(backend.clone(), history, sender)),
            chat_service: Arc::new(ChatService::new(backend)),
            sender: sender.clone(),
        }
    }
}

pub async fn create_app(settings: &Arc<Settings>) -> anyhow::Result<Router> {
    let (sender, _receiver) = broadcast::channel(100);

    let storage = Arc::new(Storage::new(settings.database.clone(), SchemaManager::default()).await?);

    let history: Arc<dyn HistoryStore> = Arc::new(DiagnosisRecordRepository::new(
        storage.clone(),
        settings.history.retention_hours,
    ));
    let pruned = history.prune(time::OffsetDateTime::now_utc()).await?;
    tracing::debug!(pruned, "diagnosis history loaded");

    if settings.gemini.api_key.is_none() {
        tracing::warn!("no gemini api key configured, diagnosis and chat will be unavailable");
    }
    let backend: Arc<dyn GenerativeBackend> = Arc::new(GeminiClient::new(&settings.gemini));

    let irrigation_service = Arc::new(IrrigationService::new(&settings.irrigation, &sender));
    irrigation_service.start();

    let services = AppServices::new(irrigation_service, backend, history, &sender);

    Ok(build_router(&services))
}

pub fn build_router(services: &AppServices) -> Router {
    Router::new()
        .merge(sensor_router(SensorState {
            irrigation_service: services.irrigation_service.clone(),
        }))
        .merge(irrigation_router(IrrigationHandleState {
            irrigation_service: services.irrigation_service.clone(),
        }))
        .merge(diagnosis_router(DiagnosisState {
            diagnosis_service: services.diagnosis_service.clone(),
        }))
        .merge(chat_router(ChatState {
            chat_service: services.chat_service.clone(),
        }))
        .merge(sse_router(SSEState {
            sender: services.sender.clone(),
        }))
        .merge(docs_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

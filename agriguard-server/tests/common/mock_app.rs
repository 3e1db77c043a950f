use std::sync::Arc;

use agriguard_api::models::{IrrigationState, SensorReading};
use agriguard_server::app::{AppServices, build_router};
use agriguard_server::configs::Storage;
use agriguard_server::repositories::DiagnosisRecordRepository;
use agriguard_server::services::ServiceEvent;
use agriguard_server::tests::{
    StubBackend, create_test_history, create_test_irrigation_service, create_test_reading,
    setup_test_storage,
};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use tokio::sync::broadcast::{self, Sender};
use tower::ServiceExt;

pub struct MockApp {
    pub router: Router,
    pub storage: Arc<Storage>,
    pub backend: Arc<StubBackend>,
    pub history: Arc<DiagnosisRecordRepository>,
    pub services: AppServices,
    pub sender: Sender<ServiceEvent>,
}

impl MockApp {
    pub async fn new() -> Self {
        let (sender, _receiver) = broadcast::channel(100);
        let storage = setup_test_storage().await;
        let backend = Arc::new(StubBackend::default());
        let history = create_test_history(storage.clone());

        let irrigation_service = create_test_irrigation_service(
            vec![
                create_test_reading("Mon", 52.0, 80.0),
                create_test_reading("Tue", 48.0, 78.0),
                create_test_reading("Wed", 44.0, 75.0),
            ],
            IrrigationState::default(),
            &sender,
        );

        let services = AppServices::new(irrigation_service, backend.clone(), history.clone(), &sender);

        Self {
            router: build_router(&services),
            storage,
            backend,
            history,
            services,
            sender,
        }
    }

    /// Replaces the sensor window and irrigation state.
    pub fn with_irrigation(mut self, readings: Vec<SensorReading>, state: IrrigationState) -> Self {
        self.services.irrigation_service =
            create_test_irrigation_service(readings, state, &self.sender);
        self.router = build_router(&self.services);
        self
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
        let builder = Request::builder().uri(uri).method(method);

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    serde_json::from_slice(&body).unwrap()
}

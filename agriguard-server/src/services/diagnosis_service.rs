use std::sync::Arc;

use agriguard_api::models::{AnalyzeCropRequest, DiagnosisRecordResponse};
use time::OffsetDateTime;
use tokio::sync::broadcast::Sender;

use crate::errors::ApiError;
use crate::services::{GenerativeBackend, HistoryStore, ImagePayload, ServiceEvent};

pub struct DiagnosisService {
    backend: Arc<dyn GenerativeBackend>,
    history: Arc<dyn HistoryStore>,
    sender: Sender<ServiceEvent>,
}

impl DiagnosisService {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        history: Arc<dyn HistoryStore>,
        sender: &Sender<ServiceEvent>,
    ) -> Self {
        Self {
            backend,
            history,
            sender: sender.clone(),
        }
    }

    /// Analyzes a crop image and records the result in the history.
    pub async fn analyze(&self, request: AnalyzeCropRequest) -> Result<DiagnosisRecordResponse, ApiError> {
        let image = ImagePayload::parse(&request.image, request.mime_type.as_deref())?;

        let analysis = self.backend.analyze_crop(&image).await?;

        tracing::info!(
            crop = %analysis.crop_name,
            status = %analysis.status,
            confidence = analysis.confidence,
            "crop analyzed"
        );

        let record = self.history.append(analysis, OffsetDateTime::now_utc()).await?;

        let _ = self.sender.send(ServiceEvent::DiagnosisCreated(record.clone()));

        Ok(record)
    }

    pub async fn history(&self) -> Result<Vec<DiagnosisRecordResponse>, ApiError> {
        Ok(self.history.recent(OffsetDateTime::now_utc()).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use agriguard_api::models::{ChatMessage, DiseaseAnalysis, HealthStatus};
    use tokio::sync::broadcast;
    use uuid::Uuid;

    use crate::errors::{ChatError, DiagnosisError};

    use super::*;

    struct FixedBackend {
        result: fn() -> Result<DiseaseAnalysis, DiagnosisError>,
        seen: Mutex<Vec<ImagePayload>>,
    }

    #[async_trait::async_trait]
    impl GenerativeBackend for FixedBackend {
        async fn analyze_crop(&self, image: &ImagePayload) -> Result<DiseaseAnalysis, DiagnosisError> {
            self.seen.lock().unwrap().push(image.clone());
            (self.result)()
        }

        async fn chat(&self, _history: &[ChatMessage], _message: &str) -> Result<String, ChatError> {
            Ok(String::new())
        }
    }

    #[derive(Default)]
    struct MemoryHistory {
        records: Mutex<Vec<DiagnosisRecordResponse>>,
    }

    #[async_trait::async_trait]
    impl HistoryStore for MemoryHistory {
        async fn append(
            &self,
            analysis: DiseaseAnalysis,
            time: OffsetDateTime,
        ) -> anyhow::Result<DiagnosisRecordResponse> {
            let record = DiagnosisRecordResponse {
                id: Uuid::new_v4(),
                analysis,
                time,
            };
            self.records.lock().unwrap().insert(0, record.clone());
            Ok(record)
        }

        async fn recent(&self, _now: OffsetDateTime) -> anyhow::Result<Vec<DiagnosisRecordResponse>> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn prune(&self, _now: OffsetDateTime) -> anyhow::Result<u64> {
            Ok(0)
        }
    }

    fn healthy_tomato() -> Result<DiseaseAnalysis, DiagnosisError> {
        Ok(DiseaseAnalysis {
            crop_name: "Tomato".to_string(),
            status: HealthStatus::Healthy,
            disease_name: None,
            confidence: 97.0,
            description: "No lesions".to_string(),
            treatment: vec![],
            preventative_measures: vec![],
        })
    }

    fn failure() -> Result<DiseaseAnalysis, DiagnosisError> {
        Err(DiagnosisError::AnalysisFailed)
    }

    fn setup(
        result: fn() -> Result<DiseaseAnalysis, DiagnosisError>,
    ) -> (DiagnosisService, Arc<FixedBackend>, Arc<MemoryHistory>) {
        let (sender, _) = broadcast::channel(4);
        let backend = Arc::new(FixedBackend {
            result,
            seen: Mutex::new(vec![]),
        });
        let history = Arc::new(MemoryHistory::default());

        let service = DiagnosisService::new(backend.clone(), history.clone(), &sender);

        (service, backend, history)
    }

    fn request(image: &str) -> AnalyzeCropRequest {
        AnalyzeCropRequest {
            image: image.to_string(),
            mime_type: None,
        }
    }

    #[tokio::test]
    async fn test_successful_analysis_is_recorded() {
        let (service, backend, history) = setup(healthy_tomato);

        let record = service.analyze(request("data:image/png;base64,AAAA")).await.unwrap();

        assert_eq!(record.analysis.crop_name, "Tomato");
        assert_eq!(backend.seen.lock().unwrap()[0].data, "AAAA");
        assert_eq!(history.records.lock().unwrap().len(), 1);
        assert_eq!(service.history().await.unwrap()[0].id, record.id);
    }

    #[tokio::test]
    async fn test_failed_analysis_is_not_recorded() {
        let (service, _backend, history) = setup(failure);

        let result = service.analyze(request("AAAA")).await;

        assert!(matches!(result, Err(ApiError::DiagnosisError(DiagnosisError::AnalysisFailed))));
        assert!(history.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_image_never_reaches_backend() {
        let (service, backend, _history) = setup(healthy_tomato);

        let result = service.analyze(request("")).await;

        assert!(matches!(result, Err(ApiError::DiagnosisError(DiagnosisError::InvalidImage))));
        assert!(backend.seen.lock().unwrap().is_empty());
    }
}

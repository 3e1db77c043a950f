use agriguard_api::models::{DiagnosisRecordResponse, DiseaseAnalysis};
use time::OffsetDateTime;

/// Persistence for completed diagnoses.
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    /// Records an analysis at the given time, pruning expired entries
    async fn append(
        &self,
        analysis: DiseaseAnalysis,
        time: OffsetDateTime,
    ) -> anyhow::Result<DiagnosisRecordResponse>;

    /// Entries still inside the retention window, newest first
    async fn recent(&self, now: OffsetDateTime) -> anyhow::Result<Vec<DiagnosisRecordResponse>>;

    /// Drops entries older than the retention window, returning how many went
    async fn prune(&self, now: OffsetDateTime) -> anyhow::Result<u64>;
}

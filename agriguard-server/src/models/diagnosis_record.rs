use agriguard_api::models::{DiagnosisRecordResponse, DiseaseAnalysis};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use super::Table;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct DiagnosisRecord {
    /// Synthetic identifier, a v4 UUID in text form
    pub id: String,
    pub crop_name: String,
    pub status: String,
    pub analysis: Json<DiseaseAnalysis>,
    /// The time the analysis completed
    pub time: OffsetDateTime,
}

impl DiagnosisRecord {
    pub fn new(analysis: DiseaseAnalysis, time: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            crop_name: analysis.crop_name.clone(),
            status: analysis.status.to_string(),
            analysis: Json(analysis),
            time,
        }
    }
}

impl TryFrom<DiagnosisRecord> for DiagnosisRecordResponse {
    type Error = uuid::Error;

    fn try_from(record: DiagnosisRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&record.id)?,
            analysis: record.analysis.0,
            time: record.time,
        })
    }
}

#[derive(Clone)]
pub struct DiagnosisRecordTable;

impl Table for DiagnosisRecordTable {
    fn name(&self) -> &'static str {
        "diagnosis_records"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS diagnosis_records (
                id VARCHAR(36) PRIMARY KEY,
                crop_name VARCHAR(255) NOT NULL,
                status VARCHAR(16) NOT NULL,
                analysis JSON NOT NULL,
                time TIMESTAMP NOT NULL
            );
            CREATE INDEX IF NOT EXISTS diagnosis_records_time_idx ON diagnosis_records (time);
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS diagnosis_records;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec![]
    }
}

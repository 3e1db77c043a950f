use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Infected,
    Warning,
}

impl core::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "Healthy"),
            HealthStatus::Infected => write!(f, "Infected"),
            HealthStatus::Warning => write!(f, "Warning"),
        }
    }
}

/// Structured crop health report as returned by the generative backend.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseAnalysis {
    /// Common and scientific crop name
    pub crop_name: String,
    /// Overall health verdict
    pub status: HealthStatus,
    /// Disease name when the crop is not healthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_name: Option<String>,
    /// Confidence of the verdict (0-100)
    pub confidence: f64,
    /// Detailed health summary
    pub description: String,
    /// Immediate treatment steps
    #[serde(default)]
    pub treatment: Vec<String>,
    /// Long term preventative measures
    #[serde(default)]
    pub preventative_measures: Vec<String>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeCropRequest {
    /// Base64 image data, optionally as a `data:` URL
    pub image: String,
    /// Image mime type, defaults to `image/jpeg`
    pub mime_type: Option<String>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRecordResponse {
    /// Synthetic record identifier
    pub id: Uuid,
    /// Stored analysis
    pub analysis: DiseaseAnalysis,
    /// Time the analysis completed
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
}

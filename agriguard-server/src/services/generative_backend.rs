use std::time::Duration;

use agriguard_api::models::{ChatMessage, ChatRole, DiseaseAnalysis};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::configs::Gemini;
use crate::errors::{ChatError, DiagnosisError};

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

const DIAGNOSIS_PROMPT: &str = "You are an expert plant pathologist. Analyze this crop image carefully.
1. Identify the specific crop (targeting a database of 120+ varieties including grains, vegetables and fruits).
2. Check for signs of pests, fungal infections, bacterial blight or nutrient deficiencies.
3. If the crop is healthy, set status to \"Healthy\". Otherwise identify the specific disease and set status to \"Infected\" or \"Warning\".
Return ONLY a JSON object with cropName, status, diseaseName, confidence (0-100), description, treatment and preventativeMeasures.";

pub const FARMY_SYSTEM_INSTRUCTION: &str = "You are Farmy, an expert agricultural assistant. \
You have deep expertise in plant pathology (identifying 120+ crop diseases), soil science, and smart irrigation systems. \
Help the user with crop health, irrigation schedules, and farm management. \
Be professional, scientific yet practical, and supportive. \
If a user asks about a disease, provide organic and chemical treatment suggestions. \
Keep responses concise but highly informative.";

/// Base64 image data ready to be inlined into a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

impl ImagePayload {
    /// Accepts raw base64 or a `data:<mime>;base64,<data>` URL.
    ///
    /// An explicit mime type wins over the one embedded in the URL.
    pub fn parse(image: &str, mime_type: Option<&str>) -> Result<Self, DiagnosisError> {
        let image = image.trim();

        let (embedded_mime, data) = match image.strip_prefix("data:") {
            Some(rest) => {
                let (header, data) = rest.split_once(',').ok_or(DiagnosisError::InvalidImage)?;
                let mime = header.split(';').next().filter(|mime| !mime.is_empty());
                (mime, data.trim())
            }
            None => (None, image),
        };

        if data.is_empty() {
            return Err(DiagnosisError::InvalidImage);
        }

        let mime_type = mime_type
            .map(str::trim)
            .filter(|mime| !mime.is_empty())
            .or(embedded_mime)
            .unwrap_or(DEFAULT_MIME_TYPE);

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }
}

/// External model used for crop analysis and the chat assistant.
#[async_trait::async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Classifies a crop image into a structured health report
    async fn analyze_crop(&self, image: &ImagePayload) -> Result<DiseaseAnalysis, DiagnosisError>;

    /// Produces the next model turn; an empty string means the model said nothing
    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, ChatError>;
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// Gemini REST client.
pub struct GeminiClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(settings: &Gemini) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone().filter(|key| !key.is_empty()),
        }
    }

    fn url(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        )
    }

    async fn generate(&self, api_key: &str, body: &Value) -> Result<GenerateContentResponse, reqwest::Error> {
        self.http_client
            .post(self.url(api_key))
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateContentResponse>()
            .await
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for GeminiClient {
    async fn analyze_crop(&self, image: &ImagePayload) -> Result<DiseaseAnalysis, DiagnosisError> {
        let api_key = self.api_key.as_deref().ok_or(DiagnosisError::MissingApiKey)?;

        let response = self
            .generate(api_key, &analysis_request(image))
            .await
            .map_err(|e| {
                tracing::error!(model = %self.model, "crop analysis request failed: {}", e);
                DiagnosisError::AnalysisFailed
            })?;

        let text = response.first_text().ok_or_else(|| {
            tracing::error!(model = %self.model, "crop analysis returned no text");
            DiagnosisError::AnalysisFailed
        })?;

        parse_analysis(text)
    }

    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;

        let response = self
            .generate(api_key, &chat_request(history, message))
            .await
            .map_err(|e| {
                tracing::error!(model = %self.model, "chat request failed: {}", e);
                ChatError::BackendUnavailable
            })?;

        Ok(response.first_text().unwrap_or_default().to_string())
    }
}

fn analysis_request(image: &ImagePayload) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "inlineData": { "mimeType": image.mime_type, "data": image.data } },
                { "text": DIAGNOSIS_PROMPT }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "cropName": { "type": "STRING", "description": "Common and scientific name of the crop" },
                    "status": { "type": "STRING", "enum": ["Healthy", "Infected", "Warning"] },
                    "diseaseName": { "type": "STRING", "description": "Name of the disease if any" },
                    "confidence": { "type": "NUMBER", "description": "Confidence score 0-100" },
                    "description": { "type": "STRING", "description": "Detailed health summary" },
                    "treatment": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "Immediate steps to take"
                    },
                    "preventativeMeasures": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "Long-term prevention tips"
                    }
                },
                "required": ["cropName", "status", "confidence", "description"]
            }
        }
    })
}

fn chat_request(history: &[ChatMessage], message: &str) -> Value {
    let mut contents: Vec<Value> = history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                ChatRole::User => "user",
                ChatRole::Model => "model",
            };
            json!({ "role": role, "parts": [{ "text": turn.text }] })
        })
        .collect();

    contents.push(json!({ "role": "user", "parts": [{ "text": message }] }));

    json!({
        "systemInstruction": { "parts": [{ "text": FARMY_SYSTEM_INSTRUCTION }] },
        "contents": contents,
    })
}

fn parse_analysis(text: &str) -> Result<DiseaseAnalysis, DiagnosisError> {
    let mut analysis: DiseaseAnalysis = serde_json::from_str(text.trim()).map_err(|e| {
        tracing::error!("crop analysis response is not a valid report: {}", e);
        DiagnosisError::AnalysisFailed
    })?;

    analysis.confidence = analysis.confidence.clamp(0.0, 100.0);

    Ok(analysis)
}

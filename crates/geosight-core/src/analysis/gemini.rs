//! Gemini `generateContent` client for location analysis.
//!
//! Sends the image inline with a fixed system instruction and a structured
//! output schema, then parses and sanitizes the JSON the model returns.
//! One HTTP call per analysis; no retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::GeminiConfig;
use crate::error::{GeoError, GeoResult};

use super::model::{AnalysisRequest, AnalysisResult};
use super::parse::parse_result;
use super::prompt::{system_instruction, USER_INSTRUCTION};
use super::sanitize::sanitize;
use super::schema::{response_schema, Schema};
use super::LocationAnalyzer;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini multimodal API.
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Output constraints: JSON only, shaped by the ordered response schema.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Schema,
}

impl GenerationConfig {
    /// The configuration sent with every analysis.
    pub fn for_analysis() -> Self {
        Self {
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated answer text of the first candidate, excluding thought parts.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiClient {
    /// Create a client from a resolved configuration.
    pub fn new(config: GeminiConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            config,
            client: builder.build().unwrap_or_default(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Build the request body for one image.
    pub fn build_request(&self, request: &AnalysisRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text {
                    text: system_instruction(&self.config.language),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.mime_type().to_string(),
                            data: request.image_bytes().to_string(),
                        },
                    },
                    Part::Text {
                        text: USER_INSTRUCTION.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig::for_analysis(),
        }
    }

    /// Submit one image and return the model's raw answer text.
    pub async fn generate(&self, request: &AnalysisRequest) -> GeoResult<String> {
        let request_id = Uuid::new_v4();
        let body = self.build_request(request);

        debug!(
            %request_id,
            model = %self.config.model,
            mime_type = %request.mime_type(),
            payload_len = request.image_bytes().len(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or(error_text);
            return Err(GeoError::Transport(format!(
                "Gemini API error (HTTP {}): {}",
                status, message
            )));
        }

        let bytes = response.bytes().await?;
        let envelope: GenerateContentResponse = serde_json::from_slice(&bytes)?;

        match envelope.text() {
            Some(text) => {
                debug!(%request_id, text_len = text.len(), "Gemini response received");
                Ok(text)
            }
            None => {
                let finish_reason = envelope
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone());
                let block_reason = envelope.prompt_feedback.and_then(|f| f.block_reason);
                debug!(%request_id, ?finish_reason, ?block_reason, "Gemini returned no text");
                Err(GeoError::EmptyResponse)
            }
        }
    }

    async fn generate_result(&self, request: &AnalysisRequest) -> GeoResult<AnalysisResult> {
        let text = self.generate(request).await?;
        parse_result(&text)
    }
}

#[async_trait]
impl LocationAnalyzer for GeminiClient {
    async fn analyze(&self, request: AnalysisRequest) -> GeoResult<AnalysisResult> {
        match self.generate_result(&request).await {
            Ok(result) => {
                let result = sanitize(result);
                info!(
                    country = %result.country,
                    latitude = result.latitude,
                    longitude = result.longitude,
                    confidence = result.confidence,
                    "Location estimated"
                );
                Ok(result)
            }
            Err(e) => {
                error!(error = %e, "Gemini analysis failed");
                Err(e)
            }
        }
    }
}

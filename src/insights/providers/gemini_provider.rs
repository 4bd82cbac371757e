//! Gemini API provider
//!
//! Calls `models/{model}:generateContent` with a structured-output schema

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::insights::provider::{
    GenerationRequest, GenerationResponse, InsightError, InsightProvider,
};

/// Gemini content block
#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPartOut<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPartOut<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
}

/// Gemini generateContent request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig<'a>,
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPartIn>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartIn {
    #[serde(default)]
    text: Option<String>,
}

/// Gemini provider configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Gemini insight provider
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InsightError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl InsightProvider for GeminiProvider {
    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, InsightError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(InsightError::MissingApiKey)?;

        let body = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPartOut {
                    text: &request.prompt,
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: &request.response_mime_type,
                response_schema: &request.response_schema,
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InsightError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InsightError::ServiceError {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let gemini_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| InsightError::InvalidResponse(format!("Undecodable response: {}", e)))?;

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| InsightError::InvalidResponse("No candidates returned".to_string()))?;

        let content = candidate.content.ok_or_else(|| {
            InsightError::InvalidResponse(format!(
                "Candidate has no content (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();

        Ok(GenerationResponse {
            text,
            model: gemini_response
                .model_version
                .unwrap_or_else(|| self.config.model.clone()),
            finish_reason: candidate.finish_reason,
        })
    }
}

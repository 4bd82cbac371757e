//! Insight provider trait and types
//!
//! Defines the common interface for text-generation backends that answer an
//! insight request with structured JSON text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error types for insight generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsightError {
    /// No API key configured, nothing was sent
    MissingApiKey,
    /// Transport failure (connect, timeout, body read)
    RequestFailed(String),
    /// The service answered with a non-success status
    ServiceError { status: u16, body: String },
    /// The service answered, but not with usable insights
    InvalidResponse(String),
    /// The request could not be built
    InvalidRequest(String),
    /// The refresh was cancelled before it completed
    Cancelled,
}

impl fmt::Display for InsightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightError::MissingApiKey => {
                write!(f, "API key missing: set GEMINI_API_KEY or API_KEY")
            }
            InsightError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            InsightError::ServiceError { status, body } => {
                write!(f, "Service returned {}: {}", status, body)
            }
            InsightError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            InsightError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            InsightError::Cancelled => write!(f, "Insight refresh cancelled"),
        }
    }
}

impl std::error::Error for InsightError {}

/// A single structured-output generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Natural-language instruction, including the embedded data
    pub prompt: String,
    /// Expected MIME type of the answer (e.g. "application/json")
    pub response_mime_type: String,
    /// Schema the answer must follow
    pub response_schema: serde_json::Value,
}

/// Raw answer from a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Generated text, expected to hold JSON
    pub text: String,
    /// Model that generated the response
    pub model: String,
    /// Finish reason reported by the service
    pub finish_reason: Option<String>,
}

/// Trait all insight backends implement
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Provider name (e.g. "gemini")
    fn provider_name(&self) -> &'static str;

    /// Run one generation request; exactly one outbound call per invocation
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, InsightError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InsightError::ServiceError {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "Service returned 503: overloaded");
        assert_eq!(InsightError::Cancelled.to_string(), "Insight refresh cancelled");
    }
}

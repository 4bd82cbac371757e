//! Scripted provider for tests.
//!
//! Answers requests with a scripted response, counts calls, and can hold
//! requests at a gate until the test releases them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::insights::provider::{
    GenerationRequest, GenerationResponse, InsightError, InsightProvider,
};

/// A well-formed three-insight answer
pub const SAMPLE_RESPONSE: &str = r#"[
    {"title": "Children's ministry is growing", "description": "Children attendance rose 55% since January.", "type": "growth", "priority": "high"},
    {"title": "Special seed drives income", "description": "Seed giving accounts for a quarter of income.", "type": "finance", "priority": "medium"},
    {"title": "Welfare spending spiked", "description": "Welfare doubled on 2024-01-28.", "type": "warning", "priority": "low"}
]"#;

pub struct ScriptedProvider {
    response: Mutex<Result<String, InsightError>>,
    gate: Option<Arc<Notify>>,
    calls: AtomicU32,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_result(Ok(text.into()))
    }

    pub fn failing(error: InsightError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(response: Result<String, InsightError>) -> Self {
        Self {
            response: Mutex::new(response),
            gate: None,
            calls: AtomicU32::new(0),
            in_flight: AtomicU32::new(0),
            max_in_flight: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Hold each request until `release` is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Answer later requests with `text`
    pub fn set_response(&self, text: impl Into<String>) {
        *self.response.lock().unwrap() = Ok(text.into());
    }

    /// Fail later requests with `error`
    pub fn set_failure(&self, error: InsightError) {
        *self.response.lock().unwrap() = Err(error);
    }

    /// Let one held request through
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl InsightProvider for ScriptedProvider {
    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, InsightError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(request.prompt);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let response = self.response.lock().unwrap().clone();
        response.map(|text| GenerationResponse {
            text,
            model: "scripted-model".to_string(),
            finish_reason: Some("STOP".to_string()),
        })
    }
}

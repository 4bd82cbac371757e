//! Insight client
//!
//! Turns recent records into a generation request, sends it through the
//! configured provider, and parses the answer into typed insights.

use std::sync::Arc;

use crate::insights::prompt::{build_prompt, response_schema, RESPONSE_MIME_TYPE};
use crate::insights::provider::{GenerationRequest, InsightError, InsightProvider};
use crate::insights::types::AiInsight;
use crate::records::{AttendanceRecord, FinanceRecord};

/// Default number of most recent records sent with each request
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// The last `n` records of a sequence
pub fn recent<T>(records: &[T], n: usize) -> &[T] {
    &records[records.len().saturating_sub(n)..]
}

/// Parse response text as a JSON array of insights.
///
/// Empty text reads as an empty list. Any element of the wrong shape makes the
/// whole response unusable.
pub fn parse_insights(text: &str) -> Result<Vec<AiInsight>, InsightError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(text).map_err(|e| InsightError::InvalidResponse(e.to_string()))
}

pub struct InsightClient {
    provider: Arc<dyn InsightProvider>,
    history_window: usize,
}

impl InsightClient {
    pub fn new(provider: Arc<dyn InsightProvider>, history_window: usize) -> Self {
        Self {
            provider,
            history_window,
        }
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Build the request from the most recent `history_window` records
    pub fn build_request(
        &self,
        attendance: &[AttendanceRecord],
        finance: &[FinanceRecord],
    ) -> Result<GenerationRequest, InsightError> {
        let prompt = build_prompt(
            recent(attendance, self.history_window),
            recent(finance, self.history_window),
        )?;

        Ok(GenerationRequest {
            prompt,
            response_mime_type: RESPONSE_MIME_TYPE.to_string(),
            response_schema: response_schema(),
        })
    }

    /// Request insights, surfacing every failure
    pub async fn fetch_insights(
        &self,
        attendance: &[AttendanceRecord],
        finance: &[FinanceRecord],
    ) -> Result<Vec<AiInsight>, InsightError> {
        let request = self.build_request(attendance, finance)?;
        log::debug!(
            "Requesting insights from {} ({} chars of prompt)",
            self.provider.provider_name(),
            request.prompt.len()
        );

        let response = self.provider.generate(request).await?;
        let insights = parse_insights(&response.text)?;

        log::info!(
            "Received {} insights from model {}",
            insights.len(),
            response.model
        );
        Ok(insights)
    }

    /// Request insights, turning any failure into an empty list
    pub async fn generate_insights(
        &self,
        attendance: &[AttendanceRecord],
        finance: &[FinanceRecord],
    ) -> Vec<AiInsight> {
        match self.fetch_insights(attendance, finance).await {
            Ok(insights) => insights,
            Err(e) => {
                log::warn!("Error fetching insights: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::providers::scripted::{ScriptedProvider, SAMPLE_RESPONSE};
    use crate::insights::types::{InsightPriority, InsightType};
    use crate::records::seed::{seed_attendance, seed_finance};
    use crate::records::AttendanceDraft;
    use chrono::NaiveDate;

    #[test]
    fn test_recent_window() {
        let values: Vec<u32> = (1..=12).collect();
        assert_eq!(recent(&values, 10), &values[2..]);
        assert_eq!(recent(&values[..3], 10), &values[..3]);
        assert!(recent::<u32>(&[], 10).is_empty());
    }

    #[test]
    fn test_parse_valid_response() {
        let insights = parse_insights(SAMPLE_RESPONSE).unwrap();
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].kind, InsightType::Growth);
        assert_eq!(insights[2].priority, InsightPriority::Low);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(parse_insights("not json at all").is_err());
        assert!(parse_insights(r#"{"title":"x"}"#).is_err());
        // One bad enum value spoils the whole response
        let bad_enum = r#"[
            {"title":"a","description":"b","type":"growth","priority":"high"},
            {"title":"a","description":"b","type":"outreach","priority":"high"}
        ]"#;
        assert!(matches!(
            parse_insights(bad_enum),
            Err(InsightError::InvalidResponse(_))
        ));
        let missing = r#"[{"title":"a","type":"growth","priority":"high"}]"#;
        assert!(parse_insights(missing).is_err());
    }

    #[test]
    fn test_parse_empty_text_is_empty_list() {
        assert_eq!(parse_insights("  \n").unwrap(), Vec::new());
        assert_eq!(parse_insights("[]").unwrap(), Vec::new());
    }

    #[test]
    fn test_request_uses_last_ten_records() {
        let client = InsightClient::new(Arc::new(ScriptedProvider::new(SAMPLE_RESPONSE)), 10);

        let mut attendance = seed_attendance();
        let date = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        for i in 0..6 {
            let draft = AttendanceDraft { date, men: 100 + i, women: 0, children: 0 };
            attendance.push(AttendanceRecord::from_draft(format!("x{}", i), &draft).unwrap());
        }

        let request = client.build_request(&attendance, &[]).unwrap();
        assert!(!request.prompt.contains(r#""id":"1""#));
        assert!(!request.prompt.contains(r#""id":"2""#));
        assert!(request.prompt.contains(r#""id":"3""#));
        assert!(request.prompt.contains(r#""id":"x5""#));
        assert_eq!(request.response_mime_type, "application/json");
    }

    #[tokio::test]
    async fn test_fetch_insights() {
        let provider = Arc::new(ScriptedProvider::new(SAMPLE_RESPONSE));
        let client = InsightClient::new(provider.clone(), 10);

        let insights = client.fetch_insights(&seed_attendance(), &seed_finance()).await.unwrap();
        assert_eq!(insights.len(), 3);
        assert_eq!(provider.call_count(), 1);
        assert!(provider.last_prompt().unwrap().contains("Finance History"));
    }

    #[tokio::test]
    async fn test_non_json_response_soft_fails() {
        let provider = Arc::new(ScriptedProvider::new("Sorry, I can't help with that."));
        let client = InsightClient::new(provider.clone(), 10);

        let err = client.fetch_insights(&[], &[]).await.unwrap_err();
        assert!(matches!(err, InsightError::InvalidResponse(_)));

        let insights = client.generate_insights(&[], &[]).await;
        assert!(insights.is_empty());
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_transport_error_soft_fails() {
        let provider = Arc::new(ScriptedProvider::failing(InsightError::RequestFailed(
            "connection refused".to_string(),
        )));
        let client = InsightClient::new(provider, 10);

        assert!(client.generate_insights(&[], &[]).await.is_empty());
    }
}

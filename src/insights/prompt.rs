//! Prompt and response schema for insight generation

use serde_json::{json, Value};

use crate::insights::provider::InsightError;
use crate::records::{AttendanceRecord, FinanceRecord};

/// Number of insights requested per refresh
pub const INSIGHT_COUNT: usize = 3;

/// MIME type the service is asked to answer with
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Build the instruction with both histories embedded as JSON
pub fn build_prompt(
    attendance: &[AttendanceRecord],
    finance: &[FinanceRecord],
) -> Result<String, InsightError> {
    let attendance_json = serde_json::to_string(attendance)
        .map_err(|e| InsightError::InvalidRequest(format!("attendance history: {}", e)))?;
    let finance_json = serde_json::to_string(finance)
        .map_err(|e| InsightError::InvalidRequest(format!("finance history: {}", e)))?;

    Ok(format!(
        "Analyze the following church data and provide {count} actionable growth and financial insights.\n\
         Note that attendance is split between Men, Women, and Children. Look for imbalances or specific demographic growth patterns.\n\
         Format the response as a JSON array of exactly {count} objects with keys: title, description, \
         type (one of: growth, finance, warning), and priority (one of: high, medium, low).\n\
         \n\
         Attendance History: {attendance}\n\
         Finance History: {finance}\n",
        count = INSIGHT_COUNT,
        attendance = attendance_json,
        finance = finance_json,
    ))
}

/// Structured-output schema: an array of objects with four required string properties
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
                "type": {
                    "type": "STRING",
                    "format": "enum",
                    "enum": ["growth", "finance", "warning"]
                },
                "priority": {
                    "type": "STRING",
                    "format": "enum",
                    "enum": ["high", "medium", "low"]
                }
            },
            "required": ["title", "description", "type", "priority"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::seed::{seed_attendance, seed_finance};

    #[test]
    fn test_prompt_embeds_histories() {
        let prompt = build_prompt(&seed_attendance()[..2], &seed_finance()[..1]).unwrap();

        assert!(prompt.contains("provide 3 actionable"));
        assert!(prompt.contains(r#""dayOfWeek":"Sunday""#));
        assert!(prompt.contains(r#""specialSeed":120000.0"#));
        assert!(prompt.contains("type (one of: growth, finance, warning)"));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(schema["type"], "ARRAY");
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert_eq!(schema["items"]["properties"]["priority"]["enum"][2], "low");
    }
}

//! Form input and validated drafts
//!
//! Views submit raw text fields (`AttendanceForm`, `FinanceForm`). They are
//! validated into typed drafts before a record is built:
//! - a missing or blank number counts as 0
//! - a blank date means today
//! - anything else that does not parse is rejected, never coerced

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::records::types::attendance_total;

/// Validation failures for submitted form input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("{field} must be a number, got \"{input}\"")]
    NotANumber { field: &'static str, input: String },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error("{field} must be a finite amount")]
    NotFinite { field: &'static str },

    #[error("{field} is too large")]
    TooLarge { field: &'static str },

    #[error("Invalid date \"{0}\", expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Raw attendance form as submitted by the view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceForm {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub men: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub women: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub children: Option<String>,
}

/// Raw finance form as submitted by the view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceForm {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub tithes: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub offerings: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub special_seed: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub welfare: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub utility: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub program: Option<String>,
}

/// Validated attendance input
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceDraft {
    pub date: NaiveDate,
    pub men: u32,
    pub women: u32,
    pub children: u32,
}

/// Validated finance input
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceDraft {
    pub date: NaiveDate,
    pub tithes: f64,
    pub offerings: f64,
    pub special_seed: f64,
    pub welfare: f64,
    pub utility: f64,
    pub program: f64,
}

impl AttendanceDraft {
    pub fn from_form(form: &AttendanceForm, today: NaiveDate) -> Result<Self, DraftError> {
        let draft = Self {
            date: parse_date(form.date.as_deref(), today)?,
            men: parse_count("men", form.men.as_deref())?,
            women: parse_count("women", form.women.as_deref())?,
            children: parse_count("children", form.children.as_deref())?,
        };
        draft.total()?;
        Ok(draft)
    }

    /// men + women + children, rejected when it does not fit a count
    pub fn total(&self) -> Result<u32, DraftError> {
        attendance_total(self.men, self.women, self.children)
            .ok_or(DraftError::TooLarge { field: "total" })
    }
}

impl FinanceDraft {
    /// All-zero draft for the given date
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            tithes: 0.0,
            offerings: 0.0,
            special_seed: 0.0,
            welfare: 0.0,
            utility: 0.0,
            program: 0.0,
        }
    }

    pub fn from_form(form: &FinanceForm, today: NaiveDate) -> Result<Self, DraftError> {
        Ok(Self {
            date: parse_date(form.date.as_deref(), today)?,
            tithes: parse_amount("tithes", form.tithes.as_deref())?,
            offerings: parse_amount("offerings", form.offerings.as_deref())?,
            special_seed: parse_amount("specialSeed", form.special_seed.as_deref())?,
            welfare: parse_amount("welfare", form.welfare.as_deref())?,
            utility: parse_amount("utility", form.utility.as_deref())?,
            program: parse_amount("program", form.program.as_deref())?,
        })
    }
}

fn blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, DraftError> {
    match blank(raw) {
        None => Ok(today),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| DraftError::InvalidDate(s.to_string())),
    }
}

fn parse_count(field: &'static str, raw: Option<&str>) -> Result<u32, DraftError> {
    let Some(s) = blank(raw) else {
        return Ok(0);
    };

    match s.parse::<u32>() {
        Ok(n) => Ok(n),
        Err(_) if s.parse::<i64>().map(|n| n < 0).unwrap_or(false) => {
            Err(DraftError::Negative { field })
        }
        Err(_) => Err(DraftError::NotANumber {
            field,
            input: s.to_string(),
        }),
    }
}

fn parse_amount(field: &'static str, raw: Option<&str>) -> Result<f64, DraftError> {
    let Some(s) = blank(raw) else {
        return Ok(0.0);
    };

    let value: f64 = s.parse().map_err(|_| DraftError::NotANumber {
        field,
        input: s.to_string(),
    })?;

    if !value.is_finite() {
        return Err(DraftError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(DraftError::Negative { field });
    }

    Ok(value.abs())
}

/// Accept either a JSON string or a JSON number for a form field
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawField {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<RawField>::deserialize(deserializer)?.map(|field| match field {
        RawField::Text(s) => s,
        RawField::Number(n) => n.to_string(),
    }))
}

//! Attendance and finance record types
//!
//! Derived sums are computed once, when a record is built, and stored with it.
//! Numeric fields read a stored `null` as 0; older builds wrote unparsable
//! input that way.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

use crate::records::draft::{AttendanceDraft, DraftError, FinanceDraft};

/// One service's headcount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    /// ISO calendar date (YYYY-MM-DD)
    pub date: String,
    pub day_of_week: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub men: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub women: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub children: u32,
    /// Always men + women + children
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total: u32,
}

impl AttendanceRecord {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        men: u32,
        women: u32,
        children: u32,
    ) -> Result<Self, DraftError> {
        let total = attendance_total(men, women, children)
            .ok_or(DraftError::TooLarge { field: "total" })?;

        Ok(Self {
            id: id.into(),
            date: date.format("%Y-%m-%d").to_string(),
            day_of_week: weekday_name(date.weekday()).to_string(),
            men,
            women,
            children,
            total,
        })
    }

    pub fn from_draft(id: impl Into<String>, draft: &AttendanceDraft) -> Result<Self, DraftError> {
        Self::new(id, draft.date, draft.men, draft.women, draft.children)
    }

    /// Recompute `total` from the three headcounts
    pub fn rebuild_total(&mut self) -> Result<(), DraftError> {
        self.total = attendance_total(self.men, self.women, self.children)
            .ok_or(DraftError::TooLarge { field: "total" })?;
        Ok(())
    }
}

/// Sum of the three headcounts, `None` on overflow
pub fn attendance_total(men: u32, women: u32, children: u32) -> Option<u32> {
    men.checked_add(women)?.checked_add(children)
}

/// One service's income and expenses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRecord {
    pub id: String,
    pub date: String,
    // Income
    #[serde(default, deserialize_with = "null_as_zero")]
    pub tithes: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub offerings: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub special_seed: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_income: f64,
    // Expenses
    #[serde(default, deserialize_with = "null_as_zero")]
    pub welfare: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub utility: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub program: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_expenses: f64,
    /// total_income - total_expenses, may be negative
    #[serde(default, deserialize_with = "null_as_zero")]
    pub net_position: f64,
}

impl FinanceRecord {
    pub fn from_draft(id: impl Into<String>, draft: &FinanceDraft) -> Self {
        let mut record = Self {
            id: id.into(),
            date: draft.date.format("%Y-%m-%d").to_string(),
            tithes: draft.tithes,
            offerings: draft.offerings,
            special_seed: draft.special_seed,
            welfare: draft.welfare,
            utility: draft.utility,
            program: draft.program,
            ..Self::default()
        };
        record.rebuild_totals();
        record
    }

    /// Recompute income, expense and net totals from the six inputs
    pub fn rebuild_totals(&mut self) {
        self.total_income = self.tithes + self.offerings + self.special_seed;
        self.total_expenses = self.welfare + self.utility + self.program;
        self.net_position = self.total_income - self.total_expenses;
    }

    /// Read a numeric field by name
    pub fn field(&self, field: FinanceField) -> f64 {
        match field {
            FinanceField::Tithes => self.tithes,
            FinanceField::Offerings => self.offerings,
            FinanceField::SpecialSeed => self.special_seed,
            FinanceField::TotalIncome => self.total_income,
            FinanceField::Welfare => self.welfare,
            FinanceField::Utility => self.utility,
            FinanceField::Program => self.program,
            FinanceField::TotalExpenses => self.total_expenses,
            FinanceField::NetPosition => self.net_position,
        }
    }
}

/// Numeric fields of a finance record, used for aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinanceField {
    Tithes,
    Offerings,
    SpecialSeed,
    TotalIncome,
    Welfare,
    Utility,
    Program,
    TotalExpenses,
    NetPosition,
}

fn null_as_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// English weekday label, e.g. "Sunday"
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_attendance_total_and_weekday() {
        let record = AttendanceRecord::new("1", date("2024-03-13"), 10, 20, 5).unwrap();
        assert_eq!(record.total, 35);
        assert_eq!(record.day_of_week, "Wednesday");
        assert_eq!(record.date, "2024-03-13");
    }

    #[test]
    fn test_attendance_total_overflow() {
        assert_eq!(attendance_total(1, 2, 3), Some(6));
        assert_eq!(attendance_total(u32::MAX, 0, 0), Some(u32::MAX));
        assert_eq!(attendance_total(3_000_000_000, 3_000_000_000, 0), None);

        let err = AttendanceRecord::new("1", date("2024-03-13"), u32::MAX, 1, 0).unwrap_err();
        assert_eq!(err, DraftError::TooLarge { field: "total" });
    }

    #[test]
    fn test_finance_derived_sums() {
        let draft = FinanceDraft {
            date: date("2024-01-07"),
            tithes: 250_000.0,
            offerings: 45_000.0,
            special_seed: 120_000.0,
            welfare: 50_000.0,
            utility: 35_000.0,
            program: 120_000.0,
        };
        let record = FinanceRecord::from_draft("1", &draft);
        assert_eq!(record.total_income, 415_000.0);
        assert_eq!(record.total_expenses, 205_000.0);
        assert_eq!(record.net_position, 210_000.0);
        assert_eq!(record.field(FinanceField::SpecialSeed), 120_000.0);
    }

    #[test]
    fn test_net_position_can_be_negative() {
        let draft = FinanceDraft {
            date: date("2024-01-07"),
            tithes: 100.0,
            welfare: 250.5,
            ..FinanceDraft::empty(date("2024-01-07"))
        };
        let record = FinanceRecord::from_draft("x", &draft);
        assert_eq!(record.net_position, -150.5);
    }

    #[test]
    fn test_null_numbers_read_as_zero() {
        let legacy = r#"{"id":"7","date":"2024-01-07","dayOfWeek":"Sunday",
            "men":null,"women":20,"children":5,"total":null}"#;
        let mut record: AttendanceRecord = serde_json::from_str(legacy).unwrap();
        assert_eq!(record.men, 0);
        record.rebuild_total().unwrap();
        assert_eq!(record.total, 25);

        let legacy = r#"{"id":"8","date":"2024-01-07","tithes":100,"offerings":null,
            "specialSeed":50,"totalIncome":null,"welfare":30,"utility":null,"program":0,
            "totalExpenses":null,"netPosition":null}"#;
        let mut record: FinanceRecord = serde_json::from_str(legacy).unwrap();
        record.rebuild_totals();
        assert_eq!(record.total_income, 150.0);
        assert_eq!(record.total_expenses, 30.0);
        assert_eq!(record.net_position, 120.0);
    }

    #[test]
    fn test_camel_case_wire_names() {
        let record = AttendanceRecord::new("1", date("2024-01-07"), 1, 2, 3).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dayOfWeek"], "Sunday");

        let legacy = r#"{"id":"1","date":"2024-01-07","tithes":250000,"offerings":45000,
            "specialSeed":120000,"totalIncome":415000,"welfare":50000,"utility":35000,
            "program":120000,"totalExpenses":205000,"netPosition":210000}"#;
        let finance: FinanceRecord = serde_json::from_str(legacy).unwrap();
        assert_eq!(finance.special_seed, 120_000.0);
        assert_eq!(finance.net_position, 210_000.0);
    }
}

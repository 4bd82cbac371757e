//! Metrics engine
//!
//! Pure functions deriving KPIs from the record sequences. Nothing here
//! touches storage or the network.

pub mod dashboard;

pub use dashboard::{DashboardSummary, DemographicSplit, IncomeSplit};

use crate::records::{FinanceField, FinanceRecord};

/// Round to the nearest integer, halves towards positive infinity
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Last and second-to-last element, with `Default` standing in for each one missing
pub fn latest_and_previous<T: Clone + Default>(records: &[T]) -> (T, T) {
    let latest = records.last().cloned().unwrap_or_default();
    let previous = records
        .len()
        .checked_sub(2)
        .and_then(|i| records.get(i))
        .cloned()
        .unwrap_or_default();
    (latest, previous)
}

/// Whole-percent change from `previous` to `current`.
///
/// A zero baseline always reports 100, even when `current` is also zero.
pub fn percent_change(previous: f64, current: f64) -> i64 {
    if previous == 0.0 {
        return 100;
    }
    round_half_up((current - previous) / previous * 100.0)
}

/// Sum of one numeric field across every finance record
pub fn aggregate_totals(records: &[FinanceRecord], field: FinanceField) -> f64 {
    records.iter().map(|r| r.field(field)).sum()
}

/// Rounded share of `whole` for each part; all zeros when `whole` is zero
pub fn distribution_percentages(parts: &[f64], whole: f64) -> Vec<i64> {
    if whole == 0.0 {
        return vec![0; parts.len()];
    }
    parts
        .iter()
        .map(|part| round_half_up(part / whole * 100.0))
        .collect()
}

/// Newest-first copy of a sequence, as the history tables list it
pub fn recent_first<T: Clone>(records: &[T]) -> Vec<T> {
    records.iter().rev().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::seed::{seed_attendance, seed_finance};
    use crate::records::AttendanceRecord;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
    }

    #[test]
    fn test_latest_and_previous() {
        let records = seed_attendance();
        let (latest, previous) = latest_and_previous(&records);
        assert_eq!(latest.total, 232);
        assert_eq!(previous.total, 220);

        let (latest, previous) = latest_and_previous(&records[..1]);
        assert_eq!(latest.total, 165);
        assert_eq!(previous, AttendanceRecord::default());

        let (latest, previous) = latest_and_previous::<AttendanceRecord>(&[]);
        assert_eq!(latest.total, 0);
        assert_eq!(previous.total, 0);
    }

    #[test]
    fn test_percent_change_zero_baseline() {
        assert_eq!(percent_change(0.0, 0.0), 100);
        assert_eq!(percent_change(0.0, 57.0), 100);
        assert_eq!(percent_change(0.0, 1e9), 100);
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(220.0, 232.0), 5);
        assert_eq!(percent_change(408_000.0, 545_000.0), 34);
        assert_eq!(percent_change(200.0, 100.0), -50);
        assert_eq!(percent_change(50.0, 50.0), 0);
    }

    #[test]
    fn test_aggregate_totals() {
        let finance = seed_finance();
        assert_eq!(aggregate_totals(&finance, FinanceField::Tithes), 1_060_000.0);
        assert_eq!(aggregate_totals(&finance, FinanceField::Offerings), 200_000.0);
        assert_eq!(aggregate_totals(&finance, FinanceField::SpecialSeed), 450_000.0);
        assert_eq!(aggregate_totals(&[], FinanceField::Tithes), 0.0);
    }

    #[test]
    fn test_distribution_zero_whole() {
        assert_eq!(distribution_percentages(&[5.0, 7.0, 9.0], 0.0), vec![0, 0, 0]);
    }

    #[test]
    fn test_distribution_percentages() {
        assert_eq!(
            distribution_percentages(&[50.0, 30.0, 20.0], 100.0),
            vec![50, 30, 20]
        );
        assert_eq!(
            distribution_percentages(&[75.0, 87.0, 70.0], 232.0),
            vec![32, 38, 30]
        );
    }

    #[test]
    fn test_recent_first() {
        let records = seed_attendance();
        let reversed = recent_first(&records);
        assert_eq!(reversed.first().map(|r| r.id.as_str()), Some("6"));
        assert_eq!(reversed.last().map(|r| r.id.as_str()), Some("1"));
    }
}

//! Bundled seed dataset, used when the store has no usable data

use crate::records::types::{AttendanceRecord, FinanceRecord};

fn attendance(id: &str, date: &str, men: u32, women: u32, children: u32) -> AttendanceRecord {
    AttendanceRecord {
        id: id.to_string(),
        date: date.to_string(),
        day_of_week: "Sunday".to_string(),
        men,
        women,
        children,
        total: men.saturating_add(women).saturating_add(children),
    }
}

#[allow(clippy::too_many_arguments)]
fn finance(
    id: &str,
    date: &str,
    tithes: f64,
    offerings: f64,
    special_seed: f64,
    welfare: f64,
    utility: f64,
    program: f64,
) -> FinanceRecord {
    let total_income = tithes + offerings + special_seed;
    let total_expenses = welfare + utility + program;
    FinanceRecord {
        id: id.to_string(),
        date: date.to_string(),
        tithes,
        offerings,
        special_seed,
        total_income,
        welfare,
        utility,
        program,
        total_expenses,
        net_position: total_income - total_expenses,
    }
}

/// Six Sunday services, January to mid-February 2024
pub fn seed_attendance() -> Vec<AttendanceRecord> {
    vec![
        attendance("1", "2024-01-07", 55, 65, 45),
        attendance("2", "2024-01-14", 60, 75, 50),
        attendance("3", "2024-01-21", 58, 70, 55),
        attendance("4", "2024-01-28", 70, 80, 60),
        attendance("5", "2024-02-04", 72, 83, 65),
        attendance("6", "2024-02-11", 75, 87, 70),
    ]
}

/// Four Sundays of January 2024
pub fn seed_finance() -> Vec<FinanceRecord> {
    vec![
        finance("1", "2024-01-07", 250_000.0, 45_000.0, 120_000.0, 50_000.0, 35_000.0, 120_000.0),
        finance("2", "2024-01-14", 210_000.0, 52_000.0, 80_000.0, 30_000.0, 42_000.0, 15_000.0),
        finance("3", "2024-01-21", 320_000.0, 38_000.0, 50_000.0, 45_000.0, 38_000.0, 60_000.0),
        finance("4", "2024-01-28", 280_000.0, 65_000.0, 200_000.0, 100_000.0, 45_000.0, 80_000.0),
    ]
}

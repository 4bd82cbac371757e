//! Dashboard KPIs derived from both record sequences

use serde::{Deserialize, Serialize};

use crate::metrics::{aggregate_totals, distribution_percentages, latest_and_previous, percent_change};
use crate::records::{AttendanceRecord, FinanceField, FinanceRecord};

/// Percentage split of the latest service's headcount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicSplit {
    pub men: i64,
    pub women: i64,
    pub children: i64,
}

/// Percentage split of all-time income by source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSplit {
    pub tithes: i64,
    pub offerings: i64,
    pub special_seed: i64,
}

/// Everything the dashboard cards and charts show
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub latest_attendance: u32,
    pub attendance_growth: i64,
    pub latest_men: u32,
    pub latest_women: u32,
    pub latest_children: u32,
    pub attendance_split: DemographicSplit,
    pub latest_income: f64,
    pub income_growth: i64,
    pub latest_net_position: f64,
    pub total_tithes: f64,
    pub total_offerings: f64,
    pub total_special_seed: f64,
    pub income_split: IncomeSplit,
}

impl DashboardSummary {
    pub fn compute(attendance: &[AttendanceRecord], finance: &[FinanceRecord]) -> Self {
        let (latest, previous) = latest_and_previous(attendance);
        let (latest_fin, previous_fin) = latest_and_previous(finance);

        let split = distribution_percentages(
            &[latest.men as f64, latest.women as f64, latest.children as f64],
            latest.total as f64,
        );

        let total_tithes = aggregate_totals(finance, FinanceField::Tithes);
        let total_offerings = aggregate_totals(finance, FinanceField::Offerings);
        let total_special_seed = aggregate_totals(finance, FinanceField::SpecialSeed);
        let income = distribution_percentages(
            &[total_tithes, total_offerings, total_special_seed],
            total_tithes + total_offerings + total_special_seed,
        );

        Self {
            latest_attendance: latest.total,
            attendance_growth: percent_change(previous.total as f64, latest.total as f64),
            latest_men: latest.men,
            latest_women: latest.women,
            latest_children: latest.children,
            attendance_split: DemographicSplit {
                men: split[0],
                women: split[1],
                children: split[2],
            },
            latest_income: latest_fin.total_income,
            income_growth: percent_change(previous_fin.total_income, latest_fin.total_income),
            latest_net_position: latest_fin.total_income - latest_fin.total_expenses,
            total_tithes,
            total_offerings,
            total_special_seed,
            income_split: IncomeSplit {
                tithes: income[0],
                offerings: income[1],
                special_seed: income[2],
            },
        }
    }
}

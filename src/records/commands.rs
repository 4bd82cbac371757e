//! Tauri commands for attendance and finance records

use tauri::State;

use crate::metrics::DashboardSummary;
use crate::records::{AttendanceForm, AttendanceRecord, FinanceForm, FinanceRecord};
use crate::state::AppState;

/// Get all attendance records in insertion order
#[tauri::command]
pub async fn get_attendance(state: State<'_, AppState>) -> Result<Vec<AttendanceRecord>, String> {
    Ok(state.attendance().await)
}

/// Get all finance records in insertion order
#[tauri::command]
pub async fn get_finance(state: State<'_, AppState>) -> Result<Vec<FinanceRecord>, String> {
    Ok(state.finance().await)
}

/// Validate and append an attendance record
#[tauri::command]
pub async fn append_attendance(
    state: State<'_, AppState>,
    form: AttendanceForm,
) -> Result<AttendanceRecord, String> {
    state.append_attendance(form).await.map_err(|e| e.to_string())
}

/// Validate and append a finance record
#[tauri::command]
pub async fn append_finance(
    state: State<'_, AppState>,
    form: FinanceForm,
) -> Result<FinanceRecord, String> {
    state.append_finance(form).await.map_err(|e| e.to_string())
}

/// KPI cards and chart data for the dashboard
#[tauri::command]
pub async fn get_dashboard_summary(state: State<'_, AppState>) -> Result<DashboardSummary, String> {
    Ok(state.dashboard_summary().await)
}

//! Tauri commands for AI insights

use tauri::{AppHandle, Emitter, State};

use crate::insights::{AiInsight, InsightGroups, InsightStatus, RefreshOutcome};
use crate::state::AppState;

/// Event emitted with the new `InsightStatus` after every refresh
pub const INSIGHTS_UPDATED_EVENT: &str = "insights-updated";

#[tauri::command]
pub async fn get_insights(state: State<'_, AppState>) -> Result<Vec<AiInsight>, String> {
    Ok(state.insights().await)
}

#[tauri::command]
pub async fn is_refreshing_insights(state: State<'_, AppState>) -> Result<bool, String> {
    Ok(state.is_refreshing())
}

#[tauri::command]
pub async fn get_insight_status(state: State<'_, AppState>) -> Result<InsightStatus, String> {
    Ok(state.insight_status().await)
}

/// Insights split into growth and stewardship columns
#[tauri::command]
pub async fn get_insight_groups(state: State<'_, AppState>) -> Result<InsightGroups, String> {
    Ok(state.insight_groups().await)
}

/// Refresh insights from the current records.
///
/// Failures are reported through the outcome and the status, never as a
/// command error.
#[tauri::command]
pub async fn refresh_insights(
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<RefreshOutcome, String> {
    let outcome = state.refresh_insights().await;
    emit_status(&app, &state).await;
    Ok(outcome)
}

/// Broadcast the current insight status to the frontend
pub async fn emit_status(app: &AppHandle, state: &AppState) {
    let status = state.insight_status().await;
    if let Err(e) = app.emit(INSIGHTS_UPDATED_EVENT, &status) {
        log::warn!("Failed to emit {}: {}", INSIGHTS_UPDATED_EVENT, e);
    }
}

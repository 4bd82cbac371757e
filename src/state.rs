// State management for Church Admin Hub

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::insights::client::recent;
use crate::insights::{AiInsight, InsightGroups, InsightOrchestrator, InsightStatus, RefreshOutcome};
use crate::metrics::DashboardSummary;
use crate::records::{
    AppendError, AttendanceDraft, AttendanceForm, AttendanceRecord, FinanceDraft, FinanceForm,
    FinanceRecord, RecordStore,
};

pub struct AppState {
    /// Attendance and finance records, mirrored to the key-value store
    records: Arc<RwLock<RecordStore>>,
    /// Insight list and refresh coordination
    insights: Arc<InsightOrchestrator>,
}

impl AppState {
    pub fn new(records: RecordStore, insights: InsightOrchestrator) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            insights: Arc::new(insights),
        }
    }

    pub async fn attendance(&self) -> Vec<AttendanceRecord> {
        self.records.read().await.attendance().to_vec()
    }

    pub async fn finance(&self) -> Vec<FinanceRecord> {
        self.records.read().await.finance().to_vec()
    }

    /// Validate a submitted attendance form and append it
    pub async fn append_attendance(&self, form: AttendanceForm) -> Result<AttendanceRecord, AppendError> {
        let draft = AttendanceDraft::from_form(&form, Utc::now().date_naive())?;
        self.records.write().await.append_attendance(&draft)
    }

    /// Validate a submitted finance form and append it
    pub async fn append_finance(&self, form: FinanceForm) -> Result<FinanceRecord, AppendError> {
        let draft = FinanceDraft::from_form(&form, Utc::now().date_naive())?;
        self.records.write().await.append_finance(&draft)
    }

    pub async fn dashboard_summary(&self) -> DashboardSummary {
        let records = self.records.read().await;
        DashboardSummary::compute(records.attendance(), records.finance())
    }

    pub async fn insights(&self) -> Vec<AiInsight> {
        self.insights.insights().await
    }

    pub async fn insight_groups(&self) -> InsightGroups {
        InsightGroups::from_insights(&self.insights.insights().await)
    }

    pub async fn insight_status(&self) -> InsightStatus {
        self.insights.status().await
    }

    pub fn is_refreshing(&self) -> bool {
        self.insights.is_refreshing()
    }

    pub async fn refresh_insights(&self) -> RefreshOutcome {
        let (attendance, finance) = self.history_snapshot().await;
        self.insights.refresh(&attendance, &finance).await
    }

    pub async fn run_startup_refresh(&self) -> Option<RefreshOutcome> {
        let (attendance, finance) = self.history_snapshot().await;
        self.insights.run_startup_refresh(&attendance, &finance).await
    }

    /// Cancel any in-flight insight refresh
    pub fn shutdown(&self) {
        self.insights.shutdown();
    }

    /// Copy the records the insight request needs so no lock is held across
    /// the network call
    async fn history_snapshot(&self) -> (Vec<AttendanceRecord>, Vec<FinanceRecord>) {
        let window = self.insights.client().history_window();
        let records = self.records.read().await;
        (
            recent(records.attendance(), window).to_vec(),
            recent(records.finance(), window).to_vec(),
        )
    }
}

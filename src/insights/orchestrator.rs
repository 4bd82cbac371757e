//! Insight orchestrator
//!
//! Owns the current insight list and the loading flag. At most one refresh
//! is in flight at a time: a refresh triggered while another is running
//! sends no request of its own, waits for the running one, and reports its
//! result. A refresh that only waited behind other joiners, with no request
//! completing meanwhile, sends its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::insights::client::InsightClient;
use crate::insights::provider::InsightError;
use crate::insights::types::AiInsight;
use crate::records::{AttendanceRecord, FinanceRecord};

/// Result of a refresh call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RefreshOutcome {
    /// This call fetched a new list
    Refreshed { insights: Vec<AiInsight> },
    /// This call fetched, failed, and left `insights` in place
    Failed { error: String, insights: Vec<AiInsight> },
    /// Another refresh was in flight; this call reports its result
    Joined { insights: Vec<AiInsight> },
    /// The orchestrator shut down before the request completed
    Cancelled,
}

impl RefreshOutcome {
    pub fn insights(&self) -> &[AiInsight] {
        match self {
            RefreshOutcome::Refreshed { insights }
            | RefreshOutcome::Failed { insights, .. }
            | RefreshOutcome::Joined { insights } => insights,
            RefreshOutcome::Cancelled => &[],
        }
    }
}

/// Snapshot of everything a view needs to render the insights panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightStatus {
    pub insights: Vec<AiInsight>,
    pub refreshing: bool,
    pub last_refreshed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct InsightState {
    insights: Vec<AiInsight>,
    last_refreshed_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Raises the loading flag and lowers it when dropped, including when the
/// refresh future is dropped mid-request
struct RefreshingFlag<'a>(&'a AtomicBool);

impl<'a> RefreshingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RefreshingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct InsightOrchestrator {
    client: InsightClient,
    retain_on_failure: bool,
    state: RwLock<InsightState>,
    refreshing: AtomicBool,
    refresh_lock: Mutex<()>,
    /// Refreshes that reached the service and applied their result
    completed: AtomicU64,
    started: AtomicBool,
    shutdown: CancellationToken,
}

impl InsightOrchestrator {
    pub fn new(client: InsightClient, retain_on_failure: bool) -> Self {
        Self {
            client,
            retain_on_failure,
            state: RwLock::new(InsightState::default()),
            refreshing: AtomicBool::new(false),
            refresh_lock: Mutex::new(()),
            completed: AtomicU64::new(0),
            started: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn client(&self) -> &InsightClient {
        &self.client
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst)
    }

    pub async fn insights(&self) -> Vec<AiInsight> {
        self.state.read().await.insights.clone()
    }

    pub async fn status(&self) -> InsightStatus {
        let state = self.state.read().await;
        InsightStatus {
            insights: state.insights.clone(),
            refreshing: self.is_refreshing(),
            last_refreshed_at: state.last_refreshed_at,
            last_error: state.last_error.clone(),
        }
    }

    /// Fetch a new insight list, or join the refresh already in flight
    pub async fn refresh(
        &self,
        attendance: &[AttendanceRecord],
        finance: &[FinanceRecord],
    ) -> RefreshOutcome {
        let seen = self.completed.load(Ordering::SeqCst);

        let _guard = match self.refresh_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                log::debug!("Insight refresh already in flight, joining it");
                let guard = self.refresh_lock.lock().await;
                if self.completed.load(Ordering::SeqCst) != seen {
                    let insights = self.insights().await;
                    drop(guard);
                    return RefreshOutcome::Joined { insights };
                }
                log::debug!("No refresh completed while waiting, sending a new one");
                guard
            }
        };

        let _refreshing = RefreshingFlag::raise(&self.refreshing);

        let result = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(InsightError::Cancelled),
            result = self.client.fetch_insights(attendance, finance) => result,
        };

        let outcome = self.apply(result).await;
        if outcome != RefreshOutcome::Cancelled {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
        outcome
    }

    async fn apply(&self, result: Result<Vec<AiInsight>, InsightError>) -> RefreshOutcome {
        let mut state = self.state.write().await;

        match result {
            Ok(insights) => {
                log::info!("Insights refreshed: {} items", insights.len());
                state.insights = insights.clone();
                state.last_refreshed_at = Some(Utc::now());
                state.last_error = None;
                RefreshOutcome::Refreshed { insights }
            }
            Err(InsightError::Cancelled) => {
                log::info!("Insight refresh cancelled");
                RefreshOutcome::Cancelled
            }
            Err(e) => {
                log::warn!("Error fetching insights: {}", e);
                if !self.retain_on_failure {
                    state.insights.clear();
                }
                state.last_refreshed_at = Some(Utc::now());
                state.last_error = Some(e.to_string());
                RefreshOutcome::Failed {
                    error: e.to_string(),
                    insights: state.insights.clone(),
                }
            }
        }
    }

    /// Startup hook: refreshes once for the lifetime of the orchestrator
    pub async fn run_startup_refresh(
        &self,
        attendance: &[AttendanceRecord],
        finance: &[FinanceRecord],
    ) -> Option<RefreshOutcome> {
        if self.started.swap(true, Ordering::SeqCst) {
            log::debug!("Startup insight refresh already ran");
            return None;
        }
        Some(self.refresh(attendance, finance).await)
    }

    /// Cancel any in-flight refresh; later refreshes return `Cancelled` immediately
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

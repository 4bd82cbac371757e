//! AI insights
//!
//! Sends recent records to a generative model and keeps the resulting
//! recommendations, with at most one refresh in flight.

pub mod provider;
pub mod types;
pub mod prompt;
pub mod client;
pub mod config;
pub mod orchestrator;
pub mod providers;
#[cfg(feature = "desktop")]
pub mod commands;

pub use client::InsightClient;
pub use config::InsightSettings;
pub use orchestrator::{InsightOrchestrator, InsightStatus, RefreshOutcome};
pub use provider::{InsightError, InsightProvider};
pub use types::{AiInsight, InsightGroups, InsightPriority, InsightType};

//! Insight settings
//!
//! Resolved from defaults, then the environment, then values stored in the
//! key-value store.

use crate::database::KeyValueStore;
use crate::insights::client::DEFAULT_HISTORY_WINDOW;
use crate::insights::providers::GeminiConfig;

/// Stored setting: model override
pub const MODEL_SETTING: &str = "insight_model";
/// Stored setting: service base URL override
pub const BASE_URL_SETTING: &str = "insight_base_url";
/// Stored setting: keep the previous insights when a refresh fails
pub const RETAIN_ON_FAILURE_SETTING: &str = "insight_retain_on_failure";

#[derive(Debug, Clone, PartialEq)]
pub struct InsightSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub history_window: usize,
    pub retain_on_failure: bool,
}

impl Default for InsightSettings {
    fn default() -> Self {
        let gemini = GeminiConfig::default();
        Self {
            base_url: gemini.base_url,
            model: gemini.model,
            api_key: None,
            timeout_secs: gemini.timeout_secs,
            history_window: DEFAULT_HISTORY_WINDOW,
            retain_on_failure: false,
        }
    }
}

impl InsightSettings {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    /// Apply environment overrides read through `lookup`
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty("CHURCH_INSIGHTS_MODEL") {
            self.model = model;
        }
        if let Some(url) = non_empty("CHURCH_INSIGHTS_BASE_URL") {
            self.base_url = url;
        }
        if let Some(raw) = non_empty("CHURCH_INSIGHTS_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => log::warn!("Ignoring invalid CHURCH_INSIGHTS_TIMEOUT_SECS: {}", raw),
            }
        }
        self
    }

    /// Apply overrides saved in the key-value store
    pub fn with_stored_overrides(mut self, store: &dyn KeyValueStore) -> Self {
        let read = |key: &str| match store.get(key) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                log::warn!("Failed to read setting '{}': {:#}", key, e);
                None
            }
        };

        if let Some(model) = read(MODEL_SETTING) {
            self.model = model;
        }
        if let Some(url) = read(BASE_URL_SETTING) {
            self.base_url = url;
        }
        if let Some(raw) = read(RETAIN_ON_FAILURE_SETTING) {
            match raw.trim() {
                "true" => self.retain_on_failure = true,
                "false" => self.retain_on_failure = false,
                other => log::warn!("Ignoring invalid {} value: {}", RETAIN_ON_FAILURE_SETTING, other),
            }
        }
        self
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

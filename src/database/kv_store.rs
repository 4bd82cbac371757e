// Key-value storage port for Church Admin Hub
// Records and insight settings are stored as opaque string values under fixed keys

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;

/// Minimal storage interface the record store and settings are written against
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store used for tests and headless runs
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock memory store: {}", e))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock memory store: {}", e))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

//! Record store
//!
//! Holds the attendance and finance sequences in insertion order and keeps
//! them mirrored in the key-value store. Every append writes the one key it
//! changed before returning; a failed write rolls the append back.
//!
//! Stored text that cannot be read in full is copied to `<key>_unreadable`
//! before anything can overwrite it.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::database::KeyValueStore;
use crate::records::draft::{AttendanceDraft, DraftError, FinanceDraft};
use crate::records::seed::{seed_attendance, seed_finance};
use crate::records::types::{AttendanceRecord, FinanceRecord};

/// Storage key for the attendance sequence
pub const ATTENDANCE_KEY: &str = "church_attendance";
/// Storage key for the finance sequence
pub const FINANCE_KEY: &str = "church_finance";
/// Version written into the stored envelope
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Errors returned by record appends
#[derive(Debug, Error)]
pub enum AppendError {
    #[error(transparent)]
    Invalid(#[from] DraftError),

    #[error("Failed to save records: {0:#}")]
    Persist(anyhow::Error),
}

#[derive(Serialize)]
struct StoredRecordsRef<'a, T> {
    version: u32,
    records: &'a [T],
}

/// Accepts the versioned envelope and the plain arrays written by older builds
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRecords<T> {
    Versioned { version: u32, records: Vec<T> },
    Legacy(Vec<T>),
}

/// A persisted record whose derived fields are rebuilt after loading
trait StoredRecord: Serialize + DeserializeOwned {
    /// Recompute derived fields from the stored inputs; false when they cannot be
    fn rebuild_derived(&mut self) -> bool;
}

impl StoredRecord for AttendanceRecord {
    fn rebuild_derived(&mut self) -> bool {
        self.rebuild_total().is_ok()
    }
}

impl StoredRecord for FinanceRecord {
    fn rebuild_derived(&mut self) -> bool {
        self.rebuild_totals();
        true
    }
}

/// Key holding a copy of stored text that could not be read in full
pub fn unreadable_key(key: &str) -> String {
    format!("{}_unreadable", key)
}

/// Millisecond-timestamp ids, strictly increasing within the store
#[derive(Debug, Default)]
struct RecordIds {
    last: i64,
}

impl RecordIds {
    fn seeded_from<'a>(ids: impl Iterator<Item = &'a str>) -> Self {
        let last = ids.filter_map(|id| id.parse::<i64>().ok()).max().unwrap_or(0);
        Self { last }
    }

    fn next(&mut self, now_ms: i64) -> String {
        let id = now_ms.max(self.last + 1);
        self.last = id;
        id.to_string()
    }
}

pub struct RecordStore {
    store: Arc<dyn KeyValueStore>,
    attendance: Vec<AttendanceRecord>,
    finance: Vec<FinanceRecord>,
    ids: RecordIds,
}

impl RecordStore {
    /// Load both sequences, falling back to the seed data per key
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let attendance = load_sequence(store.as_ref(), ATTENDANCE_KEY, seed_attendance);
        let finance = load_sequence(store.as_ref(), FINANCE_KEY, seed_finance);

        let ids = RecordIds::seeded_from(
            attendance
                .iter()
                .map(|r| r.id.as_str())
                .chain(finance.iter().map(|r| r.id.as_str())),
        );

        log::info!(
            "Record store loaded: {} attendance, {} finance records",
            attendance.len(),
            finance.len()
        );

        Self {
            store,
            attendance,
            finance,
            ids,
        }
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn finance(&self) -> &[FinanceRecord] {
        &self.finance
    }

    /// Write both sequences to the key-value store
    pub fn save(&self) -> Result<()> {
        write_sequence(self.store.as_ref(), ATTENDANCE_KEY, &self.attendance)?;
        write_sequence(self.store.as_ref(), FINANCE_KEY, &self.finance)?;
        Ok(())
    }

    pub fn append_attendance(&mut self, draft: &AttendanceDraft) -> Result<AttendanceRecord, AppendError> {
        let id = self.ids.next(chrono::Utc::now().timestamp_millis());
        let record = AttendanceRecord::from_draft(id, draft)?;

        self.attendance.push(record.clone());
        if let Err(e) = write_sequence(self.store.as_ref(), ATTENDANCE_KEY, &self.attendance) {
            self.attendance.pop();
            log::error!("Failed to persist attendance record: {:#}", e);
            return Err(AppendError::Persist(e));
        }

        log::info!("Appended attendance record {} ({} total)", record.id, record.total);
        Ok(record)
    }

    pub fn append_finance(&mut self, draft: &FinanceDraft) -> Result<FinanceRecord, AppendError> {
        let id = self.ids.next(chrono::Utc::now().timestamp_millis());
        let record = FinanceRecord::from_draft(id, draft);

        self.finance.push(record.clone());
        if let Err(e) = write_sequence(self.store.as_ref(), FINANCE_KEY, &self.finance) {
            self.finance.pop();
            log::error!("Failed to persist finance record: {:#}", e);
            return Err(AppendError::Persist(e));
        }

        log::info!("Appended finance record {} (net {})", record.id, record.net_position);
        Ok(record)
    }
}

fn load_sequence<T: StoredRecord>(
    store: &dyn KeyValueStore,
    key: &str,
    seed: fn() -> Vec<T>,
) -> Vec<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log::info!("No stored data for '{}', using seed data", key);
            return seed();
        }
        Err(e) => {
            log::warn!("Failed to read '{}', using seed data: {:#}", key, e);
            return seed();
        }
    };

    let values = match serde_json::from_str::<StoredRecords<serde_json::Value>>(&raw) {
        Ok(StoredRecords::Versioned { version, records }) => {
            if version > STORE_FORMAT_VERSION {
                log::warn!(
                    "'{}' was written by a newer format (v{}), reading it as v{}",
                    key,
                    version,
                    STORE_FORMAT_VERSION
                );
            }
            records
        }
        Ok(StoredRecords::Legacy(records)) => records,
        Err(e) => {
            log::warn!("Stored data for '{}' is corrupt, using seed data: {}", key, e);
            preserve_unreadable(store, key, &raw);
            return seed();
        }
    };

    let stored = values.len();
    let mut records = Vec::with_capacity(stored);
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(mut record) => {
                if record.rebuild_derived() {
                    records.push(record)
                } else {
                    log::warn!("Skipping record {} of '{}': totals out of range", index, key)
                }
            }
            Err(e) => log::warn!("Skipping unreadable record {} of '{}': {}", index, key, e),
        }
    }

    if records.len() < stored {
        preserve_unreadable(store, key, &raw);
    }
    records
}

fn preserve_unreadable(store: &dyn KeyValueStore, key: &str, raw: &str) {
    let backup = unreadable_key(key);
    match store.set(&backup, raw) {
        Ok(()) => log::warn!("Original '{}' data kept under '{}'", key, backup),
        Err(e) => log::error!("Failed to keep original '{}' data: {:#}", key, e),
    }
}

fn write_sequence<T: Serialize>(store: &dyn KeyValueStore, key: &str, records: &[T]) -> Result<()> {
    let json = serde_json::to_string(&StoredRecordsRef {
        version: STORE_FORMAT_VERSION,
        records,
    })
    .with_context(|| format!("Failed to serialize '{}'", key))?;

    store
        .set(key, &json)
        .with_context(|| format!("Failed to write '{}'", key))
}

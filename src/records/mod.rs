//! Attendance and finance records
//!
//! Typed records, form validation, the bundled seed dataset, and the
//! persisted record store.

pub mod types;
pub mod draft;
pub mod seed;
pub mod store;
#[cfg(feature = "desktop")]
pub mod commands;

pub use types::{AttendanceRecord, FinanceField, FinanceRecord};
pub use draft::{AttendanceDraft, AttendanceForm, DraftError, FinanceDraft, FinanceForm};
pub use store::{AppendError, RecordStore, ATTENDANCE_KEY, FINANCE_KEY};

// Database module for Church Admin Hub
// Provides the key-value storage port and its SQLite implementation

pub mod manager;
pub mod migrations;
pub mod kv_store;
pub mod kv_repo;

pub use manager::DatabaseManager;
pub use kv_store::{KeyValueStore, MemoryStore};

// Database Manager for Church Admin Hub
// Owns the SQLite connection backing the local key-value store

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Mutex;

use super::migrations;

/// Database manager that owns the SQLite connection
pub struct DatabaseManager {
    conn: Mutex<Connection>,
}

impl DatabaseManager {
    /// Create a new DatabaseManager with the database at the specified path
    pub fn new(db_path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create database directory")?;
        }

        let conn = Connection::open(&db_path)
            .context("Failed to open database")?;

        migrations::run_migrations(&conn)
            .context("Failed to run database migrations")?;

        log::info!("Database initialized at: {:?}", db_path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Initialize the database manager using Tauri's app data directory
    #[cfg(feature = "desktop")]
    pub fn init_with_app_handle<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> Result<Self> {
        use tauri::Manager;

        let app_data_dir = app.path()
            .app_data_dir()
            .context("Failed to get app data directory")?;

        let db_path = app_data_dir.join("church_admin.db");
        Self::new(db_path)
    }

    /// Execute a function with access to the database connection
    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock database connection: {}", e))?;
        f(&conn)
    }
}

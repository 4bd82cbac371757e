// Key-value repository for Church Admin Hub
// SQLite implementation of the storage port

use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use super::kv_store::KeyValueStore;
use super::DatabaseManager;

impl DatabaseManager {
    /// Get a single value by key
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            get_value_impl(conn, key)
        })
    }

    /// Insert or replace a single value
    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.with_connection(|conn| {
            set_value_impl(conn, key, value)
        })
    }
}

impl KeyValueStore for DatabaseManager {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)
    }
}

fn get_value_impl(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare(
        "SELECT value FROM kv_store WHERE key = ?"
    ).context("Failed to prepare get_value query")?;

    let result = stmt.query_row(params![key], |row| row.get(0));

    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e).context("Failed to get value"),
    }
}

fn set_value_impl(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES (?1, ?2, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
        params![key, value],
    ).context("Failed to set value")?;

    Ok(())
}

// Database service module
// SQLite connection and schema management for persisted settings

use anyhow::{Context, Result};
use rusqlite::Connection;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file (or ":memory:" for in-memory)
    ///
    /// # Examples
    /// ```
    /// use ramadan_tracker::services::database::Database;
    /// let db = Database::new(":memory:").unwrap();
    /// ```
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .context(format!("Failed to open database at {}", path))?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("Failed to enable foreign keys")?;

        Ok(Self { conn })
    }

    /// Initialize the database schema
    /// Creates all required tables if they don't exist
    pub fn initialize_schema(&self) -> Result<()> {
        // Settings table: one row holding the active region and the
        // notification preferences
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS settings (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    region TEXT NOT NULL DEFAULT '',
                    sehri_enabled INTEGER NOT NULL DEFAULT 1,
                    iftar_enabled INTEGER NOT NULL DEFAULT 1,
                    minutes_before INTEGER NOT NULL DEFAULT 10,
                    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )
            .context("Failed to create settings table")?;

        self.conn
            .execute(
                "INSERT OR IGNORE INTO settings (id, region, sehri_enabled, iftar_enabled, minutes_before)
                 VALUES (1, '', 1, 1, 10)",
                [],
            )
            .context("Failed to insert default settings")?;

        Ok(())
    }

    /// Get a reference to the database connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

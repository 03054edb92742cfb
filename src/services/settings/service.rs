use anyhow::{anyhow, Context, Result};

use crate::models::preferences::TrackerSettings;
use crate::services::database::Database;

use super::mapper::row_to_settings;

pub struct SettingsService<'a> {
    db: &'a Database,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get the current settings
    pub fn get(&self) -> Result<TrackerSettings> {
        let conn = self.db.connection();

        let settings = conn
            .query_row(
                "SELECT region, sehri_enabled, iftar_enabled, minutes_before
                 FROM settings WHERE id = 1",
                [],
                |row| row_to_settings(row),
            )
            .context("Failed to load settings")?;

        Ok(settings)
    }

    /// Update settings. Read again at tick-loop start and whenever the
    /// settings dialog changes them.
    pub fn update(&self, settings: &TrackerSettings) -> Result<()> {
        settings
            .notifications
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        let conn = self.db.connection();

        conn.execute(
            "UPDATE settings \
             SET region = ?1, \
                 sehri_enabled = ?2, \
                 iftar_enabled = ?3, \
                 minutes_before = ?4, \
                 updated_at = CURRENT_TIMESTAMP \
             WHERE id = 1",
            rusqlite::params![
                settings.region,
                settings.notifications.sehri_enabled as i32,
                settings.notifications.iftar_enabled as i32,
                settings.notifications.minutes_before,
            ],
        )
        .context("Failed to update settings")?;

        Ok(())
    }
}

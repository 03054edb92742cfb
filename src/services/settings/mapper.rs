use rusqlite::Row;

use crate::models::preferences::{NotificationPreferences, TrackerSettings};

pub fn row_to_settings(row: &Row) -> Result<TrackerSettings, rusqlite::Error> {
    Ok(TrackerSettings {
        region: row.get(0)?,
        notifications: NotificationPreferences {
            sehri_enabled: row.get::<_, i32>(1)? != 0,
            iftar_enabled: row.get::<_, i32>(2)? != 0,
            minutes_before: row.get(3)?,
        },
    })
}

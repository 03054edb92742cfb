use serde::{Deserialize, Serialize};

/// Smallest allowed pre-event alert window, in minutes.
pub const MIN_MINUTES_BEFORE: u32 = 1;
/// Largest allowed pre-event alert window, in minutes.
pub const MAX_MINUTES_BEFORE: u32 = 60;

/// Per-user notification preferences, persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub sehri_enabled: bool,
    pub iftar_enabled: bool,
    /// How long before an event the alert fires, in minutes (1-60).
    pub minutes_before: u32,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            sehri_enabled: true,
            iftar_enabled: true,
            minutes_before: 10,
        }
    }
}

impl NotificationPreferences {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_MINUTES_BEFORE..=MAX_MINUTES_BEFORE).contains(&self.minutes_before) {
            return Err(format!(
                "minutes_before must be between {} and {}, got {}",
                MIN_MINUTES_BEFORE, MAX_MINUTES_BEFORE, self.minutes_before
            ));
        }
        Ok(())
    }

    /// Returns a copy with `minutes_before` forced into the legal range.
    pub fn clamped(mut self) -> Self {
        self.minutes_before = self
            .minutes_before
            .clamp(MIN_MINUTES_BEFORE, MAX_MINUTES_BEFORE);
        self
    }

    /// The alert window expressed in milliseconds.
    pub fn window_ms(&self) -> i64 {
        i64::from(self.minutes_before) * 60_000
    }
}

/// Everything the settings row stores: the active region plus the
/// notification preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrackerSettings {
    /// Empty string means "no region chosen yet"; callers fall back to the
    /// first region in the feed.
    pub region: String,
    pub notifications: NotificationPreferences,
}

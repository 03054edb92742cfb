//! Notification decisions for the schedule tracker.
//!
//! `should_notify` is invoked every tick; the at-most-once guarantee
//! comes from the notified-event set keyed by target timestamp, which the
//! caller must update immediately on a positive decision.

use std::collections::HashSet;

use chrono::{DateTime, Local};

use crate::models::preferences::NotificationPreferences;

use super::models::EventKind;

/// Deterministic identifier for an event: its target's millisecond
/// timestamp. Two events never share a target within one region's data.
pub fn event_id(target: DateTime<Local>) -> i64 {
    target.timestamp_millis()
}

/// Decides whether an alert should fire for `kind` at this tick.
///
/// Fires only when the kind is enabled, the target lies strictly in the
/// future within the configured window, and this target has not fired
/// before. Elapsed targets never fire, so a late tick after device sleep
/// cannot backfire a stale alert.
pub fn should_notify(
    kind: EventKind,
    target: DateTime<Local>,
    now: DateTime<Local>,
    prefs: &NotificationPreferences,
    already_notified: &HashSet<i64>,
) -> bool {
    let enabled = match kind {
        EventKind::Sehri => prefs.sehri_enabled,
        EventKind::Iftar => prefs.iftar_enabled,
        // Season boundaries never notify
        EventKind::SeasonStart | EventKind::Completed => false,
    };
    if !enabled {
        return false;
    }

    let remaining_ms = target.signed_duration_since(now).num_milliseconds();
    remaining_ms > 0
        && remaining_ms <= prefs.window_ms()
        && !already_notified.contains(&event_id(target))
}

/// Builds the `(title, body)` strings for a fired alert, in the original
/// display's wording.
pub fn notification_message(kind: EventKind, minutes_before: u32) -> (String, String) {
    let title = format!("Ramadan Tracker: {} Warning", kind);
    let body = match kind {
        EventKind::Sehri => format!("Sehri is ending in {} minutes!", minutes_before),
        _ => format!("Iftar is in {} minutes!", minutes_before),
    };
    (title, body)
}

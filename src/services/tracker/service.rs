use std::collections::HashSet;

use chrono::{DateTime, Local};

use crate::models::preferences::NotificationPreferences;
use crate::models::schedule::{DayRecord, ScheduleError};
use crate::utils::date::resolve_local;

use super::models::{Countdown, NextEvent, NextOutcome, TickUpdate};
use super::notifications::{event_id, notification_message, should_notify};

/// Resolves the next schedule event from the current instant.
///
/// Pure function of its inputs, cheap enough to call every tick: one
/// ascending O(n) scan over the records (n is around 30 for a season).
///
/// The first record whose iftar lies strictly after `now` is the current
/// day. Before that day's sehri the next event is `Sehri` (or
/// `SeasonStart` when the season has not begun at all); otherwise
/// `Iftar`. When every iftar has elapsed the result is the terminal
/// `Completed`. `now < target` is the sole condition for remaining in a
/// state, so at the exact target instant the scan has already advanced.
///
/// Records whose times cannot be resolved in the local timezone are
/// skipped with a warning; one bad day never blocks adjacent days.
pub fn next_event(
    now: DateTime<Local>,
    records: &[DayRecord],
) -> Result<NextOutcome<'_>, ScheduleError> {
    if records.is_empty() {
        return Err(ScheduleError::InvalidSchedule);
    }

    let mut seen_usable = false;
    for record in records {
        let Some(iftar_at) = resolve_local(record.date, record.iftar) else {
            log::warn!(
                "day {}: iftar time unresolvable in local timezone, skipping",
                record.day_number
            );
            continue;
        };
        let first_usable = !seen_usable;
        seen_usable = true;

        if now >= iftar_at {
            continue;
        }

        match resolve_local(record.date, record.sehri) {
            Some(sehri_at) if now < sehri_at => {
                if first_usable {
                    // The season has not begun yet
                    return Ok(NextOutcome {
                        event: NextEvent::SeasonStart { target: sehri_at },
                        current_day: None,
                    });
                }
                return Ok(NextOutcome {
                    event: NextEvent::Sehri {
                        target: sehri_at,
                        day_number: record.day_number,
                    },
                    current_day: Some(record),
                });
            }
            Some(_) => {}
            None => log::warn!(
                "day {}: sehri time unresolvable in local timezone",
                record.day_number
            ),
        }

        return Ok(NextOutcome {
            event: NextEvent::Iftar {
                target: iftar_at,
                day_number: record.day_number,
            },
            current_day: Some(record),
        });
    }

    if !seen_usable {
        // Every record was unresolvable; same as having no data
        return Err(ScheduleError::InvalidSchedule);
    }

    Ok(NextOutcome {
        event: NextEvent::Completed,
        current_day: None,
    })
}

/// Tick-driven tracker context for one region's schedule.
///
/// Owns everything the tick loop mutates: the notified-event set, the
/// active preferences, and the last emitted display state used to build
/// per-tick diffs. Constructed once per session; reset only through
/// `switch_region` or by dropping it.
pub struct ScheduleTracker {
    region: String,
    records: Vec<DayRecord>,
    preferences: NotificationPreferences,
    notified: HashSet<i64>,
    last_label: Option<String>,
    last_value: Option<String>,
    last_day: Option<u32>,
}

impl ScheduleTracker {
    pub fn new(
        region: impl Into<String>,
        records: Vec<DayRecord>,
        preferences: NotificationPreferences,
    ) -> Result<Self, ScheduleError> {
        if records.is_empty() {
            return Err(ScheduleError::InvalidSchedule);
        }
        Ok(Self {
            region: region.into(),
            records,
            preferences: preferences.clamped(),
            notified: HashSet::new(),
            last_label: None,
            last_value: None,
            last_day: None,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn preferences(&self) -> &NotificationPreferences {
        &self.preferences
    }

    /// Updates the alert preferences. The notified set is kept: an event
    /// that already fired stays fired for this session.
    pub fn set_preferences(&mut self, preferences: NotificationPreferences) {
        self.preferences = preferences.clamped();
    }

    /// Replaces the record set for a region change. Clears the notified
    /// set and the cached display state, so no stale target from the old
    /// region leaks into the next tick. On error the old state is kept.
    pub fn switch_region(
        &mut self,
        region: impl Into<String>,
        records: Vec<DayRecord>,
    ) -> Result<(), ScheduleError> {
        if records.is_empty() {
            return Err(ScheduleError::InvalidSchedule);
        }
        self.region = region.into();
        self.records = records;
        self.notified.clear();
        self.last_label = None;
        self.last_value = None;
        self.last_day = None;
        log::info!("tracker switched to region '{}'", self.region);
        Ok(())
    }

    /// Recomputes the countdown state from wall-clock input and returns
    /// the diff against the previous tick.
    ///
    /// Everything is derived from `now` each call, so the simulated clock
    /// may jump arbitrarily in either direction between ticks.
    pub fn tick(&mut self, now: DateTime<Local>) -> TickUpdate {
        let mut update = TickUpdate::default();

        let outcome = match next_event(now, &self.records) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("region '{}': tick skipped: {}", self.region, err);
                return update;
            }
        };

        if let Some(target) = outcome.event.target() {
            let kind = outcome.event.kind();
            if should_notify(kind, target, now, &self.preferences, &self.notified) {
                // Mark before delivery: a failed or denied notification is
                // not retried on the next tick
                self.notified.insert(event_id(target));
                update.notification =
                    Some(notification_message(kind, self.preferences.minutes_before));
            }
        }

        let day_number = outcome.current_day.map(|record| record.day_number);
        if day_number != self.last_day {
            update.current_day = outcome.current_day.cloned();
            self.last_day = day_number;
        }

        let label = outcome.event.label();
        let value = match outcome.event.target() {
            Some(target) => Countdown::until(target, now).to_string(),
            None => Countdown::default().to_string(),
        };

        if self.last_label.as_deref() != Some(label.as_str()) {
            self.last_label = Some(label.clone());
            update.label = Some(label);
        }
        if self.last_value.as_deref() != Some(value.as_str()) {
            self.last_value = Some(value.clone());
            update.value = Some(value);
        }

        update.completed = matches!(outcome.event, NextEvent::Completed);
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::TimeOfDay;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn record(day: u32, date: (i32, u32, u32), sehri: (u32, u32), iftar: (u32, u32)) -> DayRecord {
        DayRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            display_date: format!("day {}", day),
            day_number: day,
            sehri: TimeOfDay::new(sehri.0, sehri.1).unwrap(),
            iftar: TimeOfDay::new(iftar.0, iftar.1).unwrap(),
        }
    }

    fn season() -> Vec<DayRecord> {
        vec![
            record(1, (2026, 2, 19), (5, 12), (18, 5)),
            record(2, (2026, 2, 20), (5, 11), (18, 6)),
            record(3, (2026, 2, 21), (5, 10), (18, 7)),
        ]
    }

    fn at(d: u32, h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 2, d, h, m, s).unwrap()
    }

    #[test]
    fn empty_schedule_is_invalid() {
        assert!(matches!(
            next_event(at(19, 12, 0, 0), &[]),
            Err(ScheduleError::InvalidSchedule)
        ));
        assert!(ScheduleTracker::new("x", Vec::new(), Default::default()).is_err());
    }

    #[test]
    fn before_first_sehri_is_season_start() {
        let records = season();
        // Well before the season
        let outcome = next_event(at(18, 9, 0, 0), &records).unwrap();
        assert_eq!(
            outcome.event,
            NextEvent::SeasonStart {
                target: at(19, 5, 12, 0)
            }
        );
        assert!(outcome.current_day.is_none());

        // A minute before the very first sehri still counts as pre-season
        let outcome = next_event(at(19, 5, 11, 0), &records).unwrap();
        assert_eq!(
            outcome.event.kind(),
            crate::services::tracker::EventKind::SeasonStart
        );
    }

    #[test]
    fn mid_season_pre_sehri_targets_sehri() {
        let records = season();
        let outcome = next_event(at(20, 5, 0, 0), &records).unwrap();
        assert_eq!(
            outcome.event,
            NextEvent::Sehri {
                target: at(20, 5, 11, 0),
                day_number: 2
            }
        );
        assert_eq!(outcome.current_day.unwrap().day_number, 2);
    }

    #[test]
    fn sehri_boundary_is_inclusive_toward_iftar() {
        let records = season();
        // At exactly 05:11 on day 2 the sehri window is over
        let outcome = next_event(at(20, 5, 11, 0), &records).unwrap();
        assert_eq!(
            outcome.event,
            NextEvent::Iftar {
                target: at(20, 18, 6, 0),
                day_number: 2
            }
        );
    }

    #[test]
    fn iftar_boundary_rolls_to_next_day() {
        let records = season();
        // At exactly day 1's iftar the scan is already on day 2
        let outcome = next_event(at(19, 18, 5, 0), &records).unwrap();
        assert_eq!(
            outcome.event,
            NextEvent::Sehri {
                target: at(20, 5, 11, 0),
                day_number: 2
            }
        );
    }

    #[test]
    fn after_last_iftar_is_completed() {
        let records = season();
        let outcome = next_event(at(21, 18, 7, 0), &records).unwrap();
        assert_eq!(outcome.event, NextEvent::Completed);
        assert!(outcome.current_day.is_none());
        // And it stays completed arbitrarily far out
        let outcome = next_event(at(28, 0, 0, 0), &records).unwrap();
        assert_eq!(outcome.event, NextEvent::Completed);
    }

    #[test]
    fn tick_fires_notification_exactly_once() {
        let mut tracker =
            ScheduleTracker::new("default", season(), NotificationPreferences::default())
                .unwrap();

        // 9 minutes before day 1's iftar, default window is 10
        let now = at(19, 17, 56, 0);
        let update = tracker.tick(now);
        let (title, body) = update.notification.expect("first tick should notify");
        assert_eq!(title, "Ramadan Tracker: Iftar Warning");
        assert_eq!(body, "Iftar is in 10 minutes!");

        // Subsequent ticks toward the same target stay quiet
        let update = tracker.tick(now + Duration::seconds(1));
        assert!(update.notification.is_none());
        let update = tracker.tick(now + Duration::minutes(5));
        assert!(update.notification.is_none());
    }

    #[test]
    fn tick_diffs_only_what_changed() {
        let mut tracker =
            ScheduleTracker::new("default", season(), NotificationPreferences::default())
                .unwrap();

        let now = at(19, 12, 0, 0);
        let first = tracker.tick(now);
        assert_eq!(first.label.as_deref(), Some("IFTAR TIME (Day 1)"));
        assert_eq!(first.value.as_deref(), Some("06:05:00"));
        assert_eq!(first.current_day.as_ref().unwrap().day_number, 1);

        // Same instant again: nothing changed
        let second = tracker.tick(now);
        assert_eq!(second, TickUpdate::default());

        // One second later only the value moves
        let third = tracker.tick(now + Duration::seconds(1));
        assert!(third.label.is_none());
        assert_eq!(third.value.as_deref(), Some("06:04:59"));
        assert!(third.current_day.is_none());
    }

    #[test]
    fn tick_tolerates_clock_regression() {
        let mut tracker =
            ScheduleTracker::new("default", season(), NotificationPreferences::default())
                .unwrap();

        let late = at(21, 12, 0, 0);
        let update = tracker.tick(late);
        assert_eq!(update.label.as_deref(), Some("IFTAR TIME (Day 3)"));

        // Simulated clock jumps two days backward; state is recomputed
        let early = at(19, 12, 0, 0);
        let update = tracker.tick(early);
        assert_eq!(update.label.as_deref(), Some("IFTAR TIME (Day 1)"));
        assert_eq!(update.current_day.as_ref().unwrap().day_number, 1);
    }

    #[test]
    fn completed_state_is_terminal() {
        let mut tracker =
            ScheduleTracker::new("default", season(), NotificationPreferences::default())
                .unwrap();

        let update = tracker.tick(at(22, 12, 0, 0));
        assert!(update.completed);
        assert_eq!(update.label.as_deref(), Some("EID MUBARAK"));
        assert_eq!(update.value.as_deref(), Some("00:00:00"));

        let update = tracker.tick(at(23, 12, 0, 0));
        assert!(update.completed);
        assert!(update.notification.is_none());
    }

    #[test]
    fn switch_region_clears_notified_set_and_display_state() {
        let mut tracker =
            ScheduleTracker::new("Dhaka", season(), NotificationPreferences::default()).unwrap();

        let now = at(19, 17, 56, 0);
        assert!(tracker.tick(now).notification.is_some());

        // Same timetable under another region name: the target timestamps
        // collide, so a stale notified set would wrongly suppress this
        tracker.switch_region("Chattogram", season()).unwrap();
        assert_eq!(tracker.region(), "Chattogram");
        let update = tracker.tick(now);
        assert!(update.notification.is_some());
        // Display state was reset too, so the label is re-emitted
        assert!(update.label.is_some());
    }

    #[test]
    fn switch_region_to_empty_keeps_old_state() {
        let mut tracker =
            ScheduleTracker::new("Dhaka", season(), NotificationPreferences::default()).unwrap();
        assert!(tracker.switch_region("Nowhere", Vec::new()).is_err());
        assert_eq!(tracker.region(), "Dhaka");
        assert_eq!(tracker.records().len(), 3);
    }

    #[test]
    fn disabled_sehri_suppresses_only_sehri() {
        let prefs = NotificationPreferences {
            sehri_enabled: false,
            ..Default::default()
        };
        let mut tracker = ScheduleTracker::new("default", season(), prefs).unwrap();

        // 9 minutes before day 2's sehri: no alert
        let update = tracker.tick(at(20, 5, 2, 0));
        assert!(update.notification.is_none());

        // 9 minutes before day 2's iftar: alert as usual
        let update = tracker.tick(at(20, 17, 57, 0));
        assert!(update.notification.is_some());
    }
}

// Date utility functions

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::models::schedule::TimeOfDay;

pub fn is_same_day(date1: DateTime<Local>, date2: DateTime<Local>) -> bool {
    date1.date_naive() == date2.date_naive()
}

/// Resolves a calendar day plus a time of day into a local timestamp.
///
/// Returns `None` when the combination does not exist in the local
/// timezone (DST spring-forward gap); such records are skipped for
/// scheduling rather than crashing the tick loop.
pub fn resolve_local(date: NaiveDate, time: TimeOfDay) -> Option<DateTime<Local>> {
    let naive = date.and_hms_opt(time.hour, time.minute, 0)?;
    Local.from_local_datetime(&naive).earliest()
}

/// Position of a calendar date within the observance season.
///
/// This is the fixed calendar-day-offset approximation from the original
/// timetable display, not an astronomical Hijri calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonDay {
    /// Before the season begins.
    Before,
    /// The 1-based observance day number.
    Day(u32),
    /// The season has ended.
    After,
}

impl fmt::Display for SeasonDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonDay::Before => write!(f, "Sha'ban"),
            SeasonDay::Day(n) => write!(f, "Ramadan {}", n),
            SeasonDay::After => write!(f, "Shawwal"),
        }
    }
}

/// Computes which season day a (midnight-normalised) reference date falls
/// on, given the season's start date and length in days.
pub fn season_day(reference: NaiveDate, season_start: NaiveDate, season_len: u32) -> SeasonDay {
    let diff = reference.signed_duration_since(season_start).num_days();
    if diff < 0 {
        SeasonDay::Before
    } else if diff < i64::from(season_len) {
        SeasonDay::Day(diff as u32 + 1)
    } else {
        SeasonDay::After
    }
}

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A time-of-day string could not be understood as a 12-hour clock value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable time of day '{0}'")]
pub struct TimeParseError(pub String);

/// Errors produced while loading or scanning a schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The region dataset is empty or missing; no countdown can be shown.
    #[error("schedule contains no usable day records")]
    InvalidSchedule,

    /// One record carries a malformed time string. The record is skipped
    /// for scheduling; adjacent days are unaffected.
    #[error("day {day} ('{date}'): {source}")]
    TimeParse {
        day: u32,
        date: String,
        #[source]
        source: TimeParseError,
    },

    /// One record carries a date string that does not name a calendar day.
    #[error("day {day}: unrecognised date '{value}'")]
    DateParse { day: u32, value: String },

    /// Sehri must precede iftar within the same day.
    #[error("day {day} ('{date}'): sehri does not precede iftar")]
    InvertedTimes { day: u32, date: String },
}

/// Validated wall-clock time of day, stored on the 24-hour clock.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    /// Parses a 12-hour clock string such as `"5:12 AM"` or `"12:30 pm"`.
    ///
    /// Midnight is written `12:xx AM` and noon `12:xx PM`, as in the
    /// timetable feeds.
    pub fn parse_12h(value: &str) -> Result<Self, TimeParseError> {
        let err = || TimeParseError(value.to_string());

        let mut parts = value.split_whitespace();
        let clock = parts.next().ok_or_else(err)?;
        let period = parts.next().ok_or_else(err)?;
        if parts.next().is_some() {
            return Err(err());
        }

        let (hour_str, minute_str) = clock.split_once(':').ok_or_else(err)?;
        let hour12: u32 = hour_str.parse().map_err(|_| err())?;
        let minute: u32 = minute_str.parse().map_err(|_| err())?;
        if !(1..=12).contains(&hour12) || minute > 59 {
            return Err(err());
        }

        let hour = match period.to_ascii_uppercase().as_str() {
            "AM" => {
                if hour12 == 12 {
                    0
                } else {
                    hour12
                }
            }
            "PM" => {
                if hour12 == 12 {
                    12
                } else {
                    hour12 + 12
                }
            }
            _ => return Err(err()),
        };

        Ok(Self { hour, minute })
    }
}

impl fmt::Display for TimeOfDay {
    /// Renders back on the 12-hour clock, matching the timetable style.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hour12, period) = match self.hour {
            0 => (12, "AM"),
            1..=11 => (self.hour, "AM"),
            12 => (12, "PM"),
            _ => (self.hour - 12, "PM"),
        };
        write!(f, "{}:{:02} {}", hour12, self.minute, period)
    }
}

/// Display status of a calendar day relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    /// The day's iftar has come and gone.
    Completed,
    /// The reference date falls on this day.
    Active,
    /// The day has not been reached yet.
    Upcoming,
}

/// One observance day: a calendar date with its sehri and iftar times.
///
/// Records are immutable once loaded and sorted ascending by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// The feed's original date string, e.g. `"19 February"`.
    pub display_date: String,
    pub day_number: u32,
    pub sehri: TimeOfDay,
    pub iftar: TimeOfDay,
}

impl DayRecord {
    /// Calendar-card style date, `"19 February"` -> `"FEB 19"`.
    pub fn short_display_date(&self) -> String {
        let mut parts = self.display_date.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some(day), Some(month)) if month.is_char_boundary(3) => {
                format!("{} {}", month[..3].to_uppercase(), day)
            }
            _ => self.display_date.clone(),
        }
    }

    /// Zero-padded observance day number, `1` -> `"01"`.
    pub fn padded_day(&self) -> String {
        format!("{:02}", self.day_number)
    }

    /// Where this day sits relative to a (midnight-normalised) reference
    /// date, for calendar card styling.
    pub fn status_on(&self, reference: NaiveDate) -> DayStatus {
        if self.date < reference {
            DayStatus::Completed
        } else if self.date == reference {
            DayStatus::Active
        } else {
            DayStatus::Upcoming
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_12h_morning() {
        let t = TimeOfDay::parse_12h("5:12 AM").unwrap();
        assert_eq!(t, TimeOfDay { hour: 5, minute: 12 });
    }

    #[test]
    fn parse_12h_evening() {
        let t = TimeOfDay::parse_12h("6:05 PM").unwrap();
        assert_eq!(t, TimeOfDay { hour: 18, minute: 5 });
    }

    #[test]
    fn parse_12h_midnight_and_noon() {
        assert_eq!(
            TimeOfDay::parse_12h("12:00 AM").unwrap(),
            TimeOfDay { hour: 0, minute: 0 }
        );
        assert_eq!(
            TimeOfDay::parse_12h("12:30 PM").unwrap(),
            TimeOfDay { hour: 12, minute: 30 }
        );
    }

    #[test]
    fn parse_12h_rejects_garbage() {
        for bad in ["", "5:12", "5:12 XM", "13:00 AM", "0:10 PM", "5:61 AM", "5 12 AM x"] {
            assert!(
                TimeOfDay::parse_12h(bad).is_err(),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn time_of_day_round_trips_through_display() {
        for raw in ["5:12 AM", "6:05 PM", "12:00 AM", "12:30 PM", "11:59 PM"] {
            let parsed = TimeOfDay::parse_12h(raw).unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
    }

    fn sample_record() -> DayRecord {
        DayRecord {
            date: NaiveDate::from_ymd_opt(2026, 2, 19).unwrap(),
            display_date: "19 February".to_string(),
            day_number: 1,
            sehri: TimeOfDay { hour: 5, minute: 12 },
            iftar: TimeOfDay { hour: 18, minute: 5 },
        }
    }

    #[test]
    fn short_display_date_abbreviates_month() {
        assert_eq!(sample_record().short_display_date(), "FEB 19");
    }

    #[test]
    fn padded_day_zero_pads() {
        assert_eq!(sample_record().padded_day(), "01");
    }

    #[test]
    fn status_tracks_reference_date() {
        let record = sample_record();
        let day_before = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let day_after = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        assert_eq!(record.status_on(day_before), DayStatus::Upcoming);
        assert_eq!(record.status_on(record.date), DayStatus::Active);
        assert_eq!(record.status_on(day_after), DayStatus::Completed);
    }
}

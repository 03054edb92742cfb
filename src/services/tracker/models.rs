use std::fmt;

use chrono::{DateTime, Local};

use crate::models::schedule::DayRecord;

/// Which kind of schedule event a target belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Sehri,
    Iftar,
    SeasonStart,
    Completed,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Sehri => write!(f, "Sehri"),
            EventKind::Iftar => write!(f, "Iftar"),
            EventKind::SeasonStart => write!(f, "Season start"),
            EventKind::Completed => write!(f, "Completed"),
        }
    }
}

/// The next schedule event relative to a given instant.
///
/// `Completed` is terminal: once the whole season has elapsed no further
/// event is ever produced for the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextEvent {
    Sehri {
        target: DateTime<Local>,
        day_number: u32,
    },
    Iftar {
        target: DateTime<Local>,
        day_number: u32,
    },
    SeasonStart {
        target: DateTime<Local>,
    },
    Completed,
}

impl NextEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            NextEvent::Sehri { .. } => EventKind::Sehri,
            NextEvent::Iftar { .. } => EventKind::Iftar,
            NextEvent::SeasonStart { .. } => EventKind::SeasonStart,
            NextEvent::Completed => EventKind::Completed,
        }
    }

    pub fn target(&self) -> Option<DateTime<Local>> {
        match self {
            NextEvent::Sehri { target, .. }
            | NextEvent::Iftar { target, .. }
            | NextEvent::SeasonStart { target } => Some(*target),
            NextEvent::Completed => None,
        }
    }

    /// Countdown header text, in the original display's wording.
    pub fn label(&self) -> String {
        match self {
            NextEvent::Sehri { day_number, .. } => format!("SEHRI ENDS (Day {})", day_number),
            NextEvent::Iftar { day_number, .. } => format!("IFTAR TIME (Day {})", day_number),
            NextEvent::SeasonStart { .. } => "RAMADAN STARTS IN".to_string(),
            NextEvent::Completed => "EID MUBARAK".to_string(),
        }
    }
}

/// Outcome of a next-event scan: the event plus the record it belongs to
/// (none before the season or after completion), so callers can display
/// the current day's reference times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextOutcome<'a> {
    pub event: NextEvent,
    pub current_day: Option<&'a DayRecord>,
}

/// Remaining time decomposed for display. All components non-negative;
/// hours may exceed 24 when the target is days away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Floor-division decomposition of `target - now`. Zero when the
    /// target has passed; transitions are decided by the next-event scan,
    /// this is a display guard only.
    pub fn until(target: DateTime<Local>, now: DateTime<Local>) -> Self {
        let ms = target.signed_duration_since(now).num_milliseconds();
        if ms <= 0 {
            return Self::default();
        }
        Self {
            hours: ms / 3_600_000,
            minutes: (ms % 3_600_000) / 60_000,
            seconds: (ms % 60_000) / 1_000,
        }
    }

    /// Milliseconds represented by this decomposition, floored to the
    /// second.
    pub fn as_millis(&self) -> i64 {
        self.hours * 3_600_000 + self.minutes * 60_000 + self.seconds * 1_000
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Per-tick state diff forwarded to the presentation layer. Fields are
/// `None` when unchanged since the previous tick, so a renderer only
/// touches what moved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickUpdate {
    /// New countdown header, when it changed.
    pub label: Option<String>,
    /// New `HH:MM:SS` countdown value, when it changed.
    pub value: Option<String>,
    /// The newly current day record, when the scan moved to another day.
    pub current_day: Option<DayRecord>,
    /// Notification `(title, body)` to deliver, at most once per target.
    pub notification: Option<(String, String)>,
    /// True once the season has fully elapsed; the loop may stop ticking.
    pub completed: bool,
}

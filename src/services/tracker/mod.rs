// Schedule tracker: next-event resolution, countdown formatting, and
// notification decisions

mod models;
mod notifications;
mod service;

pub use models::{Countdown, EventKind, NextEvent, NextOutcome, TickUpdate};
pub use notifications::{event_id, notification_message, should_notify};
pub use service::{next_event, ScheduleTracker};

// Schedule feed loading and validation

mod loader;

pub use loader::{validate_record, RawDayRecord, ScheduleFeed, DEFAULT_SEASON_YEAR};

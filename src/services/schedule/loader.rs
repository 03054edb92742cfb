use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::schedule::{DayRecord, ScheduleError, TimeOfDay};

/// The timetable data carries dates without a year; the season year pins
/// them to real calendar days.
pub const DEFAULT_SEASON_YEAR: i32 = 2026;

/// Region key used when the feed is a bare array with no region mapping.
const FALLBACK_REGION: &str = "default";

/// One day as it appears in the JSON feed, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDayRecord {
    pub date: String,
    pub day: u32,
    pub sehri: String,
    pub iftar: String,
}

/// The feed is either a single region (bare array, the original layout)
/// or a mapping from region name to its timetable.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFeed {
    Regions(BTreeMap<String, Vec<RawDayRecord>>),
    Single(Vec<RawDayRecord>),
}

/// Loaded, validated schedule data for every region in the feed.
///
/// Read-only after loading; records per region are sorted ascending by
/// date with malformed records already skipped (and logged).
#[derive(Debug, Clone, Default)]
pub struct ScheduleFeed {
    regions: BTreeMap<String, Vec<DayRecord>>,
}

impl ScheduleFeed {
    pub fn load_from_path(path: &Path, season_year: i32) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read schedule feed from {}", path.display()))?;
        Self::from_json(&data, season_year)
            .with_context(|| format!("failed to load schedule feed from {}", path.display()))
    }

    pub fn from_json(json: &str, season_year: i32) -> Result<Self> {
        let raw: RawFeed =
            serde_json::from_str(json).context("schedule feed is not valid JSON")?;

        let raw_regions = match raw {
            RawFeed::Regions(map) => map,
            RawFeed::Single(list) => {
                let mut map = BTreeMap::new();
                map.insert(FALLBACK_REGION.to_string(), list);
                map
            }
        };

        let mut regions = BTreeMap::new();
        for (region, raw_records) in raw_regions {
            let records = validate_records(&region, &raw_records, season_year);
            regions.insert(region, records);
        }

        Ok(Self { regions })
    }

    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn first_region(&self) -> Option<&str> {
        self.regions.keys().next().map(String::as_str)
    }

    /// The validated timetable for one region.
    ///
    /// An unknown region, or one whose records were all skipped, yields
    /// `InvalidSchedule`; the caller shows a "no data" state instead of a
    /// countdown.
    pub fn records(&self, region: &str) -> Result<&[DayRecord], ScheduleError> {
        match self.regions.get(region) {
            Some(records) if !records.is_empty() => Ok(records),
            _ => Err(ScheduleError::InvalidSchedule),
        }
    }
}

/// Validates one raw record into a `DayRecord`.
pub fn validate_record(raw: &RawDayRecord, season_year: i32) -> Result<DayRecord, ScheduleError> {
    let display_date = raw.date.trim().to_string();

    let dated = format!("{} {}", display_date, season_year);
    let date = NaiveDate::parse_from_str(&dated, "%d %B %Y").map_err(|_| {
        ScheduleError::DateParse {
            day: raw.day,
            value: raw.date.clone(),
        }
    })?;

    let sehri = TimeOfDay::parse_12h(&raw.sehri).map_err(|source| ScheduleError::TimeParse {
        day: raw.day,
        date: display_date.clone(),
        source,
    })?;
    let iftar = TimeOfDay::parse_12h(&raw.iftar).map_err(|source| ScheduleError::TimeParse {
        day: raw.day,
        date: display_date.clone(),
        source,
    })?;

    if sehri >= iftar {
        return Err(ScheduleError::InvertedTimes {
            day: raw.day,
            date: display_date,
        });
    }

    Ok(DayRecord {
        date,
        display_date,
        day_number: raw.day,
        sehri,
        iftar,
    })
}

/// Validates a whole region, skipping (and logging) bad records so one
/// malformed entry never takes down adjacent days.
fn validate_records(region: &str, raw: &[RawDayRecord], season_year: i32) -> Vec<DayRecord> {
    let mut records = Vec::with_capacity(raw.len());
    for raw_record in raw {
        match validate_record(raw_record, season_year) {
            Ok(record) => records.push(record),
            Err(err) => log::warn!("region '{}': skipping record: {}", region, err),
        }
    }
    records.sort_by(|a, b| a.date.cmp(&b.date));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_REGION_FEED: &str = r#"[
        {"date": "20 February", "day": 2, "sehri": "5:11 AM", "iftar": "6:06 PM"},
        {"date": "19 February", "day": 1, "sehri": "5:12 AM", "iftar": "6:05 PM"}
    ]"#;

    const MULTI_REGION_FEED: &str = r#"{
        "Dhaka": [
            {"date": "19 February", "day": 1, "sehri": "5:12 AM", "iftar": "6:05 PM"}
        ],
        "Chattogram": [
            {"date": "19 February", "day": 1, "sehri": "5:08 AM", "iftar": "6:01 PM"}
        ]
    }"#;

    #[test]
    fn bare_array_becomes_the_fallback_region() {
        let feed = ScheduleFeed::from_json(SINGLE_REGION_FEED, 2026).unwrap();
        let records = feed.records("default").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn records_are_sorted_ascending_by_date() {
        let feed = ScheduleFeed::from_json(SINGLE_REGION_FEED, 2026).unwrap();
        let records = feed.records("default").unwrap();
        assert_eq!(records[0].day_number, 1);
        assert_eq!(records[1].day_number, 2);
        assert!(records[0].date < records[1].date);
    }

    #[test]
    fn region_map_keeps_regions_separate() {
        let feed = ScheduleFeed::from_json(MULTI_REGION_FEED, 2026).unwrap();
        let names: Vec<&str> = feed.region_names().collect();
        assert_eq!(names, vec!["Chattogram", "Dhaka"]);

        let dhaka = feed.records("Dhaka").unwrap();
        let chattogram = feed.records("Chattogram").unwrap();
        assert_ne!(dhaka[0].sehri, chattogram[0].sehri);
    }

    #[test]
    fn unknown_region_is_invalid_schedule() {
        let feed = ScheduleFeed::from_json(MULTI_REGION_FEED, 2026).unwrap();
        assert!(matches!(
            feed.records("Atlantis"),
            Err(ScheduleError::InvalidSchedule)
        ));
    }

    #[test]
    fn malformed_time_skips_only_that_record() {
        let feed = ScheduleFeed::from_json(
            r#"[
                {"date": "19 February", "day": 1, "sehri": "nonsense", "iftar": "6:05 PM"},
                {"date": "20 February", "day": 2, "sehri": "5:11 AM", "iftar": "6:06 PM"}
            ]"#,
            2026,
        )
        .unwrap();
        let records = feed.records("default").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].day_number, 2);
    }

    #[test]
    fn inverted_times_are_rejected() {
        let raw = RawDayRecord {
            date: "19 February".to_string(),
            day: 1,
            sehri: "6:05 PM".to_string(),
            iftar: "5:12 AM".to_string(),
        };
        assert!(matches!(
            validate_record(&raw, 2026),
            Err(ScheduleError::InvertedTimes { day: 1, .. })
        ));
    }

    #[test]
    fn unparseable_date_is_a_date_parse_error() {
        let raw = RawDayRecord {
            date: "32 Nonsembruary".to_string(),
            day: 3,
            sehri: "5:12 AM".to_string(),
            iftar: "6:05 PM".to_string(),
        };
        assert!(matches!(
            validate_record(&raw, 2026),
            Err(ScheduleError::DateParse { day: 3, .. })
        ));
    }

    #[test]
    fn all_records_bad_yields_invalid_schedule() {
        let feed = ScheduleFeed::from_json(
            r#"[{"date": "19 February", "day": 1, "sehri": "bad", "iftar": "worse"}]"#,
            2026,
        )
        .unwrap();
        assert!(matches!(
            feed.records("default"),
            Err(ScheduleError::InvalidSchedule)
        ));
    }
}

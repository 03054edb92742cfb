// Ramadan Tracker
// Main entry point: loads the schedule feed, restores persisted
// preferences, and runs the 1-second countdown tick loop in the terminal.

use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration as StdDuration;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use ramadan_tracker::models::schedule::{DayRecord, DayStatus};
use ramadan_tracker::services::database::Database;
use ramadan_tracker::services::notification::NotificationService;
use ramadan_tracker::services::schedule::{ScheduleFeed, DEFAULT_SEASON_YEAR};
use ramadan_tracker::services::settings::SettingsService;
use ramadan_tracker::services::tracker::ScheduleTracker;
use ramadan_tracker::utils::clock::Clock;
use ramadan_tracker::utils::date::{is_same_day, season_day};

struct Options {
    feed: PathBuf,
    region: Option<String>,
    simulate: Option<NaiveDateTime>,
    season_year: i32,
    notify: bool,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = Self {
            feed: PathBuf::from("data.json"),
            region: None,
            simulate: None,
            season_year: DEFAULT_SEASON_YEAR,
            notify: true,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--region" => {
                    options.region =
                        Some(args.next().context("--region expects a region name")?);
                }
                "--simulate" => {
                    let value = args
                        .next()
                        .context("--simulate expects 'YYYY-MM-DD HH:MM:SS'")?;
                    let parsed = NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S")
                        .with_context(|| format!("cannot parse simulated time '{}'", value))?;
                    options.simulate = Some(parsed);
                }
                "--year" => {
                    let value = args.next().context("--year expects a calendar year")?;
                    options.season_year = value
                        .parse()
                        .with_context(|| format!("cannot parse year '{}'", value))?;
                }
                "--no-notify" => options.notify = false,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                flag if flag.starts_with('-') => bail!("unknown flag '{}'", flag),
                path => options.feed = PathBuf::from(path),
            }
        }

        Ok(options)
    }
}

fn print_usage() {
    println!("Usage: ramadan-tracker [FEED.json] [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --region NAME                select the timetable region");
    println!("  --simulate 'YYYY-MM-DD HH:MM:SS'  run against a simulated clock");
    println!("  --year YYYY                  season year for the feed's dates");
    println!("  --no-notify                  suppress desktop notifications");
}

fn main() -> Result<()> {
    env_logger::init();

    log::info!("Starting Ramadan Tracker");

    let options = Options::parse(std::env::args().skip(1))?;
    run(options)
}

fn run(options: Options) -> Result<()> {
    let feed = ScheduleFeed::load_from_path(&options.feed, options.season_year)?;

    let db = Database::new(&settings_db_path()?)?;
    db.initialize_schema()?;
    let settings_service = SettingsService::new(&db);
    let mut settings = settings_service.get()?;

    // Region priority: command line, then the persisted choice, then the
    // first region in the feed
    let region = options
        .region
        .clone()
        .or_else(|| {
            if settings.region.is_empty() {
                None
            } else {
                Some(settings.region.clone())
            }
        })
        .or_else(|| feed.first_region().map(str::to_string))
        .ok_or_else(|| anyhow!("schedule feed contains no regions"))?;

    if settings.region != region {
        settings.region = region.clone();
        settings_service.update(&settings)?;
    }

    let records = match feed.records(&region) {
        Ok(records) => records.to_vec(),
        Err(err) => {
            // Explicit no-data state instead of a crash
            log::warn!("region '{}': {}", region, err);
            println!("No schedule data available for region '{}'.", region);
            let known: Vec<&str> = feed.region_names().collect();
            if !known.is_empty() {
                println!("Known regions: {}", known.join(", "));
            }
            return Ok(());
        }
    };

    let mut clock = Clock::new();
    if let Some(naive) = options.simulate {
        let target = Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| anyhow!("simulated time does not exist in the local timezone"))?;
        clock.simulate(target);
        log::info!("clock simulated to {}", target);
    }

    let mut sink = NotificationService::new();
    sink.set_enabled(options.notify);

    let mut tracker = ScheduleTracker::new(region.clone(), records, settings.notifications)
        .map_err(|err| anyhow!("region '{}': {}", region, err))?;

    print_calendar(tracker.records(), clock.now());

    let mut header_day = print_date_header(clock.now(), tracker.records());
    loop {
        let now = clock.now();
        if !is_same_day(now, header_day) {
            println!();
            header_day = print_date_header(now, tracker.records());
        }

        let update = tracker.tick(now);

        if let Some((title, body)) = &update.notification {
            // Delivery failures are swallowed; the tracker already marked
            // the attempt so it will not retry
            if let Err(err) = sink.send_alert(title, body) {
                log::warn!("notification delivery failed: {}", err);
            }
        }

        if let Some(day) = &update.current_day {
            println!(
                "Day {} ({}) — Sehri {}  Iftar {}",
                day.padded_day(),
                day.short_display_date(),
                day.sehri,
                day.iftar
            );
        }

        if let Some(label) = &update.label {
            println!("{}", label);
        }
        if let Some(value) = &update.value {
            print!("\r  {}  ", value);
            io::stdout().flush().ok();
        }

        if update.completed {
            println!();
            log::info!("season complete for region '{}'", tracker.region());
            return Ok(());
        }

        thread::sleep(StdDuration::from_secs(1));
    }
}

/// Default location of the settings database, in the platform's data
/// directory; falls back to the working directory.
fn settings_db_path() -> Result<String> {
    if let Some(dirs) = directories::ProjectDirs::from("", "", "ramadan-tracker") {
        let dir = dirs.data_dir();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create data dir {}", dir.display()))?;
        return Ok(dir.join("settings.db").to_string_lossy().into_owned());
    }
    Ok("settings.db".to_string())
}

fn print_date_header(now: DateTime<Local>, records: &[DayRecord]) -> DateTime<Local> {
    if let Some(first) = records.first() {
        let day = season_day(now.date_naive(), first.date, records.len() as u32);
        println!("{} // {}", day, now.format("%A, %-d %b %Y"));
    }
    now
}

fn print_calendar(records: &[DayRecord], now: DateTime<Local>) {
    let today = now.date_naive();
    for record in records {
        let marker = match record.status_on(today) {
            DayStatus::Completed => "x",
            DayStatus::Active => ">",
            DayStatus::Upcoming => " ",
        };
        println!(
            "[{}] {}  Day {}  Sehri {:>8}  Iftar {:>8}",
            marker,
            record.short_display_date(),
            record.padded_day(),
            record.sehri.to_string(),
            record.iftar.to_string()
        );
    }
    println!();
}

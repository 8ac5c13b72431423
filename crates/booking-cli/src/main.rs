//! `booking` CLI: check availability and free slots against a booking export.
//!
//! Bookings are read as a JSON array of records (`id`, `start`, `end`,
//! `status`, `purpose`, ...) from a file or stdin. Results are printed as
//! pretty JSON on stdout; logs go to stderr.
//!
//! ## Usage
//!
//! ```sh
//! # Is room 12 free from 09:00 to 11:00?
//! booking check --resource 12 --start 2026-03-16T09:00:00Z --end 2026-03-16T11:00:00Z -i bookings.json
//!
//! # Free slots during business hours on a date
//! booking slots --date 2026-03-16 -i bookings.json
//!
//! # Free slots in an explicit window, at least 60 minutes long
//! booking slots --start 2026-03-16T08:00:00 --end 2026-03-16T18:00:00 --min-minutes 60 < bookings.json
//!
//! # Is the resource occupied right now?
//! booking occupied -i bookings.json
//!
//! # Day overview with adjacent-pair gap semantics and a config file
//! booking --config engine.json --policy adjacent-pairs day --resource 12 --date 2026-03-16 -i bookings.json
//!
//! # Resources a student can walk into right now
//! booking available-now --role student -i resources.json
//! ```

use anyhow::{Context, Result};
use booking_engine::{
    AvailabilityEngine, BookingAction, BookingRecord, BookingStatus, Clock, EngineConfig,
    FixedClock, GapPolicy, ResourceSchedule, SystemClock, TimeRange,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "booking",
    version,
    about = "Resource booking availability CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON engine config file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Gap computation policy (overrides the config file)
    #[arg(long, global = true, value_enum)]
    policy: Option<PolicyArg>,

    /// IANA timezone for business hours (overrides the config file)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Merged,
    AdjacentPairs,
}

impl From<PolicyArg> for GapPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Merged => GapPolicy::Merged,
            PolicyArg::AdjacentPairs => GapPolicy::AdjacentPairs,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Approve,
    Reject,
    Cancel,
}

impl From<ActionArg> for BookingAction {
    fn from(a: ActionArg) -> Self {
        match a {
            ActionArg::Approve => BookingAction::Approve,
            ActionArg::Reject => BookingAction::Reject,
            ActionArg::Cancel => BookingAction::Cancel,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a candidate range is free on a resource
    Check {
        /// Resource id echoed in the result
        #[arg(long, default_value_t = 0)]
        resource: i64,
        /// Candidate start (RFC 3339, or naive time interpreted as UTC)
        #[arg(long, value_parser = parse_datetime)]
        start: DateTime<Utc>,
        /// Candidate end
        #[arg(long, value_parser = parse_datetime)]
        end: DateTime<Utc>,
        /// Bookings JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List free slots in a window or in a date's business hours
    Slots {
        /// Window start (requires --end)
        #[arg(long, value_parser = parse_datetime, requires = "end", conflicts_with = "date")]
        start: Option<DateTime<Utc>>,
        /// Window end (requires --start)
        #[arg(long, value_parser = parse_datetime, requires = "start")]
        end: Option<DateTime<Utc>>,
        /// Use the business-hours window on this date (YYYY-MM-DD)
        #[arg(long, required_unless_present = "start")]
        date: Option<NaiveDate>,
        /// Only report the first slot at least this many minutes long
        #[arg(long)]
        min_minutes: Option<i64>,
        /// Bookings JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Report whether any booking holds the resource at an instant
    Occupied {
        /// Instant to check (defaults to now)
        #[arg(long, value_parser = parse_datetime)]
        at: Option<DateTime<Utc>>,
        /// Bookings JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Bookings and free business-hour slots for one day
    Day {
        /// Resource id echoed in the result
        #[arg(long, default_value_t = 0)]
        resource: i64,
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Bookings JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List resources nobody holds at an instant
    AvailableNow {
        /// Only include resources this role may access
        #[arg(long)]
        role: Option<String>,
        /// Instant to check (defaults to now)
        #[arg(long, value_parser = parse_datetime)]
        at: Option<DateTime<Utc>>,
        /// Resources JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Apply a lifecycle action to a booking status
    Transition {
        /// Current status
        #[arg(long)]
        status: BookingStatus,
        /// Action to apply
        #[arg(long, value_enum)]
        action: ActionArg,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OccupiedReport {
    at: DateTime<Utc>,
    occupied: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransitionReport {
    from: BookingStatus,
    to: BookingStatus,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let engine = AvailabilityEngine::new(load_config(&cli)?);

    match cli.command {
        Commands::Check {
            resource,
            start,
            end,
            input,
        } => {
            let bookings = read_bookings(input.as_deref())?;
            let candidate = TimeRange { start, end };
            let result = engine
                .check_availability(resource, &candidate, &bookings)
                .context("Failed to check availability")?;
            print_json(&result)?;
        }
        Commands::Slots {
            start,
            end,
            date,
            min_minutes,
            input,
        } => {
            let bookings = read_bookings(input.as_deref())?;
            let window = match (start, end, date) {
                (Some(start), Some(end), _) => TimeRange { start, end },
                (_, _, Some(date)) => engine
                    .business_day_window(date)
                    .context("Failed to build business-hours window")?,
                _ => anyhow::bail!("Either --start/--end or --date is required"),
            };
            match min_minutes {
                Some(min) => {
                    let slot = engine
                        .first_free_slot(&window, &bookings, min)
                        .context("Failed to compute free slots")?;
                    print_json(&slot)?;
                }
                None => {
                    let slots = engine
                        .free_slots_in_window(&window, &bookings)
                        .context("Failed to compute free slots")?;
                    print_json(&slots)?;
                }
            }
        }
        Commands::Occupied { at, input } => {
            let bookings = read_bookings(input.as_deref())?;
            let at = resolve_instant(at);
            let report = OccupiedReport {
                at,
                occupied: engine.is_occupied_at(at, &bookings),
            };
            print_json(&report)?;
        }
        Commands::Day {
            resource,
            date,
            input,
        } => {
            let bookings = read_bookings(input.as_deref())?;
            let overview = engine
                .day_overview(resource, date, &bookings)
                .context("Failed to build day overview")?;
            print_json(&overview)?;
        }
        Commands::AvailableNow { role, at, input } => {
            let raw = read_input(input.as_deref())?;
            let resources: Vec<ResourceSchedule> =
                serde_json::from_str(&raw).context("Failed to parse resources JSON")?;
            let clock = FixedClock(resolve_instant(at));
            let available = engine.available_now(&clock, &resources, role.as_deref());
            print_json(&available)?;
        }
        Commands::Transition { status, action } => {
            let to = status
                .apply(action.into())
                .context("Transition not allowed")?;
            print_json(&TransitionReport { from: status, to })?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

/// Build the engine config from `--config`, then apply flag overrides.
fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            EngineConfig::from_json(&raw)
                .with_context(|| format!("Invalid config file: {}", path))?
        }
        None => EngineConfig::default(),
    };

    if let Some(policy) = cli.policy {
        config.gap_policy = policy.into();
    }
    if let Some(tz) = &cli.timezone {
        config.business_hours.timezone = tz.clone();
    }

    tracing::info!(?config, "engine configured");
    Ok(config)
}

fn resolve_instant(at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    at.unwrap_or_else(|| SystemClock.now())
}

/// Parse an RFC 3339 or naive (UTC) datetime, with the same rules as booking payloads.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    booking_engine::parse_timestamp(s).map_err(|e| e.to_string())
}

fn read_bookings(path: Option<&str>) -> Result<Vec<BookingRecord>> {
    let raw = read_input(path)?;
    let bookings: Vec<BookingRecord> =
        serde_json::from_str(&raw).context("Failed to parse bookings JSON")?;
    tracing::info!(count = bookings.len(), "bookings loaded");
    Ok(bookings)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

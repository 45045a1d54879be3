//! # pool-hours
//!
//! Command-line front end: live status, merged week schedules, search and
//! details for the pools in a pools file.

#![deny(
    clippy::undocumented_unsafe_blocks,
    clippy::missing_safety_doc,
    reason = "multi-person projects should document dangers"
)]
#![cfg_attr(
    not(any(test, debug_assertions)),
    deny(
        clippy::missing_panics_doc,
        clippy::panic,
        clippy::unimplemented,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "prefer errors over panicking"
    )
)]

use chrono::{DateTime, NaiveDate, Utc};
use clap::{
    Parser, Subcommand,
    builder::{Styles, styling::AnsiColor},
};
use miette::{LabeledSpan, Result, Severity, miette};
use pool_hours::{
    Catalog, CatalogError, Clock, Config, EasternTime, FixedClock, Pool, SystemClock,
    config::ConfigError,
    data::{pool::WeekSchedule, slot::DaySlot},
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const STYLE: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().bold())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightCyan.on_default().bold())
    .placeholder(AnsiColor::Cyan.on_default());

/// Pool hours, overrides merged in
#[derive(Debug, Parser)]
#[command(version, propagate_version = true, about, long_about = None, styles = STYLE)]
pub struct Cli {
    /// Provide path to config file [default: ./pool-hours.toml, if present]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Provide path to pools data file, overriding the config
    #[arg(short, long, value_name = "PATH")]
    pools: Option<PathBuf>,

    /// Pretend the current time is this RFC 3339 instant, e.g. 2025-07-04T16:30:00Z
    #[arg(long, value_name = "INSTANT")]
    at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Live status of one pool, or of every pool
    Status {
        /// Pool id
        id: Option<String>,
    },

    /// Effective schedule for a week, overrides merged in
    Week {
        /// Pool id
        id: String,

        /// Any date in the week to show [default: today]
        #[arg(short, long, value_name = "YYYY-MM-DD")]
        start: Option<NaiveDate>,
    },

    /// Pools whose name, address, features or amenities mention a term
    Search {
        /// Case-insensitive search term
        term: String,
    },

    /// Everything known about one pool, as JSON
    Show {
        /// Pool id
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(x) => Ok(x),
        Err(e)
            if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            return e.print().map_err(miette::Error::from_err);
        }
        Err(e) => Err(miette::Error::from_err(e)),
    }?;

    let config = Config::load(cli.config.as_deref()).map_err(config_diagnostic)?;
    init_logging(&config.log.level);

    let clock: Box<dyn Clock> = match cli.at {
        Some(instant) => Box::new(FixedClock(instant)),
        None => Box::new(SystemClock),
    };
    let pools = cli.pools.unwrap_or(config.data.pools);
    let catalog = Catalog::load(&pools, &*clock).map_err(catalog_diagnostic)?;
    let now = EasternTime::now(&*clock);
    let week_start = config.display.week_start;

    match cli.command {
        Command::Status { id: Some(id) } => print_status(find(&catalog, &id)?, &now),
        Command::Status { id: None } => catalog.pools().iter().for_each(|pool| print_status(pool, &now)),
        Command::Week { id, start } => {
            let pool = find(&catalog, &id)?;
            let week = match start {
                Some(date) => pool.week_schedule_for_date(week_start.week_of(date)),
                None => pool.week_schedule(&now, week_start),
            };
            print_week(pool, &week);
        }
        Command::Search { term } => {
            let found = catalog.search(&term);
            if found.is_empty() {
                println!("no pools match `{term}`");
            }
            for pool in found {
                println!("{:<12} {} ({})", pool.id, pool.name, pool.location.address());
            }
        }
        Command::Show { id } => {
            let info = find(&catalog, &id)?.detailed_info(&now, week_start);
            let json = serde_json::to_string_pretty(&info).map_err(miette::Error::from_err)?;
            println!("{json}");
        }
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn find<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Pool> {
    catalog.get(id).ok_or_else(|| {
        miette!(
            severity = Severity::Error,
            labels = vec![LabeledSpan::at(0..id.len(), "unknown pool id")],
            help = "run `pool-hours search \"\"` to list every pool",
            "no pool with id `{id}`"
        )
        .with_source_code(id.to_string())
    })
}

fn config_diagnostic(e: ConfigError) -> miette::Report {
    match e {
        ConfigError::Io { path, source } => {
            let shown = path.display().to_string();
            miette!(
                severity = Severity::Error,
                labels = vec![LabeledSpan::at(0..shown.len(), source.to_string())],
                help = "make sure the file exists and can be read",
                "could not load config"
            )
            .with_source_code(shown)
        }
        ConfigError::Toml { path, source } => {
            let labels = source
                .span()
                .map(|span| LabeledSpan::at(span, source.message().to_string()))
                .into_iter()
                .collect::<Vec<_>>();
            let text = std::fs::read_to_string(&path).unwrap_or_default();
            miette!(
                severity = Severity::Error,
                labels = labels,
                help = "see `[data]`, `[log]` and `[display]` in the documentation of `Config`",
                "invalid config file `{}`",
                path.display()
            )
            .with_source_code(text)
        }
    }
}

fn catalog_diagnostic(e: CatalogError) -> miette::Report {
    match e {
        CatalogError::Io { path, source } => {
            let shown = path.display().to_string();
            miette!(
                severity = Severity::Error,
                labels = vec![LabeledSpan::at(0..shown.len(), source.to_string())],
                help = "pass `--pools PATH` or set `[data] pools` in the config",
                "could not load pool data"
            )
            .with_source_code(shown)
        }
        e => miette::Error::from_err(e).wrap_err("could not load pool data"),
    }
}

fn print_status(pool: &Pool, now: &EasternTime) {
    let status = pool.current_status(now);
    let effective = pool.effective_status_at(now);
    if effective == status {
        println!("{:<12} {:<32} {status}", pool.id, pool.name);
    } else {
        println!("{:<12} {:<32} {effective} (regular schedule: {status})", pool.id, pool.name);
    }
}

fn print_week(pool: &Pool, week: &WeekSchedule) {
    println!("{}, week of {}", pool.name, week.start);
    for day in &week.days {
        let mut slots = day.slots.iter();
        match slots.next() {
            None => println!("{:<10} {}  Closed", day.day, day.date),
            Some(first) => {
                println!("{:<10} {}  {}", day.day, day.date, slot_line(first));
                for slot in slots {
                    println!("{:<10} {:<10}  {}", "", "", slot_line(slot));
                }
            }
        }
    }
}

fn slot_line(slot: &DaySlot) -> String {
    let mut line = format!("{:<18} {}", slot.interval.to_string(), slot.activities.join(", "));
    if let Some(reason) = &slot.override_reason {
        line.push_str(&format!("  [{reason}]"));
    }
    if !slot.notes.is_empty() && slot.override_reason.as_deref() != Some(slot.notes.as_str()) {
        line.push_str(&format!("  ({})", slot.notes));
    }
    line
}

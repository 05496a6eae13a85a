//! `baysync` — sync one bay's upcoming bookings from Google Calendar into a
//! Home Assistant calendar.
//!
//! ## Usage
//!
//! ```sh
//! # Sync bay 3 into calendar.bay_3 for the rest of today
//! baysync --bay-number 3 --local-calendar-id calendar.bay_3 --config /etc/baysync.yaml
//!
//! # Show what would be created without writing anything
//! baysync --bay-number 3 --local-calendar-id calendar.bay_3 --config /etc/baysync.yaml --dry-run
//!
//! # Machine-readable report
//! baysync --bay-number 3 --local-calendar-id calendar.bay_3 --config /etc/baysync.yaml --format json
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see every merge boundary.
//! Stale local events are never removed.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use baysync_cli::{Config, GoogleCalendarFeed, HomeAssistantStore};
use baysync_engine::{Syncer, TimeWindow};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "baysync",
    version,
    about = "Sync bay bookings from Google Calendar into a Home Assistant calendar"
)]
struct Cli {
    /// The bay whose bookings are synced
    #[arg(long)]
    bay_number: u32,

    /// Home Assistant calendar entity for that bay (e.g. calendar.bay_3)
    #[arg(long)]
    local_calendar_id: String,

    /// Path to the YAML config file
    #[arg(long)]
    config: PathBuf,

    /// Decide everything but create nothing
    #[arg(long)]
    dry_run: bool,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // One reference instant for the whole run.
    let now = Utc::now();

    let bay = cli.bay_number.to_string();
    info!(
        bay = %bay,
        calendar = %cli.local_calendar_id,
        config = %cli.config.display(),
        dry_run = cli.dry_run,
        "starting sync"
    );

    let config = Config::load(&cli.config)?;
    let tz = config.timezone()?;

    let token = config.google_access_token()?;
    let feed = GoogleCalendarFeed::new(config.google(token))
        .context("Failed to build Google Calendar client")?;
    let store = HomeAssistantStore::new(config.home_assistant()?)
        .context("Failed to build Home Assistant client")?;

    let window = TimeWindow::rest_of_day(now, tz);
    let options = config.sync_options(&bay, &cli.local_calendar_id, cli.dry_run)?;
    let report = Syncer::new(feed, store, options)
        .run(now, &window)
        .with_context(|| format!("Sync of bay {bay} aborted"))?;

    match cli.format {
        Format::Text => println!("{}", baysync_cli::report::render_text(&report, tz)),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }

    if report.failed() > 0 {
        error!(failed = report.failed(), "some events could not be created");
        process::exit(1);
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
}

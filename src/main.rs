//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `request_pacer` library that:
//! - Parses command-line arguments
//! - Initializes the logger
//! - Loads the persisted pacing snapshot
//! - Prints the status report (human-readable or JSON)
//!
//! All core functionality is implemented in the library crate.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use request_pacer::config::DEFAULT_SNAPSHOT_PATH;
use request_pacer::initialization::init_logger_with;
use request_pacer::{HealthStatus, LogFormat, LogLevel, PacerConfig, RequestPacer, StatusReport};

#[derive(Parser, Debug)]
#[command(
    name = "request_pacer",
    version,
    about = "Inspect persisted request-pacing state"
)]
struct Cli {
    /// Path to the persisted pacing snapshot
    #[arg(long, default_value = DEFAULT_SNAPSHOT_PATH)]
    snapshot: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    log_format: LogFormat,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let config = PacerConfig {
        snapshot_path: cli.snapshot,
        ..Default::default()
    };

    // Construction loads the snapshot (or starts fresh when it is missing,
    // stale, or malformed); the report covers whatever state was restored.
    let pacer = RequestPacer::new(config);
    let report = pacer.status_report();

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("request_pacer error: {e:#}");
                process::exit(1);
            }
        }
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &StatusReport) {
    let status = match report.status {
        HealthStatus::Optimal => report.status.as_str().green(),
        HealthStatus::NoData => report.status.as_str().normal(),
        HealthStatus::Cautious => report.status.as_str().yellow(),
        HealthStatus::RateLimited | HealthStatus::Problematic => report.status.as_str().red(),
    };

    println!("Status:               {} - {}", status, report.message);
    println!(
        "Current delay:        {:.1}s",
        report.current_delay.as_secs_f64()
    );
    if let Some(rate) = report.success_rate {
        println!("Success rate:         {:.1}%", rate * 100.0);
    }
    if let Some(avg) = report.avg_delay {
        println!("Average delay:        {:.1}s", avg.as_secs_f64());
    }
    println!(
        "Streak:               {} successes / {} failures",
        report.consecutive_successes, report.consecutive_failures
    );
    println!(
        "Rate limit detected:  {}",
        if report.rate_limit_detected {
            "yes".red().to_string()
        } else {
            "no".to_string()
        }
    );
    println!("Events in last hour:  {}", report.events_last_hour);
}

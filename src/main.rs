//! Accomplishment Report - Main Entry Point
//!
//! This is the command line front end. The actual implementation is in the
//! `accomplishment_report` library.

use accomplishment_report::formatting::format_summary;
use accomplishment_report::{ReportConfig, ReportGenerator};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Accomplishment Report - timelines, statistics and a narrative report from a tracker export
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the report configuration (TOML)
    #[arg(short, long, default_value = "report.toml")]
    config: PathBuf,

    /// Run date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Override the output root directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only process the named project
    #[arg(short, long)]
    project: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD (e.g., '2023-11-04')", value))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = ReportConfig::load(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;

    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(name) = args.project.as_deref() {
        config.restrict_to_project(name)?;
    }

    let generator = match args.date {
        Some(date) => ReportGenerator::with_date(config, date),
        None => ReportGenerator::new(config),
    };
    let outcome = generator.run()?;

    print!("{}", format_summary(&outcome.projects, &outcome.report));
    Ok(())
}

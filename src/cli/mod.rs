//! Command-line interface for forecast-match.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **extract**: Parse prediction documents into structured forecasts
//! - **digest**: Fingerprint a forecast and its source file
//! - **verify**: Check a file against a previously recorded digest
//! - **match**: Check a forecast against a catalog of observed events
//!
//! ## Usage
//!
//! ```text
//! # Extract a forecast and show structural warnings
//! forecast-match extract prediction.md
//!
//! # Save the structured forecast for later
//! forecast-match extract prediction.md --format json > forecast.json
//!
//! # Record the digest before the event window opens
//! forecast-match digest prediction.md --format json > record.json
//!
//! # Later: prove the prediction file was not altered
//! forecast-match verify prediction.md 3f2a...e9
//!
//! # Check against observed events
//! forecast-match match forecast.json --events superevents.json --sky-tolerance 20
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use std::path::Path;

use crate::core::forecast::Forecast;
use crate::parsing::extractor::{parse_content, parse_file};

pub mod check;
pub mod digest;
pub mod extract;
pub mod verify;

#[derive(Parser)]
#[command(name = "forecast-match")]
#[command(version)]
#[command(about = "Extract forecasts from prediction text and match them against observed events")]
#[command(
    long_about = "forecast-match turns free-form prediction documents into structured forecasts.\n\nFor each forecast it can:\n- Produce a tamper-evident digest of the claim\n- Verify a file against a recorded digest\n- Check observed events against the forecast's time, sky and frequency tolerances"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract structured forecasts from prediction documents
    Extract(extract::ExtractArgs),

    /// Compute the digest and verification record of a forecast
    Digest(digest::DigestArgs),

    /// Verify a file against an expected digest
    Verify(verify::VerifyArgs),

    /// Check a forecast against observed events
    Match(check::MatchArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load a forecast from a saved JSON record (`.json`) or by parsing
/// prediction text. `label` overrides the source label used for the
/// generated identifier.
pub(crate) fn load_forecast(path: &Path, label: Option<&str>) -> anyhow::Result<Forecast> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let content = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&content)?);
    }

    match label {
        Some(label) => {
            let bytes = std::fs::read(path)?;
            Ok(parse_content(&String::from_utf8_lossy(&bytes), label)?)
        }
        None => Ok(parse_file(path)?),
    }
}

pub(crate) fn format_time(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Accept RFC 3339 or a bare date (midnight UTC)
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| crate::parsing::date::parse_date_token(raw))
        .ok_or_else(|| format!("invalid timestamp '{raw}' (expected RFC 3339 or YYYY-MM-DD)"))
}

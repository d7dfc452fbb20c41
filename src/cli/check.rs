use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use clap::Args;

use crate::catalog::source::EventSource;
use crate::catalog::store::EventCatalog;
use crate::cli::{format_time, load_forecast, parse_timestamp, OutputFormat};
use crate::core::forecast::Forecast;
use crate::core::types::Status;
use crate::matching::engine::{AxisCheck, MatchEngine, MatchResult, Tolerances};

#[derive(Args)]
pub struct MatchArgs {
    /// Prediction document, or a forecast saved with `extract --format json`
    #[arg(required = true)]
    pub input: PathBuf,

    /// Event catalog (native catalog JSON or a saved registry superevent list)
    #[arg(long, required = true)]
    pub events: PathBuf,

    /// Only check this event ID
    #[arg(long)]
    pub event: Option<String>,

    /// Ignore events before this time (RFC 3339 or YYYY-MM-DD).
    /// Defaults to the window start minus the time tolerance.
    #[arg(long, value_parser = parse_timestamp)]
    pub start: Option<DateTime<Utc>>,

    /// Ignore events after this time (RFC 3339 or YYYY-MM-DD).
    /// Defaults to the window end plus the time tolerance.
    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<DateTime<Utc>>,

    /// Number of matches to show
    #[arg(short = 'n', long, default_value = "5")]
    pub max_matches: usize,

    // === Tolerance options ===
    /// Tolerances JSON file, e.g. {"time_hours": 12, "sky_degrees": 20}
    #[arg(long)]
    pub tolerances: Option<PathBuf>,

    /// Hours an event may fall outside the window (overrides the file)
    #[arg(long)]
    pub time_tolerance: Option<f64>,

    /// Sky tolerance in degrees (overrides the file)
    #[arg(long)]
    pub sky_tolerance: Option<f64>,

    /// Frequency tolerance in percent (overrides the file)
    #[arg(long)]
    pub frequency_tolerance: Option<f64>,

    /// Source label used for generated identifiers
    #[arg(long)]
    pub label: Option<String>,
}

impl MatchArgs {
    fn resolve_tolerances(&self) -> anyhow::Result<Tolerances> {
        let mut tolerances = match &self.tolerances {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => Tolerances::default(),
        };

        if let Some(hours) = self.time_tolerance {
            tolerances.time_hours = hours;
        }
        if let Some(degrees) = self.sky_tolerance {
            tolerances.sky_degrees = degrees;
        }
        if let Some(percent) = self.frequency_tolerance {
            tolerances.frequency_percent = percent;
        }

        for (name, value) in [
            ("time", tolerances.time_hours),
            ("sky", tolerances.sky_degrees),
            ("frequency", tolerances.frequency_percent),
        ] {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{name} tolerance must be a non-negative number, got {value}");
            }
        }

        Ok(tolerances)
    }
}

pub fn run(args: MatchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let forecast = load_forecast(&args.input, args.label.as_deref())?;
    let tolerances = args.resolve_tolerances()?;
    let catalog = EventCatalog::load_from_file(&args.events)?;

    let candidates = if let Some(id) = &args.event {
        vec![catalog.event(id)?]
    } else {
        let too_large = || {
            anyhow::anyhow!(
                "time tolerance of {} hours is too large to derive a candidate window; pass --start and --end",
                tolerances.time_hours
            )
        };
        #[allow(clippy::cast_possible_truncation)]
        let slack = || Duration::try_minutes((tolerances.time_hours * 60.0).ceil() as i64);

        let start = match args.start {
            Some(start) => start,
            None => slack()
                .and_then(|s| forecast.window_start().checked_sub_signed(s))
                .ok_or_else(too_large)?,
        };
        let end = match args.end {
            Some(end) => end,
            None => slack()
                .and_then(|s| forecast.window_end().checked_add_signed(s))
                .ok_or_else(too_large)?,
        };
        catalog.events(Some(start), Some(end), catalog.len())?
    };

    if verbose {
        eprintln!(
            "Catalog: {} events, {} candidates for {}",
            catalog.len(),
            candidates.len(),
            forecast.id()
        );
    }

    let engine = MatchEngine::with_tolerances(tolerances);
    let matches = engine.find_matches(&forecast, &candidates, args.max_matches);

    // Commit the verdict on a copy so the report shows the resulting state.
    // A saved forecast that was already judged keeps its status.
    let mut judged = forecast.clone();
    if judged.status() == Status::Pending {
        match matches.first().and_then(|m| m.event_id.as_deref()) {
            Some(event_id) => judged.mark_validated(event_id)?,
            None => judged.mark_invalidated()?,
        }
    }

    match format {
        OutputFormat::Text => print_text(&judged, &tolerances, candidates.len(), &matches),
        OutputFormat::Json => print_json(&judged, &tolerances, candidates.len(), &matches)?,
        OutputFormat::Tsv => print_tsv(&matches),
    }

    Ok(())
}

fn axis_text(check: Option<&AxisCheck>, unit: &str) -> String {
    match check {
        None => "not evaluated".to_string(),
        Some(c) if c.distance.is_infinite() => "no match (undefined)".to_string(),
        Some(c) => format!(
            "{:.2}{unit} ({})",
            c.distance,
            if c.matched { "match" } else { "no match" }
        ),
    }
}

fn print_text(
    forecast: &Forecast,
    tolerances: &Tolerances,
    candidates: usize,
    matches: &[MatchResult],
) {
    println!("Forecast: {} ({}, {})", forecast.id(), forecast.category(), forecast.framework());
    println!(
        "Window: {} to {}",
        format_time(forecast.window_start()),
        format_time(forecast.window_end())
    );
    println!(
        "Tolerances: {:.1} h, {:.1}°, {:.1}%",
        tolerances.time_hours, tolerances.sky_degrees, tolerances.frequency_percent
    );
    println!("Candidates: {candidates}");
    println!("{}", "=".repeat(60));

    if matches.is_empty() {
        println!("\nNo matching events found.");
    }

    for (i, m) in matches.iter().enumerate() {
        println!(
            "\n#{} {} (score {:.1}%)",
            i + 1,
            m.event_id.as_deref().unwrap_or("-"),
            m.score * 100.0
        );
        println!("   Time: {}", axis_text(Some(&m.time), " h"));
        println!("   Sky: {}", axis_text(m.sky.as_ref(), "°"));
        println!("   Frequency: {}", axis_text(m.frequency.as_ref(), "%"));
    }

    println!(
        "\nStatus: {}{}",
        forecast.status(),
        forecast
            .matched_event_id()
            .map(|id| format!(" ({id})"))
            .unwrap_or_default()
    );
}

fn print_json(
    forecast: &Forecast,
    tolerances: &Tolerances,
    candidates: usize,
    matches: &[MatchResult],
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "forecast_id": forecast.id(),
        "tolerances": tolerances,
        "candidates": candidates,
        "matches": matches,
        "status": forecast.status(),
        "matched_event_id": forecast.matched_event_id(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(matches: &[MatchResult]) {
    fn axis_fields(check: Option<&AxisCheck>) -> (String, String) {
        check.map_or((String::new(), String::new()), |c| {
            (format!("{:.4}", c.distance), c.matched.to_string())
        })
    }

    println!(
        "rank\tevent_id\tscore\toverall_match\ttime_hours\ttime_match\tsky_degrees\tsky_match\tfrequency_percent\tfrequency_match"
    );
    for (i, m) in matches.iter().enumerate() {
        let (time_distance, time_match) = axis_fields(Some(&m.time));
        let (sky_distance, sky_match) = axis_fields(m.sky.as_ref());
        let (freq_distance, freq_match) = axis_fields(m.frequency.as_ref());
        println!(
            "{}\t{}\t{:.4}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            i + 1,
            m.event_id.as_deref().unwrap_or(""),
            m.score,
            m.overall_match,
            time_distance,
            time_match,
            sky_distance,
            sky_match,
            freq_distance,
            freq_match,
        );
    }
}

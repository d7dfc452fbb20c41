use std::path::PathBuf;

use clap::Args;

use crate::cli::{format_time, load_forecast, OutputFormat};
use crate::core::forecast::Forecast;
use crate::integrity::verifier::forecast_digest;
use crate::matching::diagnosis::{validate_structure, StructureWarning};

#[derive(Args)]
pub struct ExtractArgs {
    /// Prediction documents (plain text or markdown)
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Source label used for generated identifiers (single input only)
    #[arg(long)]
    pub label: Option<String>,
}

struct Extracted {
    source: PathBuf,
    forecast: Forecast,
    warnings: Vec<StructureWarning>,
}

pub fn run(args: ExtractArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if args.label.is_some() && args.inputs.len() > 1 {
        anyhow::bail!("--label can only be used with a single input");
    }

    let mut extracted = Vec::new();
    let mut failures = 0usize;

    // One bad document does not stop the batch
    for input in &args.inputs {
        match load_forecast(input, args.label.as_deref()) {
            Ok(forecast) => {
                let warnings = validate_structure(&forecast);
                extracted.push(Extracted {
                    source: input.clone(),
                    forecast,
                    warnings,
                });
            }
            Err(e) => {
                eprintln!("Error: {}: {e}", input.display());
                failures += 1;
            }
        }
    }

    if verbose {
        eprintln!(
            "Extracted {} of {} inputs",
            extracted.len(),
            args.inputs.len()
        );
    }

    match format {
        OutputFormat::Text => print_text(&extracted),
        OutputFormat::Json => print_json(&extracted)?,
        OutputFormat::Tsv => print_tsv(&extracted),
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} inputs could not be parsed", args.inputs.len());
    }
    Ok(())
}

fn print_text(extracted: &[Extracted]) {
    for (i, item) in extracted.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let f = &item.forecast;

        println!("Forecast: {}", f.id());
        println!("{}", "=".repeat(60));
        println!("  Source: {}", item.source.display());
        println!("  Category: {}", f.category());
        println!("  Framework: {}", f.framework());
        println!("  Confidence: {:.1}%", f.confidence() * 100.0);
        println!(
            "  Window: {} to {} ({:.1} h)",
            format_time(f.window_start()),
            format_time(f.window_end()),
            f.window_hours()
        );
        if let Some(sky) = f.sky_position() {
            println!(
                "  Sky: RA {:.2}°, Dec {:.2}° (radius {:.1}°)",
                sky.right_ascension(),
                sky.declination(),
                sky.uncertainty_radius()
            );
        }
        if let Some(signal) = f.signal() {
            println!(
                "  Signal: {:.1} Hz, amplitude {:.2e}",
                signal.frequency_hz(),
                signal.amplitude()
            );
        }
        if !f.tags().is_empty() {
            let tags: Vec<&str> = f.tags().iter().map(String::as_str).collect();
            println!("  Tags: {}", tags.join(", "));
        }
        println!("  Description: {}", f.description());
        println!("  Status: {}", f.status());
        println!("  Digest: {}", forecast_digest(f));

        if !item.warnings.is_empty() {
            println!("\nWarnings:");
            for warning in &item.warnings {
                println!("  - {warning}");
            }
        }
    }
}

/// A single forecast prints as an object so it can be loaded back;
/// several print as an array.
fn print_json(extracted: &[Extracted]) -> anyhow::Result<()> {
    if let [single] = extracted {
        println!("{}", serde_json::to_string_pretty(&single.forecast)?);
    } else {
        let forecasts: Vec<&Forecast> = extracted.iter().map(|e| &e.forecast).collect();
        println!("{}", serde_json::to_string_pretty(&forecasts)?);
    }
    Ok(())
}

fn print_tsv(extracted: &[Extracted]) {
    println!(
        "source\tid\tcategory\tframework\tconfidence\twindow_start\twindow_end\tra\tdec\tfrequency_hz\tamplitude\twarnings\tdigest"
    );
    for item in extracted {
        let f = &item.forecast;
        let (ra, dec) = f.sky_position().map_or((String::new(), String::new()), |s| {
            (s.right_ascension().to_string(), s.declination().to_string())
        });
        let (frequency, amplitude) = f.signal().map_or((String::new(), String::new()), |s| {
            (s.frequency_hz().to_string(), s.amplitude().to_string())
        });

        println!(
            "{}\t{}\t{}\t{}\t{:.4}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            item.source.display(),
            f.id(),
            f.category().code(),
            f.framework(),
            f.confidence(),
            format_time(f.window_start()),
            format_time(f.window_end()),
            ra,
            dec,
            frequency,
            amplitude,
            item.warnings.len(),
            forecast_digest(f),
        );
    }
}

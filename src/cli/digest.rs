use std::path::PathBuf;

use clap::Args;

use crate::cli::{format_time, load_forecast, OutputFormat};
use crate::integrity::verifier::{canonical_json, verification_record, VerificationRecord};

#[derive(Args)]
pub struct DigestArgs {
    /// Prediction document, or a forecast saved with `extract --format json`
    #[arg(required = true)]
    pub input: PathBuf,

    /// Source label used for generated identifiers
    #[arg(long)]
    pub label: Option<String>,

    /// Also print the canonical form that was hashed
    #[arg(long)]
    pub show_canonical: bool,
}

pub fn run(args: DigestArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let forecast = load_forecast(&args.input, args.label.as_deref())?;
    let record = verification_record(&forecast, Some(&args.input))?;

    if verbose {
        eprintln!("Forecast {} loaded from {}", forecast.id(), args.input.display());
    }

    match format {
        OutputFormat::Text => {
            print_text(&record);
            if args.show_canonical {
                println!("\nCanonical form:\n{}", canonical_json(&forecast));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Tsv => print_tsv(&record),
    }

    Ok(())
}

fn print_text(record: &VerificationRecord) {
    println!("Verification Record");
    println!("{}", "=".repeat(60));
    println!("  Forecast ID: {}", record.forecast_id);
    println!("  Framework: {}", record.framework);
    println!("  Forecast digest: {}", record.forecast_digest);
    if let (Some(path), Some(digest)) = (&record.file_path, &record.file_digest) {
        println!("  File: {path}");
        println!("  File digest: {digest}");
    }
    println!("  Verified at: {}", format_time(record.verified_at));
}

fn print_tsv(record: &VerificationRecord) {
    println!("forecast_id\tframework\tforecast_digest\tfile_path\tfile_digest\tverified_at");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        record.forecast_id,
        record.framework,
        record.forecast_digest,
        record.file_path.as_deref().unwrap_or(""),
        record.file_digest.as_deref().unwrap_or(""),
        format_time(record.verified_at),
    );
}

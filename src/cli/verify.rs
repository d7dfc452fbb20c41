use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::integrity::verifier::verify_file;
use crate::utils::validation::normalize_digest;

#[derive(Args)]
pub struct VerifyArgs {
    /// File to check
    #[arg(required = true)]
    pub file: PathBuf,

    /// Expected SHA-256 digest (64 hex characters, any case)
    #[arg(required = true)]
    pub digest: String,
}

pub fn run(args: VerifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let expected = normalize_digest(&args.digest);
    if expected.is_none() {
        eprintln!(
            "Warning: '{}' is not a 64-character hex digest",
            args.digest
        );
    }
    if verbose && !args.file.exists() {
        eprintln!("File not found: {}", args.file.display());
    }

    let verified = verify_file(&args.file, args.digest.trim())?;

    match format {
        OutputFormat::Text => {
            let verdict = if verified { "OK" } else { "MISMATCH" };
            println!("{verdict}: {}", args.file.display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": args.file.display().to_string(),
                "expected": expected.as_deref().unwrap_or(&args.digest),
                "verified": verified,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("file\tverified");
            println!("{}\t{verified}", args.file.display());
        }
    }

    if !verified {
        anyhow::bail!("Digest verification failed for {}", args.file.display());
    }
    Ok(())
}

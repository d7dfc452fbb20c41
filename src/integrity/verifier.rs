use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;

use crate::core::forecast::Forecast;
use crate::core::types::Framework;
use crate::utils::validation::is_valid_digest;

#[derive(Error, Debug)]
pub enum IntegrityError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// SHA-256 of raw content as 64 lowercase hex characters
#[must_use]
pub fn digest(content: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_ref());
    hex::encode(hasher.finalize())
}

/// Digest of a file's bytes
///
/// # Errors
///
/// Returns `IntegrityError::Io` if the file cannot be read.
pub fn file_digest(path: &Path) -> Result<String, IntegrityError> {
    let bytes = std::fs::read(path)?;
    Ok(digest(bytes))
}

/// Claim fields of a forecast, keys declared in sorted order so the
/// serialized form is canonical.
#[derive(Serialize)]
struct CanonicalForecast<'a> {
    confidence: f64,
    created_at: String,
    description: &'a str,
    event_end: String,
    event_start: String,
    framework: &'static str,
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sky_location: Option<CanonicalSky>,
    #[serde(rename = "type")]
    category: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    wave_params: Option<CanonicalWave>,
}

#[derive(Serialize)]
struct CanonicalSky {
    dec: f64,
    ra: f64,
}

#[derive(Serialize)]
struct CanonicalWave {
    amp: f64,
    freq: f64,
}

fn timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl<'a> From<&'a Forecast> for CanonicalForecast<'a> {
    fn from(forecast: &'a Forecast) -> Self {
        Self {
            confidence: forecast.confidence(),
            created_at: timestamp(forecast.created_at()),
            description: forecast.description(),
            event_end: timestamp(forecast.window_end()),
            event_start: timestamp(forecast.window_start()),
            framework: forecast.framework().label(),
            id: forecast.id(),
            sky_location: forecast.sky_position().map(|sky| CanonicalSky {
                dec: sky.declination(),
                ra: sky.right_ascension(),
            }),
            category: forecast.category().code(),
            wave_params: forecast.signal().map(|signal| CanonicalWave {
                amp: signal.amplitude(),
                freq: signal.frequency_hz(),
            }),
        }
    }
}

/// Compact canonical JSON of the forecast's claim fields
#[must_use]
pub fn canonical_json(forecast: &Forecast) -> String {
    serde_json::to_string(&CanonicalForecast::from(forecast))
        .expect("canonical forecast has only string keys")
}

/// Digest of the forecast's claim.
///
/// Status, matched event, tags, uncertainty radius and the optional signal
/// extras do not contribute.
#[must_use]
pub fn forecast_digest(forecast: &Forecast) -> String {
    digest(canonical_json(forecast))
}

/// Check a file against an expected digest, ignoring case.
///
/// A missing file or an expected value that is not a 64-character hex digest
/// verifies as `false` rather than as an error.
///
/// # Errors
///
/// Returns `IntegrityError::Io` if the file exists but cannot be read.
pub fn verify_file(path: &Path, expected: &str) -> Result<bool, IntegrityError> {
    if !path.exists() || !is_valid_digest(expected) {
        return Ok(false);
    }
    Ok(file_digest(path)?.eq_ignore_ascii_case(expected))
}

/// Flat, serializable proof of what a forecast claimed and when it was checked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationRecord {
    pub forecast_id: String,
    pub forecast_digest: String,
    pub verified_at: DateTime<Utc>,
    pub framework: Framework,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// Build a [`VerificationRecord`]; the file fields are filled only when
/// `file` is given and exists.
///
/// # Errors
///
/// Returns `IntegrityError::Io` if the file exists but cannot be read.
pub fn verification_record(
    forecast: &Forecast,
    file: Option<&Path>,
) -> Result<VerificationRecord, IntegrityError> {
    let (file_digest, file_path) = match file.filter(|path| path.exists()) {
        Some(path) => (Some(file_digest(path)?), Some(path.display().to_string())),
        None => (None, None),
    };

    Ok(VerificationRecord {
        forecast_id: forecast.id().to_string(),
        forecast_digest: forecast_digest(forecast),
        verified_at: Utc::now(),
        framework: forecast.framework(),
        file_digest,
        file_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forecast::ForecastBuilder;
    use crate::core::signal::SignalParameters;
    use crate::core::sky::SkyPosition;
    use crate::core::types::Category;
    use chrono::{Duration, TimeZone};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn jan15() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
    }

    fn make_forecast() -> Forecast {
        Forecast::builder(
            "TEST-001",
            Category::WaveBurst,
            jan15(),
            jan15() + Duration::hours(24),
        )
        .created_at(jan15() - Duration::days(1))
        .framework(Framework::Cia)
        .confidence(0.85)
        .description("Binary black hole merger predicted")
        .sky_position(Some(SkyPosition::new(180.5, 30.2).unwrap()))
        .signal(Some(SignalParameters::new(120.0, 2e-21).unwrap()))
        .build()
        .unwrap()
    }

    #[test]
    fn test_digest_known_value() {
        assert_eq!(
            digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(digest("Test content").len(), 64);
        assert_ne!(digest("Test content"), digest("Test content!"));
    }

    #[test]
    fn test_canonical_json_is_sorted_and_compact() {
        let json = canonical_json(&make_forecast());
        assert!(json.starts_with(r#"{"confidence":0.85,"created_at":"2025-01-14T00:00:00Z""#));
        assert!(json.contains(r#""sky_location":{"dec":30.2,"ra":180.5}"#));
        assert!(json.contains(r#""type":"wave_burst""#));
        assert!(json.contains(r#""wave_params":{"amp":2e-21,"freq":120.0}"#));
        assert!(!json.contains("status"));
    }

    #[test]
    fn test_forecast_digest_is_deterministic() {
        let forecast = make_forecast();
        assert_eq!(forecast_digest(&forecast), forecast_digest(&forecast));
        assert_eq!(forecast_digest(&forecast), forecast_digest(&forecast.clone()));
    }

    #[test]
    fn test_digest_unchanged_by_lifecycle() {
        let original = make_forecast();
        let before = forecast_digest(&original);

        let mut validated = original.clone();
        validated.mark_validated("S250115a").unwrap();
        assert_eq!(forecast_digest(&validated), before);

        let mut invalidated = original;
        invalidated.mark_invalidated().unwrap();
        assert_eq!(forecast_digest(&invalidated), before);
    }

    #[test]
    fn test_digest_survives_save_and_reload() {
        let amend = || ForecastBuilder::from(&make_forecast());
        let forecasts = [
            amend()
                .confidence(0.000_094_247_779_607_693_69)
                .sky_position(Some(
                    SkyPosition::new(123.456_789_012_345_67, -45.678_901_234_567_89).unwrap(),
                ))
                .signal(Some(
                    SignalParameters::new(100.004_948_716_593_05, 2.345_678_901_234_567e-21)
                        .unwrap(),
                ))
                .build()
                .unwrap(),
            amend()
                .confidence(1.0 / 3.0)
                .signal(Some(SignalParameters::new(100.007_423_074_889_59, 1e-21).unwrap()))
                .build()
                .unwrap(),
            amend().confidence(0.1 + 0.2).build().unwrap(),
        ];

        for forecast in forecasts {
            for json in [
                serde_json::to_string(&forecast).unwrap(),
                serde_json::to_string_pretty(&forecast).unwrap(),
            ] {
                let reloaded: Forecast = serde_json::from_str(&json).unwrap();
                assert_eq!(reloaded, forecast);
                assert_eq!(canonical_json(&reloaded), canonical_json(&forecast));
                assert_eq!(forecast_digest(&reloaded), forecast_digest(&forecast));
            }
        }
    }

    #[test]
    fn test_digest_changes_with_claim_fields() {
        let forecast = make_forecast();
        let base = forecast_digest(&forecast);
        let amend = || ForecastBuilder::from(&forecast);

        let variants = [
            amend().description("Something else entirely").build(),
            amend()
                .window(jan15(), jan15() + Duration::hours(48))
                .build(),
            amend().confidence(0.9).build(),
            amend().framework(Framework::Sia).build(),
            amend()
                .sky_position(Some(SkyPosition::new(181.0, 30.2).unwrap()))
                .build(),
            amend().sky_position(None).build(),
            amend()
                .signal(Some(SignalParameters::new(121.0, 2e-21).unwrap()))
                .build(),
        ];
        for variant in variants {
            assert_ne!(forecast_digest(&variant.unwrap()), base);
        }
    }

    #[test]
    fn test_digest_ignores_excluded_fields() {
        let forecast = make_forecast();
        let base = forecast_digest(&forecast);

        let tagged = ForecastBuilder::from(&forecast)
            .tags(["merger"])
            .sky_position(Some(SkyPosition::with_uncertainty(180.5, 30.2, 5.0).unwrap()))
            .signal(Some(
                SignalParameters::new(120.0, 2e-21)
                    .unwrap()
                    .with_snr(Some(25.0)),
            ))
            .build()
            .unwrap();
        assert_eq!(forecast_digest(&tagged), base);
    }

    #[test]
    fn test_verify_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Test content").unwrap();
        file.flush().unwrap();

        let expected = digest("Test content");
        assert!(verify_file(file.path(), &expected).unwrap());
        assert!(verify_file(file.path(), &expected.to_uppercase()).unwrap());
        assert!(!verify_file(file.path(), &digest("Other")).unwrap());
        assert!(!verify_file(file.path(), "not-a-digest").unwrap());
    }

    #[test]
    fn test_verify_missing_file_is_false() {
        let result = verify_file(Path::new("/nonexistent/file.md"), &digest("x"));
        assert!(!result.unwrap());
    }

    #[test]
    fn test_verification_record() {
        let forecast = make_forecast();

        let record = verification_record(&forecast, None).unwrap();
        assert_eq!(record.forecast_id, "TEST-001");
        assert_eq!(record.forecast_digest, forecast_digest(&forecast));
        assert_eq!(record.framework, Framework::Cia);
        assert!(record.file_digest.is_none());

        let missing = verification_record(&forecast, Some(Path::new("/nonexistent.md"))).unwrap();
        assert!(missing.file_path.is_none());

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"prediction text").unwrap();
        file.flush().unwrap();
        let record = verification_record(&forecast, Some(file.path())).unwrap();
        assert_eq!(record.file_digest, Some(digest("prediction text")));
        assert_eq!(
            record.file_path,
            Some(file.path().display().to_string())
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["framework"], "CIA");
    }
}

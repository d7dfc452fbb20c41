use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::forecast::Forecast;
use crate::core::signal::SignalParameters;
use crate::core::sky::SkyPosition;
use crate::core::types::{Category, Framework, StructuralError};
use crate::parsing::date::parse_date_token;
use crate::parsing::rules::{
    capture, hashtags, infer_category, Field, DEFAULT_AMPLITUDE, DEFAULT_CATEGORY,
    DEFAULT_CONFIDENCE, DEFAULT_DESCRIPTION, DEFAULT_FRAMEWORK, DEFAULT_FREQUENCY_HZ,
    DEFAULT_WINDOW_HOURS, GENERATED_ID_PREFIX, MAX_DESCRIPTION_CHARS, MAX_TAGS,
    MIN_DESCRIPTION_CHARS,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty prediction content in {0}")]
    Empty(String),

    #[error("Invalid {field} in {source_label}: {error}")]
    Structural {
        field: &'static str,
        source_label: String,
        #[source]
        error: StructuralError,
    },
}

/// A pattern matched but its captured text is not a number
#[derive(Debug)]
struct MalformedField<'t> {
    field: Field,
    raw: &'t str,
}

/// Parse a prediction file; the path doubles as the source label
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or any error from
/// [`parse_content`].
pub fn parse_file(path: &Path) -> Result<Forecast, ParseError> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    parse_content(&content, &path.display().to_string())
}

/// Parse prediction text into a pending [`Forecast`]
///
/// # Errors
///
/// Returns `ParseError::Empty` for empty or whitespace-only content, and
/// `ParseError::Structural` if an extracted value violates a record invariant.
pub fn parse_content(content: &str, source_label: &str) -> Result<Forecast, ParseError> {
    parse_content_at(content, source_label, Utc::now())
}

/// [`parse_content`] with an explicit "now", used for the creation timestamp
/// and as the window start when the text carries no usable date.
///
/// # Errors
///
/// See [`parse_content`].
pub fn parse_content_at(
    content: &str,
    source_label: &str,
    now: DateTime<Utc>,
) -> Result<Forecast, ParseError> {
    if content.trim().is_empty() {
        return Err(ParseError::Empty(source_label.to_string()));
    }

    let id = capture(Field::Identifier, content)
        .map_or_else(|| generate_id(source_label), str::to_string);

    let framework = match capture(Field::Framework, content) {
        Some(raw) => raw
            .parse::<Framework>()
            .map_err(|error| structural("framework", source_label, error))?,
        None => {
            debug!(source = %source_label, "No framework found, defaulting to {DEFAULT_FRAMEWORK}");
            DEFAULT_FRAMEWORK
        }
    };

    let category = infer_category(content).unwrap_or(DEFAULT_CATEGORY);

    let confidence = match capture(Field::Confidence, content) {
        Some(raw) => normalize_confidence(raw).unwrap_or_else(|| {
            warn!(source = %source_label, raw = %raw, "Malformed confidence, using default");
            DEFAULT_CONFIDENCE
        }),
        None => DEFAULT_CONFIDENCE,
    };

    let signal = if category == Category::WaveBurst {
        extract_signal(content, source_label)?
    } else {
        None
    };

    let sky_position = extract_sky_position(content, source_label)?;

    let window_start = match capture(Field::Date, content) {
        Some(token) => parse_date_token(token).unwrap_or_else(|| {
            warn!(source = %source_label, token = %token, "Unrecognized date, using current time");
            now
        }),
        None => {
            debug!(source = %source_label, "No date found, using current time");
            now
        }
    };
    let window_end = window_start + Duration::hours(DEFAULT_WINDOW_HOURS);

    Forecast::builder(id, category, window_start, window_end)
        .created_at(now)
        .framework(framework)
        .confidence(confidence)
        .description(extract_description(content))
        .sky_position(sky_position)
        .signal(signal)
        .tags(extract_tags(content))
        .build()
        .map_err(|error| structural("forecast", source_label, error))
}

/// Turn captured confidence text into a fraction in [0, 1].
///
/// `85%` is a percentage. A bare value up to 1 is a fraction; a bare value
/// above 1 is read as a percentage, and if that is still above 1 it is divided
/// by 100 once more (`8500` → 0.85). The result is clamped.
pub fn normalize_confidence(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let (number, is_percent) = match trimmed.strip_suffix('%') {
        Some(number) => (number.trim_end(), true),
        None => (trimmed, false),
    };
    let value: f64 = number.parse().ok()?;
    if value.is_nan() {
        return None;
    }

    let mut confidence = if is_percent || value > 1.0 {
        value / 100.0
    } else {
        value
    };
    if !is_percent && confidence > 1.0 {
        confidence /= 100.0;
    }

    Some(confidence.clamp(0.0, 1.0))
}

fn structural(field: &'static str, source_label: &str, error: StructuralError) -> ParseError {
    ParseError::Structural {
        field,
        source_label: source_label.to_string(),
        error,
    }
}

/// `Ok(None)` when the pattern is absent, `Err` when it matched non-numeric text
fn numeric_field(field: Field, content: &str) -> Result<Option<f64>, MalformedField<'_>> {
    match capture(field, content) {
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|_| MalformedField { field, raw }),
        None => Ok(None),
    }
}

/// Optional value where a malformed capture just means "absent"
fn optional_numeric(field: Field, content: &str, source_label: &str) -> Option<f64> {
    numeric_field(field, content).unwrap_or_else(|malformed| {
        warn_malformed(&malformed, source_label);
        None
    })
}

fn warn_malformed(malformed: &MalformedField<'_>, source_label: &str) {
    warn!(
        source = %source_label,
        field = ?malformed.field,
        raw = %malformed.raw,
        "Malformed numeric value, ignoring"
    );
}

fn extract_signal(
    content: &str,
    source_label: &str,
) -> Result<Option<SignalParameters>, ParseError> {
    let (frequency, amplitude) = match (
        numeric_field(Field::Frequency, content),
        numeric_field(Field::Amplitude, content),
    ) {
        (Err(malformed), _) | (_, Err(malformed)) => {
            warn_malformed(&malformed, source_label);
            return Ok(None);
        }
        (Ok(None), Ok(None)) => return Ok(None),
        (Ok(frequency), Ok(amplitude)) => (
            frequency.unwrap_or(DEFAULT_FREQUENCY_HZ),
            amplitude.unwrap_or(DEFAULT_AMPLITUDE),
        ),
    };

    let signal = SignalParameters::new(frequency, amplitude)
        .map_err(|error| structural("signal parameters", source_label, error))?
        .with_chirp_mass(optional_numeric(Field::ChirpMass, content, source_label))
        .with_distance_mpc(optional_numeric(Field::Distance, content, source_label))
        .with_snr(optional_numeric(Field::Snr, content, source_label));

    Ok(Some(signal))
}

fn extract_sky_position(
    content: &str,
    source_label: &str,
) -> Result<Option<SkyPosition>, ParseError> {
    let (right_ascension, declination) = match (
        numeric_field(Field::RightAscension, content),
        numeric_field(Field::Declination, content),
    ) {
        (Ok(Some(ra)), Ok(Some(dec))) => (ra, dec),
        (Err(malformed), _) | (_, Err(malformed)) => {
            warn_malformed(&malformed, source_label);
            return Ok(None);
        }
        _ => return Ok(None),
    };

    let uncertainty = optional_numeric(Field::Uncertainty, content, source_label).unwrap_or(0.0);

    SkyPosition::with_uncertainty(right_ascension, declination, uncertainty)
        .map(Some)
        .map_err(|error| structural("sky position", source_label, error))
}

fn extract_description(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .find(|line| {
            !line.is_empty()
                && !line.starts_with('#')
                && line.chars().count() > MIN_DESCRIPTION_CHARS
        })
        .map_or_else(
            || DEFAULT_DESCRIPTION.to_string(),
            |line| line.chars().take(MAX_DESCRIPTION_CHARS).collect(),
        )
}

/// First [`MAX_TAGS`] distinct hashtags
fn extract_tags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in hashtags(content) {
        if tags.len() == MAX_TAGS {
            break;
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn generate_id(source_label: &str) -> String {
    let stem = Path::new(source_label)
        .file_stem()
        .map_or_else(|| source_label.into(), |s| s.to_string_lossy());
    format!("{GENERATED_ID_PREFIX}{stem}")
}

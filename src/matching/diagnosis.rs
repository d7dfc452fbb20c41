use std::fmt;

use crate::core::forecast::Forecast;
use crate::core::types::Category;
use crate::parsing::rules::{DEFAULT_CONFIDENCE, DEFAULT_DESCRIPTION};

/// Windows wider than a week are suspiciously vague
pub const MAX_WINDOW_HOURS: f64 = 168.0;
pub const MIN_WINDOW_HOURS: f64 = 1.0;

/// An advisory finding about an incomplete or vague forecast
#[derive(Debug, Clone, PartialEq)]
pub enum StructureWarning {
    MissingId,
    PlaceholderDescription,
    /// Confidence equals the unset default, so it was probably never stated
    DefaultConfidence,
    WindowTooWide { hours: f64 },
    WindowTooNarrow { hours: f64 },
    MissingSignal,
    MissingSkyPosition,
}

impl fmt::Display for StructureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => write!(f, "Missing forecast ID"),
            Self::PlaceholderDescription => write!(f, "Missing or default description"),
            Self::DefaultConfidence => write!(f, "Confidence is the default value (0.5)"),
            Self::WindowTooWide { hours } => write!(
                f,
                "Event window is very wide ({hours:.1} h, more than {MAX_WINDOW_HOURS:.0} h)"
            ),
            Self::WindowTooNarrow { hours } => write!(
                f,
                "Event window is very narrow ({hours:.2} h, less than {MIN_WINDOW_HOURS:.0} h)"
            ),
            Self::MissingSignal => write!(f, "Wave-burst forecast has no signal parameters"),
            Self::MissingSkyPosition => write!(f, "Wave-burst forecast has no sky position"),
        }
    }
}

/// Inspect a forecast for incompleteness. Never fails; an empty list means
/// nothing looked off.
#[must_use]
pub fn validate_structure(forecast: &Forecast) -> Vec<StructureWarning> {
    let mut warnings = Vec::new();

    if forecast.id().trim().is_empty() {
        warnings.push(StructureWarning::MissingId);
    }

    let description = forecast.description().trim();
    if description.is_empty() || description == DEFAULT_DESCRIPTION {
        warnings.push(StructureWarning::PlaceholderDescription);
    }

    if (forecast.confidence() - DEFAULT_CONFIDENCE).abs() < f64::EPSILON {
        warnings.push(StructureWarning::DefaultConfidence);
    }

    let hours = forecast.window_hours();
    if hours > MAX_WINDOW_HOURS {
        warnings.push(StructureWarning::WindowTooWide { hours });
    } else if hours < MIN_WINDOW_HOURS {
        warnings.push(StructureWarning::WindowTooNarrow { hours });
    }

    if forecast.category() == Category::WaveBurst {
        if forecast.signal().is_none() {
            warnings.push(StructureWarning::MissingSignal);
        }
        if forecast.sky_position().is_none() {
            warnings.push(StructureWarning::MissingSkyPosition);
        }
    }

    warnings
}

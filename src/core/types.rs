use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Violation of a record-model invariant at construction or transition time.
///
/// Every variant names the invariant and carries the offending value, so a
/// caller can tell exactly which sub-field of a record was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    #[error("Right ascension must be between 0 and 360 degrees, got {0}")]
    RightAscensionOutOfRange(f64),

    #[error("Declination must be between -90 and 90 degrees, got {0}")]
    DeclinationOutOfRange(f64),

    #[error("Uncertainty radius cannot be negative, got {0}")]
    NegativeUncertainty(f64),

    #[error("Frequency must be positive, got {0}")]
    NonPositiveFrequency(f64),

    #[error("Amplitude must be positive, got {0}")]
    NonPositiveAmplitude(f64),

    #[error("Confidence must be between 0 and 1, got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("Event window end ({end}) is before its start ({start})")]
    InvertedWindow { start: String, end: String },

    #[error("Framework must be one of CIA, SIA, HIA, IIA or Experimental, got '{0}'")]
    UnknownFramework(String),

    #[error("Unknown forecast category '{0}'")]
    UnknownCategory(String),

    #[error("Cannot transition forecast from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },

    #[error("A {0} forecast must reference a matched event")]
    MissingMatchedEvent(Status),

    #[error("A {status} forecast cannot reference matched event '{event_id}'")]
    UnexpectedMatchedEvent { status: Status, event_id: String },
}

/// Kind of event a forecast predicts.
///
/// Declaration order matters: category inference walks the variants in this
/// order and the first keyword hit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Gravitational-wave burst (compact binary merger and similar)
    WaveBurst,
    /// Gamma-ray burst
    GammaBurst,
    /// Solar flare / coronal mass ejection
    Flare,
    /// Tectonic or seismic event
    Seismic,
    /// Black hole formation or collapse
    CompactCollapse,
    /// Tsunami / tidal wave
    TidalWave,
}

impl Category {
    /// All categories in inference order.
    pub const ALL: [Category; 6] = [
        Category::WaveBurst,
        Category::GammaBurst,
        Category::Flare,
        Category::Seismic,
        Category::CompactCollapse,
        Category::TidalWave,
    ];

    /// Stable short code used in digests and serialized output
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::WaveBurst => "wave_burst",
            Self::GammaBurst => "gamma_burst",
            Self::Flare => "flare",
            Self::Seismic => "seismic",
            Self::CompactCollapse => "compact_collapse",
            Self::TidalWave => "tidal_wave",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaveBurst => write!(f, "Wave burst"),
            Self::GammaBurst => write!(f, "Gamma burst"),
            Self::Flare => write!(f, "Flare"),
            Self::Seismic => write!(f, "Seismic"),
            Self::CompactCollapse => write!(f, "Compact collapse"),
            Self::TidalWave => write!(f, "Tidal wave"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = StructuralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|category| category.code() == normalized)
            .ok_or_else(|| StructuralError::UnknownCategory(s.to_string()))
    }
}

/// Analysis framework that produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "CIA")]
    Cia,
    #[serde(rename = "SIA")]
    Sia,
    #[serde(rename = "HIA")]
    Hia,
    #[serde(rename = "IIA")]
    Iia,
    /// Fallback when a document does not declare a framework
    #[default]
    Experimental,
}

impl Framework {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Cia => "CIA",
            Self::Sia => "SIA",
            Self::Hia => "HIA",
            Self::Iia => "IIA",
            Self::Experimental => "Experimental",
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Framework {
    type Err = StructuralError;

    /// Case-insensitive: `cia`, `CIA` and `Cia` all name the same framework.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cia" => Ok(Self::Cia),
            "sia" => Ok(Self::Sia),
            "hia" => Ok(Self::Hia),
            "iia" => Ok(Self::Iia),
            "experimental" => Ok(Self::Experimental),
            _ => Err(StructuralError::UnknownFramework(s.to_string())),
        }
    }
}

/// Lifecycle status of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    Validated,
    Invalidated,
    Expired,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Validated => write!(f, "validated"),
            Self::Invalidated => write!(f, "invalidated"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_from_str_is_case_insensitive() {
        assert_eq!("CIA".parse::<Framework>().unwrap(), Framework::Cia);
        assert_eq!("sia".parse::<Framework>().unwrap(), Framework::Sia);
        assert_eq!(
            "experimental".parse::<Framework>().unwrap(),
            Framework::Experimental
        );
    }

    #[test]
    fn test_framework_rejects_unknown_label() {
        let err = "XYZ".parse::<Framework>().unwrap_err();
        assert_eq!(err, StructuralError::UnknownFramework("XYZ".to_string()));
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_category_round_trips_through_code() {
        for category in Category::ALL {
            assert_eq!(category.code().parse::<Category>().unwrap(), category);
        }
        assert_eq!(
            "compact-collapse".parse::<Category>().unwrap(),
            Category::CompactCollapse
        );
        assert!("volcano".parse::<Category>().is_err());
    }

    #[test]
    fn test_framework_serde_uses_short_codes() {
        let json = serde_json::to_string(&Framework::Hia).unwrap();
        assert_eq!(json, "\"HIA\"");
        let back: Framework = serde_json::from_str("\"Experimental\"").unwrap();
        assert_eq!(back, Framework::Experimental);
    }
}

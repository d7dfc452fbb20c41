use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds in a Julian year, used for the false-alarm significance threshold
pub const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

/// An event detected by an external observatory.
///
/// Consumed read-only by the matching engine; only `time`, the sky
/// coordinates and `peak_frequency_hz` take part in matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedEvent {
    /// Registry identifier (e.g. "S230518h", "GW150914")
    pub id: String,

    /// When the event occurred
    pub time: DateTime<Utc>,

    /// Detection pipeline (e.g. "gstlal", "pycbc")
    #[serde(default = "unknown")]
    pub pipeline: String,

    /// False alarm rate in Hz
    #[serde(default = "default_far")]
    pub far: f64,

    /// Detectors that observed the event (e.g. H1, L1, V1)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instruments: Vec<String>,

    /// Source classification (e.g. BBH, BNS, NSBH)
    #[serde(default = "unknown")]
    pub event_type: String,

    /// Right ascension in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_ascension: Option<f64>,

    /// Declination in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declination: Option<f64>,

    /// Observed peak frequency in Hz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_frequency_hz: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_mpc: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snr: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chirp_mass: Option<f64>,

    /// Link back to the registry entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn unknown() -> String {
    "unknown".to_string()
}

fn default_far() -> f64 {
    1.0
}

impl ObservedEvent {
    pub fn new(id: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            time,
            pipeline: unknown(),
            far: default_far(),
            instruments: Vec::new(),
            event_type: unknown(),
            right_ascension: None,
            declination: None,
            peak_frequency_hz: None,
            distance_mpc: None,
            snr: None,
            chirp_mass: None,
            url: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, right_ascension: f64, declination: f64) -> Self {
        self.right_ascension = Some(right_ascension);
        self.declination = Some(declination);
        self
    }

    #[must_use]
    pub fn with_peak_frequency(mut self, frequency_hz: f64) -> Self {
        self.peak_frequency_hz = Some(frequency_hz);
        self
    }

    #[must_use]
    pub fn with_far(mut self, far: f64) -> Self {
        self.far = far;
        self
    }

    /// Both coordinates, or `None` if either is missing
    pub fn position(&self) -> Option<(f64, f64)> {
        self.right_ascension.zip(self.declination)
    }

    /// Fewer than one false alarm per year
    pub fn is_significant(&self) -> bool {
        self.far < 1.0 / SECONDS_PER_YEAR
    }
}

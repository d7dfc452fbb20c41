use serde::{Deserialize, Serialize};

use crate::core::types::StructuralError;

/// Signal characteristics predicted for a wave-burst forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSignalParameters")]
pub struct SignalParameters {
    /// Peak frequency in Hz
    frequency_hz: f64,

    /// Strain amplitude
    amplitude: f64,

    /// Chirp mass in solar masses
    #[serde(skip_serializing_if = "Option::is_none")]
    chirp_mass: Option<f64>,

    /// Luminosity distance in megaparsecs
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_mpc: Option<f64>,

    /// Signal-to-noise ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    snr: Option<f64>,
}

#[derive(Deserialize)]
struct RawSignalParameters {
    frequency_hz: f64,
    amplitude: f64,
    #[serde(default)]
    chirp_mass: Option<f64>,
    #[serde(default)]
    distance_mpc: Option<f64>,
    #[serde(default)]
    snr: Option<f64>,
}

impl TryFrom<RawSignalParameters> for SignalParameters {
    type Error = StructuralError;

    fn try_from(raw: RawSignalParameters) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.frequency_hz, raw.amplitude)?
            .with_chirp_mass(raw.chirp_mass)
            .with_distance_mpc(raw.distance_mpc)
            .with_snr(raw.snr))
    }
}

impl SignalParameters {
    /// # Errors
    ///
    /// Returns `NonPositiveFrequency` or `NonPositiveAmplitude` when either
    /// value is zero, negative or NaN. Values are never clamped.
    pub fn new(frequency_hz: f64, amplitude: f64) -> Result<Self, StructuralError> {
        if frequency_hz.is_nan() || frequency_hz <= 0.0 {
            return Err(StructuralError::NonPositiveFrequency(frequency_hz));
        }
        if amplitude.is_nan() || amplitude <= 0.0 {
            return Err(StructuralError::NonPositiveAmplitude(amplitude));
        }

        Ok(Self {
            frequency_hz,
            amplitude,
            chirp_mass: None,
            distance_mpc: None,
            snr: None,
        })
    }

    #[must_use]
    pub fn with_chirp_mass(mut self, chirp_mass: Option<f64>) -> Self {
        self.chirp_mass = chirp_mass;
        self
    }

    #[must_use]
    pub fn with_distance_mpc(mut self, distance_mpc: Option<f64>) -> Self {
        self.distance_mpc = distance_mpc;
        self
    }

    #[must_use]
    pub fn with_snr(mut self, snr: Option<f64>) -> Self {
        self.snr = snr;
        self
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn chirp_mass(&self) -> Option<f64> {
        self.chirp_mass
    }

    pub fn distance_mpc(&self) -> Option<f64> {
        self.distance_mpc
    }

    pub fn snr(&self) -> Option<f64> {
        self.snr
    }
}

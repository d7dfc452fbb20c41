use serde::{Deserialize, Serialize};

use crate::core::types::StructuralError;

/// A position on the celestial sphere in equatorial coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSkyPosition")]
pub struct SkyPosition {
    /// Right ascension in degrees, [0, 360]
    right_ascension: f64,

    /// Declination in degrees, [-90, 90]
    declination: f64,

    /// Radius of the uncertainty region in degrees
    uncertainty_radius: f64,
}

#[derive(Deserialize)]
struct RawSkyPosition {
    right_ascension: f64,
    declination: f64,
    #[serde(default)]
    uncertainty_radius: f64,
}

impl TryFrom<RawSkyPosition> for SkyPosition {
    type Error = StructuralError;

    fn try_from(raw: RawSkyPosition) -> Result<Self, Self::Error> {
        Self::with_uncertainty(raw.right_ascension, raw.declination, raw.uncertainty_radius)
    }
}

impl SkyPosition {
    /// Create a position with no uncertainty region
    ///
    /// # Errors
    ///
    /// Returns a `StructuralError` if either coordinate is out of range.
    pub fn new(right_ascension: f64, declination: f64) -> Result<Self, StructuralError> {
        Self::with_uncertainty(right_ascension, declination, 0.0)
    }

    /// Create a position with an uncertainty radius
    ///
    /// # Errors
    ///
    /// Returns `RightAscensionOutOfRange`, `DeclinationOutOfRange` or
    /// `NegativeUncertainty` for the first violated bound. NaN is never in range.
    pub fn with_uncertainty(
        right_ascension: f64,
        declination: f64,
        uncertainty_radius: f64,
    ) -> Result<Self, StructuralError> {
        if !(0.0..=360.0).contains(&right_ascension) {
            return Err(StructuralError::RightAscensionOutOfRange(right_ascension));
        }
        if !(-90.0..=90.0).contains(&declination) {
            return Err(StructuralError::DeclinationOutOfRange(declination));
        }
        if uncertainty_radius.is_nan() || uncertainty_radius < 0.0 {
            return Err(StructuralError::NegativeUncertainty(uncertainty_radius));
        }

        Ok(Self {
            right_ascension,
            declination,
            uncertainty_radius,
        })
    }

    pub fn right_ascension(&self) -> f64 {
        self.right_ascension
    }

    pub fn declination(&self) -> f64 {
        self.declination
    }

    pub fn uncertainty_radius(&self) -> f64 {
        self.uncertainty_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_positions() {
        assert!(SkyPosition::new(0.0, -90.0).is_ok());
        assert!(SkyPosition::new(360.0, 90.0).is_ok());
        let pos = SkyPosition::with_uncertainty(156.3, 42.7, 10.0).unwrap();
        assert!((pos.uncertainty_radius() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_coordinates() {
        assert_eq!(
            SkyPosition::new(361.0, 0.0),
            Err(StructuralError::RightAscensionOutOfRange(361.0))
        );
        assert_eq!(
            SkyPosition::new(10.0, -91.0),
            Err(StructuralError::DeclinationOutOfRange(-91.0))
        );
        assert_eq!(
            SkyPosition::with_uncertainty(10.0, 10.0, -1.0),
            Err(StructuralError::NegativeUncertainty(-1.0))
        );
        assert!(SkyPosition::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: SkyPosition =
            serde_json::from_str(r#"{"right_ascension": 10.0, "declination": 20.0}"#).unwrap();
        assert!((ok.declination() - 20.0).abs() < f64::EPSILON);

        let bad = serde_json::from_str::<SkyPosition>(
            r#"{"right_ascension": 400.0, "declination": 20.0}"#,
        );
        assert!(bad.is_err());
    }
}

/// Hours at which the time score reaches zero
pub const TIME_SCORE_HORIZON_HOURS: f64 = 48.0;

/// Degrees at which the sky score reaches zero
pub const SKY_SCORE_HORIZON_DEGREES: f64 = 90.0;

/// Percent difference at which the frequency score reaches zero
pub const FREQUENCY_SCORE_HORIZON_PERCENT: f64 = 100.0;

/// Safely convert usize to f64 for averaging
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Great-circle separation in degrees between two equatorial positions,
/// using the haversine formula.
#[must_use]
pub fn angular_separation(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let (ra1, dec1, ra2, dec2) = (
        ra1.to_radians(),
        dec1.to_radians(),
        ra2.to_radians(),
        dec2.to_radians(),
    );

    let half_dec = (dec2 - dec1) / 2.0;
    let half_ra = (ra2 - ra1) / 2.0;
    let a = half_dec.sin().powi(2) + dec1.cos() * dec2.cos() * half_ra.sin().powi(2);

    // Rounding can push `a` a hair past 1 for antipodal points
    (2.0 * a.min(1.0).sqrt().asin()).to_degrees()
}

/// Relative difference of `observed` from `predicted`, in percent.
///
/// A predicted value of exactly zero yields `f64::INFINITY`.
#[must_use]
pub fn percent_difference(predicted: f64, observed: f64) -> f64 {
    if predicted == 0.0 {
        return f64::INFINITY;
    }
    (observed - predicted).abs() / predicted * 100.0
}

fn linear_score(distance: f64, horizon: f64) -> f64 {
    (1.0 - distance / horizon).max(0.0)
}

#[must_use]
pub fn time_score(hours: f64) -> f64 {
    linear_score(hours, TIME_SCORE_HORIZON_HOURS)
}

#[must_use]
pub fn sky_score(degrees: f64) -> f64 {
    linear_score(degrees, SKY_SCORE_HORIZON_DEGREES)
}

#[must_use]
pub fn frequency_score(percent: f64) -> f64 {
    linear_score(percent, FREQUENCY_SCORE_HORIZON_PERCENT)
}

/// Mean of the per-axis scores; 0 when no axis was evaluated
#[must_use]
pub fn composite_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / count_to_f64(scores.len())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::event::ObservedEvent;
use crate::core::forecast::{hours_between, Forecast};
use crate::matching::scoring::{
    angular_separation, composite_score, frequency_score, percent_difference, sky_score,
    time_score,
};

pub const DEFAULT_TIME_TOLERANCE_HOURS: f64 = 24.0;
pub const DEFAULT_SKY_TOLERANCE_DEGREES: f64 = 30.0;
pub const DEFAULT_FREQUENCY_TOLERANCE_PERCENT: f64 = 50.0;

/// Per-axis tolerances for the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Hours an event may fall outside the forecast window
    pub time_hours: f64,
    /// Angular tolerance in degrees, added to the forecast's own uncertainty radius
    pub sky_degrees: f64,
    /// Allowed relative frequency deviation in percent
    pub frequency_percent: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            time_hours: DEFAULT_TIME_TOLERANCE_HOURS,
            sky_degrees: DEFAULT_SKY_TOLERANCE_DEGREES,
            frequency_percent: DEFAULT_FREQUENCY_TOLERANCE_PERCENT,
        }
    }
}

/// Outcome on a single axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisCheck {
    pub matched: bool,
    /// Hours, degrees or percent depending on the axis
    pub distance: f64,
}

impl AxisCheck {
    fn unconstrained() -> Self {
        Self {
            matched: true,
            distance: 0.0,
        }
    }
}

/// What the engine needs to know about an observed event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub time: DateTime<Utc>,
    /// Right ascension and declination in degrees
    pub position: Option<(f64, f64)>,
    pub frequency_hz: Option<f64>,
}

impl Observation {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            time,
            position: None,
            frequency_hz: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, right_ascension: f64, declination: f64) -> Self {
        self.position = Some((right_ascension, declination));
        self
    }

    #[must_use]
    pub fn with_frequency(mut self, frequency_hz: f64) -> Self {
        self.frequency_hz = Some(frequency_hz);
        self
    }
}

impl From<&ObservedEvent> for Observation {
    fn from(event: &ObservedEvent) -> Self {
        Self {
            time: event.time,
            position: event.position(),
            frequency_hz: event.peak_frequency_hz,
        }
    }
}

/// Result of checking one forecast against one observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub forecast_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,

    pub time: AxisCheck,

    /// Present only when the observation carried a position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sky: Option<AxisCheck>,

    /// Present only when the observation carried a frequency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<AxisCheck>,

    /// Every evaluated axis matched
    pub overall_match: bool,

    /// Mean of the evaluated axis scores, in [0, 1]
    pub score: f64,
}

/// Compares forecasts against observations.
///
/// The engine only reports verdicts; committing a forecast's lifecycle
/// transition is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    tolerances: Tolerances,
}

impl MatchEngine {
    /// Create an engine with default tolerances
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Inside the window (inclusive) the distance is measured from the window
    /// midpoint and always matches; outside it is the distance to the nearest
    /// edge and matches within the time tolerance.
    pub fn check_time(&self, forecast: &Forecast, time: DateTime<Utc>) -> AxisCheck {
        let start = forecast.window_start();
        let end = forecast.window_end();

        if forecast.is_within_window(time) {
            let midpoint = start + (end - start) / 2;
            return AxisCheck {
                matched: true,
                distance: hours_between(midpoint, time),
            };
        }

        let distance = hours_between(time, start).min(hours_between(time, end));
        AxisCheck {
            matched: distance <= self.tolerances.time_hours,
            distance,
        }
    }

    /// Unconstrained when the forecast has no position. Otherwise the sky
    /// tolerance and the forecast's uncertainty radius add up.
    pub fn check_sky(
        &self,
        forecast: &Forecast,
        right_ascension: f64,
        declination: f64,
    ) -> AxisCheck {
        let Some(sky) = forecast.sky_position() else {
            return AxisCheck::unconstrained();
        };

        let separation = angular_separation(
            sky.right_ascension(),
            sky.declination(),
            right_ascension,
            declination,
        );
        AxisCheck {
            matched: separation <= self.tolerances.sky_degrees + sky.uncertainty_radius(),
            distance: separation,
        }
    }

    /// Unconstrained when the forecast has no signal parameters
    pub fn check_frequency(&self, forecast: &Forecast, frequency_hz: f64) -> AxisCheck {
        let Some(signal) = forecast.signal() else {
            return AxisCheck::unconstrained();
        };

        let difference = percent_difference(signal.frequency_hz(), frequency_hz);
        AxisCheck {
            matched: difference <= self.tolerances.frequency_percent,
            distance: difference,
        }
    }

    /// Check every axis the observation has data for
    pub fn evaluate(&self, forecast: &Forecast, observation: &Observation) -> MatchResult {
        let time = self.check_time(forecast, observation.time);
        let sky = observation
            .position
            .map(|(ra, dec)| self.check_sky(forecast, ra, dec));
        let frequency = observation
            .frequency_hz
            .map(|hz| self.check_frequency(forecast, hz));

        let mut scores = vec![time_score(time.distance)];
        scores.extend(sky.map(|check| sky_score(check.distance)));
        scores.extend(frequency.map(|check| frequency_score(check.distance)));

        let overall_match =
            time.matched && sky.map_or(true, |c| c.matched) && frequency.map_or(true, |c| c.matched);

        MatchResult {
            forecast_id: forecast.id().to_string(),
            event_id: None,
            time,
            sky,
            frequency,
            overall_match,
            score: composite_score(&scores),
        }
    }

    pub fn evaluate_event(&self, forecast: &Forecast, event: &ObservedEvent) -> MatchResult {
        MatchResult {
            event_id: Some(event.id.clone()),
            ..self.evaluate(forecast, &Observation::from(event))
        }
    }

    /// Evaluate against each event, in input order
    pub fn evaluate_all(&self, forecast: &Forecast, events: &[ObservedEvent]) -> Vec<MatchResult> {
        events
            .iter()
            .map(|event| self.evaluate_event(forecast, event))
            .collect()
    }

    /// Matching events ranked by score, best first; ties keep input order
    pub fn find_matches(
        &self,
        forecast: &Forecast,
        events: &[ObservedEvent],
        limit: usize,
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = self
            .evaluate_all(forecast, events)
            .into_iter()
            .filter(|r| r.overall_match)
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(limit);
        results
    }

    /// Find the single best match
    pub fn find_best_match(
        &self,
        forecast: &Forecast,
        events: &[ObservedEvent],
    ) -> Option<MatchResult> {
        self.find_matches(forecast, events, 1).into_iter().next()
    }
}

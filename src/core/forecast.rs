use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::signal::SignalParameters;
use crate::core::sky::SkyPosition;
use crate::core::types::{Category, Framework, Status, StructuralError};

/// A structured, validated prediction record.
///
/// Only [`ForecastBuilder::build`] (and deserialization, which goes through the
/// same checks) can create one. Afterwards only the lifecycle fields can change,
/// through [`Forecast::mark_validated`] and [`Forecast::mark_invalidated`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawForecast")]
pub struct Forecast {
    id: String,
    category: Category,
    created_at: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    framework: Framework,
    confidence: f64,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sky_position: Option<SkyPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signal: Option<SignalParameters>,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched_event_id: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    tags: BTreeSet<String>,
}

impl Forecast {
    /// Start building a forecast for the given event window
    pub fn builder(
        id: impl Into<String>,
        category: Category,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> ForecastBuilder {
        ForecastBuilder::new(id, category, window_start, window_end)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn window_start(&self) -> DateTime<Utc> {
        self.window_start
    }

    pub fn window_end(&self) -> DateTime<Utc> {
        self.window_end
    }

    pub fn framework(&self) -> Framework {
        self.framework
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn sky_position(&self) -> Option<&SkyPosition> {
        self.sky_position.as_ref()
    }

    pub fn signal(&self) -> Option<&SignalParameters> {
        self.signal.as_ref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn matched_event_id(&self) -> Option<&str> {
        self.matched_event_id.as_deref()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Check if an event time falls within the window (both ends inclusive)
    pub fn is_within_window(&self, event_time: DateTime<Utc>) -> bool {
        self.window_start <= event_time && event_time <= self.window_end
    }

    /// Window duration in hours
    pub fn window_hours(&self) -> f64 {
        hours_between(self.window_start, self.window_end)
    }

    /// Record that an observed event confirmed this forecast.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the forecast is still pending.
    pub fn mark_validated(&mut self, event_id: impl Into<String>) -> Result<(), StructuralError> {
        self.transition(Status::Validated)?;
        self.matched_event_id = Some(event_id.into());
        Ok(())
    }

    /// Record that no observed event confirmed this forecast.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the forecast is still pending.
    pub fn mark_invalidated(&mut self) -> Result<(), StructuralError> {
        self.transition(Status::Invalidated)?;
        self.matched_event_id = None;
        Ok(())
    }

    fn transition(&mut self, to: Status) -> Result<(), StructuralError> {
        if self.status != Status::Pending {
            return Err(StructuralError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Absolute number of hours between two instants
pub(crate) fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        (to - from).num_milliseconds().abs() as f64 / 3_600_000.0
    }
}

/// Builder for [`Forecast`]; all invariants are checked in [`ForecastBuilder::build`]
#[derive(Debug, Clone)]
pub struct ForecastBuilder {
    id: String,
    category: Category,
    created_at: Option<DateTime<Utc>>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    framework: Framework,
    confidence: f64,
    description: String,
    sky_position: Option<SkyPosition>,
    signal: Option<SignalParameters>,
    tags: BTreeSet<String>,
}

impl ForecastBuilder {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            created_at: None,
            window_start,
            window_end,
            framework: Framework::Experimental,
            confidence: 0.5,
            description: String::new(),
            sky_position: None,
            signal: None,
            tags: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub fn window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.window_start = start;
        self.window_end = end;
        self
    }

    #[must_use]
    pub fn framework(mut self, framework: Framework) -> Self {
        self.framework = framework;
        self
    }

    #[must_use]
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn sky_position(mut self, sky_position: Option<SkyPosition>) -> Self {
        self.sky_position = sky_position;
        self
    }

    #[must_use]
    pub fn signal(mut self, signal: Option<SignalParameters>) -> Self {
        self.signal = signal;
        self
    }

    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and produce a pending forecast.
    ///
    /// # Errors
    ///
    /// Returns `ConfidenceOutOfRange` or `InvertedWindow`.
    pub fn build(self) -> Result<Forecast, StructuralError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(StructuralError::ConfidenceOutOfRange(self.confidence));
        }
        if self.window_end < self.window_start {
            return Err(StructuralError::InvertedWindow {
                start: self.window_start.to_rfc3339(),
                end: self.window_end.to_rfc3339(),
            });
        }

        Ok(Forecast {
            id: self.id,
            category: self.category,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            window_start: self.window_start,
            window_end: self.window_end,
            framework: self.framework,
            confidence: self.confidence,
            description: self.description,
            sky_position: self.sky_position,
            signal: self.signal,
            status: Status::Pending,
            matched_event_id: None,
            tags: self.tags,
        })
    }
}

impl From<&Forecast> for ForecastBuilder {
    /// Start from an existing forecast's claim; lifecycle state is not carried over
    fn from(forecast: &Forecast) -> Self {
        Self {
            id: forecast.id.clone(),
            category: forecast.category,
            created_at: Some(forecast.created_at),
            window_start: forecast.window_start,
            window_end: forecast.window_end,
            framework: forecast.framework,
            confidence: forecast.confidence,
            description: forecast.description.clone(),
            sky_position: forecast.sky_position,
            signal: forecast.signal.clone(),
            tags: forecast.tags.clone(),
        }
    }
}

#[derive(Deserialize)]
struct RawForecast {
    id: String,
    category: Category,
    created_at: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    framework: String,
    confidence: f64,
    description: String,
    #[serde(default)]
    sky_position: Option<SkyPosition>,
    #[serde(default)]
    signal: Option<SignalParameters>,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    matched_event_id: Option<String>,
    #[serde(default)]
    tags: BTreeSet<String>,
}

impl TryFrom<RawForecast> for Forecast {
    type Error = StructuralError;

    fn try_from(raw: RawForecast) -> Result<Self, Self::Error> {
        let mut forecast = ForecastBuilder::new(
            raw.id,
            raw.category,
            raw.window_start,
            raw.window_end,
        )
        .created_at(raw.created_at)
        .framework(raw.framework.parse()?)
        .confidence(raw.confidence)
        .description(raw.description)
        .sky_position(raw.sky_position)
        .signal(raw.signal)
        .tags(raw.tags)
        .build()?;

        // Stored records may already be past pending; only validated ones
        // carry a matched event
        match (raw.status, raw.matched_event_id) {
            (Status::Validated, None) => {
                return Err(StructuralError::MissingMatchedEvent(Status::Validated))
            }
            (Status::Validated, Some(event_id)) => forecast.matched_event_id = Some(event_id),
            (_, None) => {}
            (status, Some(event_id)) => {
                return Err(StructuralError::UnexpectedMatchedEvent { status, event_id })
            }
        }
        forecast.status = raw.status;
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

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
        .framework(Framework::Cia)
        .confidence(0.85)
        .description("Binary black hole merger predicted")
        .build()
        .unwrap()
    }

    #[test]
    fn test_build_defaults_to_pending() {
        let forecast = make_forecast();
        assert_eq!(forecast.status(), Status::Pending);
        assert_eq!(forecast.matched_event_id(), None);
        assert!((forecast.window_hours() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_out_of_range() {
        let result = Forecast::builder("X", Category::Flare, jan15(), jan15())
            .confidence(1.5)
            .build();
        assert_eq!(result, Err(StructuralError::ConfidenceOutOfRange(1.5)));

        let result = Forecast::builder("X", Category::Flare, jan15(), jan15())
            .confidence(-0.1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let result = Forecast::builder(
            "X",
            Category::Flare,
            jan15(),
            jan15() - Duration::hours(1),
        )
        .build();
        assert!(matches!(
            result,
            Err(StructuralError::InvertedWindow { .. })
        ));
    }

    #[test]
    fn test_zero_length_window_allowed() {
        let forecast = Forecast::builder("X", Category::Flare, jan15(), jan15())
            .build()
            .unwrap();
        assert!(forecast.is_within_window(jan15()));
        assert!(forecast.window_hours().abs() < f64::EPSILON);
    }

    #[test]
    fn test_is_within_window_inclusive() {
        let forecast = make_forecast();
        assert!(forecast.is_within_window(jan15()));
        assert!(forecast.is_within_window(jan15() + Duration::hours(24)));
        assert!(!forecast.is_within_window(jan15() - Duration::seconds(1)));
        assert!(!forecast.is_within_window(jan15() + Duration::hours(25)));
    }

    #[test]
    fn test_mark_validated() {
        let mut forecast = make_forecast();
        forecast.mark_validated("S250115a").unwrap();
        assert_eq!(forecast.status(), Status::Validated);
        assert_eq!(forecast.matched_event_id(), Some("S250115a"));
    }

    #[test]
    fn test_mark_invalidated() {
        let mut forecast = make_forecast();
        forecast.mark_invalidated().unwrap();
        assert_eq!(forecast.status(), Status::Invalidated);
        assert_eq!(forecast.matched_event_id(), None);
    }

    #[test]
    fn test_second_transition_is_rejected() {
        let mut forecast = make_forecast();
        forecast.mark_validated("S250115a").unwrap();

        let err = forecast.mark_invalidated().unwrap_err();
        assert_eq!(
            err,
            StructuralError::InvalidTransition {
                from: Status::Validated,
                to: Status::Invalidated,
            }
        );
        // State is untouched by the rejected attempt
        assert_eq!(forecast.status(), Status::Validated);
        assert_eq!(forecast.matched_event_id(), Some("S250115a"));
    }

    #[test]
    fn test_rebuild_from_existing_revalidates() {
        let forecast = make_forecast();
        let amended = ForecastBuilder::from(&forecast)
            .description("Amended claim")
            .build()
            .unwrap();
        assert_eq!(amended.id(), forecast.id());
        assert_eq!(amended.created_at(), forecast.created_at());
        assert_eq!(amended.description(), "Amended claim");

        let invalid = ForecastBuilder::from(&forecast).confidence(2.0).build();
        assert!(invalid.is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_lifecycle() {
        let mut forecast = make_forecast();
        forecast.mark_validated("S250115a").unwrap();

        let json = serde_json::to_string(&forecast).unwrap();
        let back: Forecast = serde_json::from_str(&json).unwrap();
        assert_eq!(back, forecast);
    }

    #[test]
    fn test_deserialize_rejects_unknown_framework() {
        let forecast = make_forecast();
        let json = serde_json::to_string(&forecast)
            .unwrap()
            .replace("\"CIA\"", "\"XYZ\"");
        let err = serde_json::from_str::<Forecast>(&json).unwrap_err();
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_lifecycle() {
        let stored = |status: &str, event: Option<&str>| {
            let mut value = serde_json::to_value(make_forecast()).unwrap();
            value["status"] = serde_json::json!(status);
            value["matched_event_id"] = serde_json::json!(event);
            serde_json::from_value::<Forecast>(value)
        };

        let err = stored("pending", Some("S250115a")).unwrap_err();
        assert!(err.to_string().contains("cannot reference matched event 'S250115a'"));
        assert!(stored("invalidated", Some("S250115a")).is_err());
        assert!(stored("expired", Some("S250115a")).is_err());

        let err = stored("validated", None).unwrap_err();
        assert!(err.to_string().contains("must reference a matched event"));

        assert_eq!(stored("validated", Some("S1")).unwrap().matched_event_id(), Some("S1"));
        assert_eq!(stored("expired", None).unwrap().status(), Status::Expired);
    }
}

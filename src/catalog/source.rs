use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::core::event::ObservedEvent;

/// Result count used when a caller does not pick one
pub const DEFAULT_EVENT_LIMIT: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Event not found: {0}")]
    NotFound(String),

    /// Never produced by the offline catalog; live registry clients
    /// report transport failures with it.
    #[error("Event source unavailable: {0}")]
    Unavailable(String),
}

/// Supplier of observed events.
///
/// Implementations own fetching, filtering and truncation; retries and
/// timeouts, if any, belong to them as well.
pub trait EventSource {
    /// Events with `start <= time <= end` (either bound optional), at most `limit`
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the source cannot be queried.
    fn events(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<ObservedEvent>, SourceError>;

    /// Exactly one event by identifier
    ///
    /// # Errors
    ///
    /// Returns `SourceError::NotFound` if no event has this identifier.
    fn event(&self, id: &str) -> Result<ObservedEvent, SourceError>;

    /// Events in a window of `window_hours` centered on `center`.
    ///
    /// A bound that falls outside the representable time range is dropped,
    /// leaving that side of the window open.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`EventSource::events`].
    fn events_around(
        &self,
        center: DateTime<Utc>,
        window_hours: f64,
    ) -> Result<Vec<ObservedEvent>, SourceError> {
        #[allow(clippy::cast_possible_truncation)]
        let half = Duration::try_milliseconds((window_hours * 1_800_000.0).round() as i64);
        let start = half.and_then(|h| center.checked_sub_signed(h));
        let end = half.and_then(|h| center.checked_add_signed(h));
        self.events(start, end, DEFAULT_EVENT_LIMIT)
    }
}

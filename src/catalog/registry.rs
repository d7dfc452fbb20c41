//! Mapping of registry "superevent" JSON into [`ObservedEvent`]s.
//!
//! Registry payloads are loosely typed: times arrive as GPS seconds or as
//! ISO strings, and numeric fields are sometimes strings. Records that cannot
//! be mapped are skipped with a warning rather than failing the whole list.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::core::event::ObservedEvent;

/// 1980-01-06T00:00:00Z as a Unix timestamp
pub const GPS_EPOCH_UNIX_SECONDS: i64 = 315_964_800;

/// GPS-UTC offset applied to every conversion
pub const GPS_LEAP_SECONDS: f64 = 18.0;

pub const UNKNOWN_EVENT_ID: &str = "UNKNOWN";

/// Keys checked for the event time, in priority order
const TIME_KEYS: [&str; 3] = ["t_0", "gpstime", "created"];

/// Naive layouts accepted after RFC 3339 fails; read as UTC
const NAIVE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Superevent is not a JSON object")]
    NotAnObject,

    #[error("Superevent has no usable time field")]
    MissingTime,

    #[error("Unrecognized superevent time: {0}")]
    InvalidTime(String),

    #[error("Invalid false alarm rate: {0}")]
    InvalidFar(String),
}

/// Convert GPS seconds to UTC
pub fn gps_to_utc(gps_seconds: f64) -> Option<DateTime<Utc>> {
    #[allow(clippy::cast_precision_loss)]
    let unix_seconds = GPS_EPOCH_UNIX_SECONDS as f64 + gps_seconds - GPS_LEAP_SECONDS;
    if !unix_seconds.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = (unix_seconds * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
}

/// Parse an ISO-like time string: RFC 3339 (`Z` or offset), or a naive
/// timestamp with an optional trailing ` UTC`
pub fn parse_time_string(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = trimmed.strip_suffix(" UTC").unwrap_or(trimmed);
    NAIVE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .map(|parsed| parsed.and_utc())
}

/// Number, or a string holding one; anything else is `None`
pub fn lenient_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Null, false, zero and empty strings do not count as present
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn present_str<'v>(data: &'v Value, key: &str) -> Option<&'v str> {
    data.get(key)
        .filter(|v| is_present(v))
        .and_then(Value::as_str)
}

fn event_time(data: &Value) -> Result<DateTime<Utc>, RegistryError> {
    let value = TIME_KEYS
        .iter()
        .filter_map(|key| data.get(key))
        .find(|value| is_present(value))
        .ok_or(RegistryError::MissingTime)?;

    let time = match value {
        Value::Number(number) => number.as_f64().and_then(gps_to_utc),
        Value::String(text) => parse_time_string(text),
        _ => None,
    };
    time.ok_or_else(|| RegistryError::InvalidTime(value.to_string()))
}

fn false_alarm_rate(data: &Value) -> Result<f64, RegistryError> {
    match data.get("far") {
        None | Some(Value::Null) => Ok(1.0),
        Some(value) => {
            lenient_float(Some(value)).ok_or_else(|| RegistryError::InvalidFar(value.to_string()))
        }
    }
}

/// Map one superevent object
///
/// # Errors
///
/// Returns a `RegistryError` if the object has no parseable time or a
/// non-numeric false alarm rate.
pub fn superevent_from_json(data: &Value) -> Result<ObservedEvent, RegistryError> {
    if !data.is_object() {
        return Err(RegistryError::NotAnObject);
    }

    let id = present_str(data, "superevent_id")
        .or_else(|| present_str(data, "graceid"))
        .unwrap_or(UNKNOWN_EVENT_ID);

    let mut event = ObservedEvent::new(id, event_time(data)?);
    event.far = false_alarm_rate(data)?;

    if let Some(pipeline) = data.get("pipeline").and_then(Value::as_str) {
        event.pipeline = pipeline.to_string();
    }
    if let Some(group) = data.get("group").and_then(Value::as_str) {
        event.event_type = group.to_string();
    }
    if let Some(instruments) = present_str(data, "instruments") {
        event.instruments = instruments
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
    }

    event.right_ascension = lenient_float(data.get("ra"));
    event.declination = lenient_float(data.get("dec"));
    event.distance_mpc = lenient_float(data.get("distance"));
    event.snr = lenient_float(data.get("snr"));
    event.chirp_mass = lenient_float(data.get("chirp_mass"));
    event.peak_frequency_hz = lenient_float(data.get("peak_frequency"));
    event.url = data
        .pointer("/links/self")
        .and_then(Value::as_str)
        .map(String::from);

    Ok(event)
}

/// Map every entry of a `"superevents"` array, skipping malformed ones
pub fn superevents_from_json(data: &Value) -> Vec<ObservedEvent> {
    let Some(items) = data.get("superevents").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match superevent_from_json(item) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed superevent");
                None
            }
        })
        .collect()
}

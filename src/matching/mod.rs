//! Forecast-versus-event matching and scoring.
//!
//! - [`MatchEngine`](engine::MatchEngine): checks a forecast against observations
//! - [`scoring`]: angular separation, percent difference and per-axis scores
//! - [`validate_structure`](diagnosis::validate_structure): advisory completeness checks
//!
//! ## Matching Algorithm
//!
//! Each axis is checked independently against its tolerance:
//!
//! 1. **Time**: inside the window always matches (distance from the midpoint);
//!    outside, the distance to the nearest edge must be within tolerance
//! 2. **Sky**: haversine separation within tolerance plus the forecast's uncertainty radius
//! 3. **Frequency**: percent difference from the predicted peak frequency
//!
//! Time is always evaluated; sky and frequency only when the observation
//! carries those values. The overall verdict is the AND of the evaluated axes.
//!
//! ## Scoring
//!
//! | Axis | Score |
//! |------|-------|
//! | Time | `max(0, 1 - hours / 48)` |
//! | Sky | `max(0, 1 - degrees / 90)` |
//! | Frequency | `max(0, 1 - percent / 100)` |
//!
//! The composite score is the mean over evaluated axes.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use forecast_match::{Category, Forecast, MatchEngine};
//! use forecast_match::matching::engine::Observation;
//!
//! let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
//! let forecast = Forecast::builder("F-1", Category::WaveBurst, start, start + Duration::hours(24))
//!     .build()
//!     .unwrap();
//!
//! let engine = MatchEngine::new();
//! let result = engine.evaluate(&forecast, &Observation::at(start + Duration::hours(6)));
//! assert!(result.overall_match);
//! ```

pub mod diagnosis;
pub mod engine;
pub mod scoring;

pub use diagnosis::StructureWarning;

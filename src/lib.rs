//! # forecast-match
//!
//! A library for turning free-form prediction documents into structured
//! forecasts and checking them against observed events.
//!
//! A prediction might read "Framework: CIA, Confidence: 85%, Date: 01/15/2025,
//! RA: 180.5, Dec: 30.2". `forecast-match` extracts that into a validated
//! [`Forecast`], fingerprints the claim so later edits can be detected, and
//! scores candidate events on time, sky position and frequency.
//!
//! ## Features
//!
//! - **Forgiving extraction**: Missing or malformed fields fall back to defaults
//! - **Strict records**: Out-of-range values are rejected, never clamped
//! - **Tamper evidence**: SHA-256 digest of the claim, stable across validation
//! - **Multi-axis matching**: Independent time, sky and frequency tolerances
//! - **Composite scoring**: Mean of per-axis scores over the axes evaluated
//! - **Offline catalogs**: Native event lists or saved registry superevent responses
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use forecast_match::{MatchEngine, ObservedEvent};
//! use forecast_match::integrity::verifier::forecast_digest;
//! use forecast_match::parsing::extractor::parse_content;
//!
//! let text = "Framework: CIA\nConfidence: 85%\nDate: 01/15/2025\nRA: 180.5\nDec: 30.2\n\
//!             Binary black hole merger expected";
//! let mut forecast = parse_content(text, "prediction.md").unwrap();
//! let digest = forecast_digest(&forecast);
//!
//! let event = ObservedEvent::new("S250115a", Utc.with_ymd_and_hms(2025, 1, 15, 6, 0, 0).unwrap())
//!     .with_position(182.0, 31.5);
//!
//! let engine = MatchEngine::new();
//! if let Some(best) = engine.find_best_match(&forecast, &[event]) {
//!     println!("{:?}: {:.1}%", best.event_id, best.score * 100.0);
//!     forecast.mark_validated(best.event_id.unwrap()).unwrap();
//! }
//!
//! // Validation does not change what was claimed
//! assert_eq!(forecast_digest(&forecast), digest);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Forecast, sky position, signal and event types
//! - [`parsing`]: Text extraction rules and the extractor
//! - [`integrity`]: Digests and verification records
//! - [`matching`]: Matching engine, scoring and structural checks
//! - [`catalog`]: Event sources and the offline event catalog
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod integrity;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::source::EventSource;
pub use catalog::store::EventCatalog;
pub use core::event::ObservedEvent;
pub use core::forecast::{Forecast, ForecastBuilder};
pub use core::signal::SignalParameters;
pub use core::sky::SkyPosition;
pub use core::types::*;
pub use matching::engine::{MatchEngine, MatchResult, Tolerances};

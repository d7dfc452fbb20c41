//! Turning free-form prediction text into [`Forecast`](crate::core::forecast::Forecast) records.
//!
//! Extraction is pattern-driven and forgiving: a missing or malformed field
//! falls back to a default instead of failing the whole document. Only empty
//! input and values that break a record invariant are errors.
//!
//! ## Example
//!
//! ```rust
//! use forecast_match::parsing::extractor::parse_content;
//!
//! let text = "Framework: CIA\nConfidence: 85%\nDate: 01/15/2025\nLIGO merger expected";
//! let forecast = parse_content(text, "prediction.md").unwrap();
//! assert_eq!(forecast.id(), "PRED-prediction");
//! ```
//!
//! ## Recognized Fields
//!
//! | Field | Example | Default |
//! |-------|---------|---------|
//! | Identifier | `ID: GW-07`, `Simulation #28` | `PRED-<file stem>` |
//! | Framework | `Framework: CIA` | Experimental |
//! | Confidence | `Confidence: 85%`, `0.85`, `85` | 0.5 |
//! | Date | `01/15/2025`, `12-25-25`, `2025-01-15` | now |
//! | Frequency / Amplitude | `Frequency: 120 Hz`, `Amplitude: 2e-21` | 100 Hz / 1e-21 |
//! | RA / Dec | `RA: 180.5`, `Dec: -30.2` | none |
//! | Tags | `#merger` | none |

pub mod date;
pub mod extractor;
pub mod rules;

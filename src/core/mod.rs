//! Core data types for forecasts and observed events.
//!
//! - [`Forecast`](forecast::Forecast): A validated prediction record with a lifecycle status
//! - [`SkyPosition`](sky::SkyPosition): Equatorial coordinates with an uncertainty radius
//! - [`SignalParameters`](signal::SignalParameters): Predicted signal frequency and amplitude
//! - [`ObservedEvent`](event::ObservedEvent): An event reported by an observatory
//! - [`Category`](types::Category), [`Framework`](types::Framework), [`Status`](types::Status):
//!   Closed classification types
//!
//! Every constructor checks its invariants and returns a
//! [`StructuralError`](types::StructuralError) naming the violated bound and the
//! offending value. Values are never clamped into range.
//!
//! ## Lifecycle
//!
//! | From | To | Via |
//! |------|----|-----|
//! | pending | validated | `mark_validated(event_id)` |
//! | pending | invalidated | `mark_invalidated()` |
//!
//! Any other transition is rejected with `InvalidTransition`.

pub mod event;
pub mod forecast;
pub mod signal;
pub mod sky;
pub mod types;

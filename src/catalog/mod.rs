//! Sources of observed events.
//!
//! Matching consumes plain [`ObservedEvent`](crate::core::event::ObservedEvent)
//! values through the [`EventSource`](source::EventSource) trait. This crate
//! ships an offline implementation, [`EventCatalog`](store::EventCatalog),
//! loaded from JSON; a live registry client would implement the same trait.
//!
//! ## Catalog Layouts
//!
//! Two JSON layouts are accepted:
//!
//! ```json
//! {"version": "1.0.0", "events": [{"id": "S250115a", "time": "2025-01-15T06:00:00Z"}]}
//! ```
//!
//! or a saved registry response, mapped by [`registry`]:
//!
//! ```json
//! {"superevents": [{"superevent_id": "S250115a", "t_0": 1420956018.0, "ra": 182.0, "dec": 31.5}]}
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use forecast_match::catalog::source::EventSource;
//! use forecast_match::EventCatalog;
//! use std::path::Path;
//!
//! let catalog = EventCatalog::load_from_file(Path::new("events.json")).unwrap();
//! let event = catalog.event("S250115a").unwrap();
//! println!("{} at {}", event.id, event.time);
//! ```

pub mod registry;
pub mod source;
pub mod store;

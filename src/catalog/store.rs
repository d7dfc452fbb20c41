use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::registry::superevents_from_json;
use crate::catalog::source::{EventSource, SourceError};
use crate::core::event::ObservedEvent;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    #[serde(default)]
    pub created_at: String,
    pub events: Vec<ObservedEvent>,
}

/// Offline event source held in memory, ordered by event time
#[derive(Debug, Clone)]
pub struct EventCatalog {
    events: Vec<ObservedEvent>,

    /// Index: event ID -> index in events vec
    id_to_index: HashMap<String, usize>,
}

impl EventCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            id_to_index: HashMap::new(),
        }
    }

    /// Load catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ReadError` if the file cannot be read, or
    /// `CatalogError::ParseError` if it is not a valid catalog.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a catalog from JSON.
    ///
    /// Accepts the native `{"version", "events"}` layout or a registry
    /// response with a `"superevents"` array.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` if the JSON is invalid or matches
    /// neither layout.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(json)?;

        let events = if value.get("superevents").is_some() {
            let events = superevents_from_json(&value);
            debug!(count = events.len(), "Loaded registry superevents");
            events
        } else {
            let data: CatalogData = serde_json::from_value(value)?;
            // Version check (warn but don't fail)
            if data.version != CATALOG_VERSION {
                warn!(
                    expected = CATALOG_VERSION,
                    found = %data.version,
                    "Catalog version mismatch"
                );
            }
            data.events
        };

        Ok(Self::from_events(events))
    }

    /// Build a catalog from events in any order; equal times keep input order
    pub fn from_events(mut events: Vec<ObservedEvent>) -> Self {
        events.sort_by_key(|e| e.time);
        let mut catalog = Self {
            events,
            id_to_index: HashMap::new(),
        };
        catalog.rebuild_index();
        catalog
    }

    /// Add an event, keeping time order; equal times keep insertion order
    pub fn add_event(&mut self, event: ObservedEvent) {
        let position = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(position, event);
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.id_to_index.clear();
        for (index, event) in self.events.iter().enumerate() {
            self.id_to_index.entry(event.id.clone()).or_insert(index);
        }
    }

    /// Get an event by ID
    pub fn get(&self, id: &str) -> Option<&ObservedEvent> {
        self.id_to_index.get(id).map(|&idx| &self.events[idx])
    }

    /// All events, earliest first
    pub fn all(&self) -> &[ObservedEvent] {
        &self.events
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: Utc::now().to_rfc3339(),
            events: self.events.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of events in catalog
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for EventCatalog {
    fn events(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<ObservedEvent>, SourceError> {
        Ok(self
            .events
            .iter()
            .filter(|e| start.map_or(true, |s| e.time >= s))
            .filter(|e| end.map_or(true, |t| e.time <= t))
            .take(limit)
            .cloned()
            .collect())
    }

    fn event(&self, id: &str) -> Result<ObservedEvent, SourceError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}

//! Declarative extraction rules.
//!
//! Each extractable field maps to one case-insensitive pattern whose first
//! capture group is the raw value. Category inference uses an ordered keyword
//! table. Both tables are compiled once and never mutated.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::core::types::{Category, Framework};

/// Identifier prefix for forecasts without an explicit id
pub const GENERATED_ID_PREFIX: &str = "PRED-";
pub const DEFAULT_FRAMEWORK: Framework = Framework::Experimental;
pub const DEFAULT_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_CATEGORY: Category = Category::WaveBurst;
pub const DEFAULT_FREQUENCY_HZ: f64 = 100.0;
pub const DEFAULT_AMPLITUDE: f64 = 1e-21;
pub const DEFAULT_WINDOW_HOURS: i64 = 24;
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// A description line must be longer than this many characters
pub const MIN_DESCRIPTION_CHARS: usize = 10;
pub const MAX_DESCRIPTION_CHARS: usize = 200;
pub const MAX_TAGS: usize = 10;

/// A field the extractor knows how to recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Identifier,
    Framework,
    Confidence,
    Frequency,
    Amplitude,
    ChirpMass,
    Distance,
    Snr,
    RightAscension,
    Declination,
    Uncertainty,
    Date,
}

/// One recognizer: the field and the pattern whose first group captures it
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub pattern: &'static str,
}

pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Identifier,
        pattern: r"\b(?:id|simulation)\b[:\s#]*([A-Za-z0-9\-_]+)",
    },
    FieldRule {
        field: Field::Framework,
        pattern: r"\bframework[:\s]+(CIA|SIA|HIA|IIA|Experimental)\b",
    },
    FieldRule {
        field: Field::Confidence,
        pattern: r"\bconfidence[:\s]+([0-9.]+\s*%?)",
    },
    FieldRule {
        field: Field::Frequency,
        pattern: r"\bfrequency[:\s]+([0-9.]+)\s*(?:hz)?",
    },
    FieldRule {
        field: Field::Amplitude,
        pattern: r"\bamplitude[:\s]+([0-9.e\-+]+)",
    },
    FieldRule {
        field: Field::ChirpMass,
        pattern: r"\bchirp\s*mass[:\s]+([0-9.]+)",
    },
    FieldRule {
        field: Field::Distance,
        pattern: r"\bdistance[:\s]+([0-9.]+)\s*(?:mpc)?",
    },
    FieldRule {
        field: Field::Snr,
        pattern: r"\bsnr[:\s]+([0-9.]+)",
    },
    FieldRule {
        field: Field::RightAscension,
        pattern: r"\b(?:ra|right\s*ascension)\b[:\s]+([0-9.]+)",
    },
    FieldRule {
        field: Field::Declination,
        pattern: r"\b(?:dec|declination)\b[:\s]+([0-9.\-+]+)",
    },
    FieldRule {
        field: Field::Uncertainty,
        pattern: r"\buncertainty(?:\s*radius)?[:\s]+([0-9.]+)",
    },
    FieldRule {
        field: Field::Date,
        pattern: r"\b([0-9]{4}-[0-9]{1,2}-[0-9]{1,2}|[0-9]{1,2}[/\-][0-9]{1,2}[/\-][0-9]{2,4})\b",
    },
];

/// Keywords per category, in inference order
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::WaveBurst,
        &["gravitational", "gw", "ligo", "merger", "binary"],
    ),
    (Category::GammaBurst, &["gamma", "grb", "burst"]),
    (Category::Flare, &["solar", "flare", "cme", "sun"]),
    (
        Category::Seismic,
        &["tectonic", "earthquake", "seismic", "quake"],
    ),
    (
        Category::CompactCollapse,
        &["black hole", "blackhole", "event horizon"],
    ),
    (Category::TidalWave, &["tsunami", "tidal wave"]),
];

static COMPILED_RULES: Lazy<HashMap<Field, Regex>> = Lazy::new(|| {
    FIELD_RULES
        .iter()
        .map(|rule| {
            let regex = RegexBuilder::new(rule.pattern)
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|e| panic!("invalid pattern for {:?}: {e}", rule.field));
            (rule.field, regex)
        })
        .collect()
});

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#(\w+)").expect("tag pattern is valid"));

/// Raw text of the first match for a field, trimmed
pub fn capture<'t>(field: Field, text: &'t str) -> Option<&'t str> {
    COMPILED_RULES
        .get(&field)?
        .captures(text)?
        .get(1)
        .map(|m| m.as_str().trim())
}

/// Every `#word` token in order of appearance
pub fn hashtags(text: &str) -> impl Iterator<Item = &str> {
    TAG_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
}

/// First category (in enum order) with any keyword present; `None` if no hit
pub fn infer_category(text: &str) -> Option<Category> {
    let lowered = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
}

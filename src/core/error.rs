//! Error types for the indoor-wayfinder library
//!
//! Provides the routing error taxonomy plus fuzzy "did you mean" matching for
//! unknown POI identifiers.

use strsim::{jaro_winkler, normalized_levenshtein};
use thiserror::Error;

/// Minimum combined similarity for a POI suggestion to be offered.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Main error type for wayfinding operations
#[derive(Debug, Error)]
pub enum Error {
    /// Origin or destination id is not a node of the (possibly overlaid) graph
    #[error("POI '{id}' not found{}", suggestion_hint(.suggestion))]
    PoiNotFound {
        id: String,
        suggestion: Option<String>,
    },

    /// The solver exhausted the reachable graph without reaching the destination
    #[error("no route from '{origin}' to '{destination}' under the active preferences")]
    NoRoute { origin: String, destination: String },

    /// The predecessor walk did not reach the origin although the solver
    /// reported success. Always a defect.
    #[error("inconsistent predecessor map between '{origin}' and '{destination}'")]
    InconsistentPredecessors { origin: String, destination: String },

    /// Layout source could not be resolved or fetched
    #[error("layout load failed: {0}")]
    LayoutLoad(String),

    /// Layout violates a structural invariant
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error while fetching a layout
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed layout or preference JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed configuration file
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// True for the recoverable "unknown place" and "no feasible path" cases
    /// that the public API reports as `None`.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::PoiNotFound { .. } | Error::NoRoute { .. })
    }
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// Convenience result type for wayfinding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Suggest the closest known POI id for a mistyped one.
///
/// Scores each candidate with 70% Jaro-Winkler plus 30% normalized
/// Levenshtein, matching against both the id and the display name, and
/// returns the id of the best candidate above the threshold.
pub fn suggest_poi<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let input_lower = input.to_lowercase();
    let mut best: Option<(&str, f64)> = None;

    for (id, name) in candidates {
        let score = similarity(&input_lower, &id.to_lowercase())
            .max(similarity(&input_lower, &name.to_lowercase()));

        if score >= SUGGESTION_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
            best = Some((id, score));
        }
    }

    best.map(|(id, _)| id.to_string())
}

fn similarity(a: &str, b: &str) -> f64 {
    (jaro_winkler(a, b) * 0.7) + (normalized_levenshtein(a, b) * 0.3)
}

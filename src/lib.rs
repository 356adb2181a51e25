//! # Indoor Wayfinder Library
//!
//! Preference-aware indoor routing for multi-floor venues: a layout of floors,
//! points of interest and path segments is compiled into a graph, searched
//! with Dijkstra, and rendered as turn-by-turn instructions.
//!
//! ## Features
//!
//! - **Mobility preferences**: accessible-only, avoid stairs, avoid escalators
//! - **One-off overrides**: request an accessible route without touching the
//!   stored session preferences
//! - **Temporary closures**: route around closed POIs or segments on a
//!   disposable overlay, never mutating the canonical graph
//! - **Layout sources**: local JSON file, HTTP endpoint, or the bundled sample
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use indoor_wayfinder::{LayoutSource, NavigationEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let layout = LayoutSource::Bundled.load().await?;
//!     let engine = NavigationEngine::new(layout)?;
//!
//!     if let Some(route) = engine.find_route("g_entrance_1", "l1_food_court", None) {
//!         for step in &route.instructions {
//!             println!("{step}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Closures
//!
//! ```rust,no_run
//! use indoor_wayfinder::{Closures, NavigationEngine, PreferenceType};
//!
//! # fn demo(engine: &NavigationEngine) {
//! let closures = Closures {
//!     closed_poi_ids: vec!["g_elevator_1".to_string()],
//!     ..Default::default()
//! };
//! let route = engine.get_dynamic_route(
//!     "g_store_a",
//!     "l1_store_c",
//!     &closures,
//!     Some(PreferenceType::Accessible),
//! );
//! // `None`: the engine never relaxes closures or accessibility on its own
//! # let _ = route;
//! # }
//! ```

pub mod core;
pub mod server;

pub use crate::core::config::Config;
pub use crate::core::engine::NavigationEngine;
pub use crate::core::error::{Error, Result};
pub use crate::core::graph::{GraphView, NavGraph};
pub use crate::core::model::{
    Closures, MallFloor, MallLayout, NavigationUserPreferences, PathSegment, PoiType,
    PointOfInterest, PreferenceType, PreferencesUpdate, PreferredMode, Route, SegmentType,
    StoreMetadata,
};
pub use crate::core::source::{sample_layout, LayoutSource};

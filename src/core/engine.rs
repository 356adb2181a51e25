//! Navigation engine - owns the layout, session preferences and cached graph
//!
//! The engine is an explicit value owned by the caller. The compiled graph is
//! shared behind an `Arc` so a caller can take an immutable snapshot for a
//! request while the engine keeps rebuilding on preference changes.

use log::{debug, info, warn};
use std::sync::Arc;

use crate::core::dijkstra::shortest_path;
use crate::core::error::{suggest_poi, Error, Result};
use crate::core::graph::{GraphView, NavGraph};
use crate::core::model::{
    Closures, MallLayout, NavigationUserPreferences, PointOfInterest, PreferenceType,
    PreferencesUpdate, Route,
};
use crate::core::route::{arrived, reconstruct};

#[derive(Debug, Default)]
pub struct NavigationEngine {
    layout: Option<MallLayout>,
    preferences: NavigationUserPreferences,
    graph: Option<Arc<NavGraph>>,
}

impl NavigationEngine {
    /// Engine over `layout` with default preferences.
    pub fn new(layout: MallLayout) -> Result<Self> {
        Self::with_preferences(layout, NavigationUserPreferences::default())
    }

    pub fn with_preferences(
        layout: MallLayout,
        preferences: NavigationUserPreferences,
    ) -> Result<Self> {
        let mut engine = Self {
            layout: None,
            preferences,
            graph: None,
        };
        engine.load_layout(layout)?;
        Ok(engine)
    }

    /// Validate `layout`, then replace the current one and rebuild the graph.
    ///
    /// An invalid layout leaves the engine unchanged.
    pub fn load_layout(&mut self, layout: MallLayout) -> Result<()> {
        layout.validate()?;
        info!(
            "Loaded layout '{}' ({} floors, {} POIs)",
            layout.name,
            layout.floors.len(),
            layout.all_pois().count()
        );
        self.layout = Some(layout);
        self.rebuild_graph();
        Ok(())
    }

    fn rebuild_graph(&mut self) {
        self.graph = self
            .layout
            .as_ref()
            .map(|layout| Arc::new(NavGraph::build(layout, &self.preferences)));
    }

    pub fn mall_layout(&self) -> Option<&MallLayout> {
        self.layout.as_ref()
    }

    /// All POIs, or only those on `floor_level`.
    pub fn all_pois(&self, floor_level: Option<i32>) -> Vec<&PointOfInterest> {
        let Some(layout) = &self.layout else {
            return Vec::new();
        };
        match floor_level {
            Some(level) => layout.pois_on_level(level).collect(),
            None => layout.all_pois().collect(),
        }
    }

    pub fn poi_by_id(&self, id: &str) -> Option<&PointOfInterest> {
        self.graph.as_ref()?.node_by_id(id)
    }

    pub fn user_preferences(&self) -> &NavigationUserPreferences {
        &self.preferences
    }

    /// Shared handle to the current compiled graph.
    pub fn graph_snapshot(&self) -> Option<Arc<NavGraph>> {
        self.graph.clone()
    }

    /// Apply a partial preference update.
    ///
    /// The graph is rebuilt only when the serialized preference state
    /// changed. Returns whether a rebuild happened.
    pub fn update_user_preferences(&mut self, update: &PreferencesUpdate) -> bool {
        let before = serde_json::to_string(&self.preferences).unwrap_or_default();
        update.apply_to(&mut self.preferences);
        let after = serde_json::to_string(&self.preferences).unwrap_or_default();

        if before == after {
            debug!("Preferences unchanged, keeping cached graph");
            return false;
        }

        debug!("Preferences changed ({before} -> {after}), rebuilding graph");
        self.rebuild_graph();
        true
    }

    /// Lowest-cost route, or `None` for an unknown POI or when no route exists.
    pub fn find_route(
        &self,
        origin_id: &str,
        destination_id: &str,
        preference_type: Option<PreferenceType>,
    ) -> Option<Route> {
        report(self.try_find_route(origin_id, destination_id, preference_type))
    }

    pub fn try_find_route(
        &self,
        origin_id: &str,
        destination_id: &str,
        preference_type: Option<PreferenceType>,
    ) -> Result<Route> {
        if origin_id == destination_id {
            return Ok(self.arrived(origin_id));
        }
        let graph = self.require_graph(origin_id)?;
        self.route_on(&graph.view(), origin_id, destination_id, preference_type)
    }

    /// Route computed on a disposable overlay with `closures` applied.
    ///
    /// Closures are never relaxed: if they block every path the result is `None`.
    pub fn get_dynamic_route(
        &self,
        origin_id: &str,
        destination_id: &str,
        closures: &Closures,
        preference_type: Option<PreferenceType>,
    ) -> Option<Route> {
        report(self.try_dynamic_route(origin_id, destination_id, closures, preference_type))
    }

    pub fn try_dynamic_route(
        &self,
        origin_id: &str,
        destination_id: &str,
        closures: &Closures,
        preference_type: Option<PreferenceType>,
    ) -> Result<Route> {
        if origin_id == destination_id {
            return Ok(self.arrived(origin_id));
        }
        let graph = self.require_graph(origin_id)?;
        let view = graph.with_closures(closures);
        self.route_on(&view, origin_id, destination_id, preference_type)
    }

    fn arrived(&self, id: &str) -> Route {
        arrived(id, self.poi_by_id(id).map(|p| p.level))
    }

    fn require_graph(&self, origin_id: &str) -> Result<&Arc<NavGraph>> {
        self.graph.as_ref().ok_or_else(|| Error::PoiNotFound {
            id: origin_id.to_string(),
            suggestion: None,
        })
    }

    fn route_on(
        &self,
        view: &GraphView<'_>,
        origin_id: &str,
        destination_id: &str,
        preference_type: Option<PreferenceType>,
    ) -> Result<Route> {
        let origin = lookup(view, origin_id)?;
        let destination = lookup(view, destination_id)?;
        let active = self.preferences.with_override(preference_type);

        let tree = shortest_path(view, origin, destination, &active).ok_or_else(|| {
            Error::NoRoute {
                origin: origin_id.to_string(),
                destination: destination_id.to_string(),
            }
        })?;

        reconstruct(view.graph(), &tree, active.prefer_accessible_routes)
    }
}

fn lookup(view: &GraphView<'_>, id: &str) -> Result<usize> {
    view.index_of(id).ok_or_else(|| Error::PoiNotFound {
        id: id.to_string(),
        suggestion: suggest_poi(
            id,
            view.graph()
                .nodes()
                .iter()
                .enumerate()
                .filter(|(i, _)| !view.is_closed_node(*i))
                .map(|(_, p)| (p.id.as_str(), p.name.as_str())),
        ),
    })
}

/// Collapse a routing result into the `Option` the public API reports.
fn report(result: Result<Route>) -> Option<Route> {
    match result {
        Ok(route) => Some(route),
        Err(e) if e.is_user_facing() => {
            warn!("{e}");
            None
        }
        // Already logged at error level by `reconstruct`.
        Err(_) => None,
    }
}

//! Routing graph compiled from a `MallLayout`
//!
//! Nodes and oriented segments live in arenas addressed by index. Walkways get
//! a synthesized reverse edge; other segment types keep their authored
//! direction. Closures never touch the graph: a `GraphView` borrows it and
//! carries the excluded node and segment indices.

use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::model::{
    Closures, MallLayout, NavigationUserPreferences, PathSegment, PointOfInterest,
};
use crate::core::weight::segment_weight;

/// Outgoing edge of a node
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Target node index
    pub to: usize,
    /// Index into the oriented segment arena
    pub segment: usize,
    /// Weight under [`NavGraph::preferences`] (`None` = impassable). The
    /// solver reads it when a request runs with those same preferences.
    pub weight: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NavGraph {
    nodes: Vec<PointOfInterest>,
    node_map: FxHashMap<String, usize>,
    segments: Vec<PathSegment>,
    adjacency: Vec<Vec<Edge>>,
    preferences: NavigationUserPreferences,
}

impl NavGraph {
    /// Compile `layout` into an adjacency structure. The layout is only read.
    pub fn build(layout: &MallLayout, prefs: &NavigationUserPreferences) -> Self {
        let mut nodes = Vec::new();
        let mut node_map = FxHashMap::default();

        for poi in layout.all_pois() {
            if node_map.contains_key(&poi.id) {
                warn!("Duplicate POI id '{}' ignored", poi.id);
                continue;
            }
            node_map.insert(poi.id.clone(), nodes.len());
            nodes.push(poi.clone());
        }

        let mut segments = Vec::new();
        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut edge_count = 0;

        for segment in layout.all_segments() {
            let (Some(&from), Some(&to)) = (
                node_map.get(&segment.from_poi_id),
                node_map.get(&segment.to_poi_id),
            ) else {
                warn!(
                    "Segment '{}' references unknown POI ({} -> {}), skipped",
                    segment.id, segment.from_poi_id, segment.to_poi_id
                );
                continue;
            };

            let weight = segment_weight(segment, prefs);

            adjacency[from].push(Edge {
                to,
                segment: segments.len(),
                weight,
            });
            segments.push(segment.clone());
            edge_count += 1;

            if segment.segment_type.is_bidirectional() {
                let reverse = segment.reversed();
                adjacency[to].push(Edge {
                    to: from,
                    segment: segments.len(),
                    weight,
                });
                segments.push(reverse);
                edge_count += 1;
            }
        }

        debug!(
            "Built graph for layout '{}': {} nodes, {} edges",
            layout.id,
            nodes.len(),
            edge_count
        );

        Self {
            nodes,
            node_map,
            segments,
            adjacency,
            preferences: prefs.clone(),
        }
    }

    /// Preferences the cached edge weights were computed with.
    pub fn preferences(&self) -> &NavigationUserPreferences {
        &self.preferences
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_map.get(id).copied()
    }

    pub fn node(&self, index: usize) -> &PointOfInterest {
        &self.nodes[index]
    }

    pub fn node_by_id(&self, id: &str) -> Option<&PointOfInterest> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[PointOfInterest] {
        &self.nodes
    }

    pub fn segment(&self, index: usize) -> &PathSegment {
        &self.segments[index]
    }

    pub fn edges(&self, node: usize) -> &[Edge] {
        &self.adjacency[node]
    }

    /// Unrestricted view of the whole graph.
    pub fn view(&self) -> GraphView<'_> {
        GraphView {
            graph: self,
            closed_nodes: FxHashSet::default(),
            closed_segments: FxHashSet::default(),
        }
    }

    /// View with the given POIs and segments excluded. Unknown ids are ignored.
    pub fn with_closures(&self, closures: &Closures) -> GraphView<'_> {
        let closed_nodes: FxHashSet<usize> = closures
            .closed_poi_ids
            .iter()
            .filter_map(|id| self.index_of(id))
            .collect();

        let closed_ids: FxHashSet<&str> = closures
            .closed_segment_ids
            .iter()
            .map(String::as_str)
            .collect();
        // Both orientations of a walkway share the id, so both are closed.
        let closed_segments: FxHashSet<usize> = self
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| closed_ids.contains(s.id.as_str()))
            .map(|(i, _)| i)
            .collect();

        debug!(
            "Closure overlay: {} nodes, {} oriented segments excluded",
            closed_nodes.len(),
            closed_segments.len()
        );

        GraphView {
            graph: self,
            closed_nodes,
            closed_segments,
        }
    }
}

/// Read-only view of a `NavGraph` with an exclusion set applied
#[derive(Debug, Clone)]
pub struct GraphView<'a> {
    graph: &'a NavGraph,
    closed_nodes: FxHashSet<usize>,
    closed_segments: FxHashSet<usize>,
}

impl<'a> GraphView<'a> {
    pub fn graph(&self) -> &'a NavGraph {
        self.graph
    }

    /// Node index of `id` unless unknown or closed.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.graph
            .index_of(id)
            .filter(|i| !self.closed_nodes.contains(i))
    }

    pub fn is_closed_node(&self, node: usize) -> bool {
        self.closed_nodes.contains(&node)
    }

    /// Outgoing edges of `node` that survive the closures.
    pub fn edges(&self, node: usize) -> impl Iterator<Item = &'a Edge> + '_ {
        self.graph.edges(node).iter().filter(move |e| {
            !self.closed_nodes.contains(&e.to) && !self.closed_segments.contains(&e.segment)
        })
    }
}

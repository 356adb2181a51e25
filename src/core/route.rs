//! Route reconstruction and turn-by-turn instructions
//!
//! Walks the solver's predecessor map from the destination back to the
//! origin, then aggregates physical distance, duration and accessibility.

use log::error;

use crate::core::dijkstra::SearchTree;
use crate::core::error::{Error, Result};
use crate::core::graph::NavGraph;
use crate::core::model::{PathSegment, Route, SegmentType};

/// Walking pace used when a segment has no duration estimate (seconds per meter)
pub const SECONDS_PER_METER: f64 = 0.8;

pub const ALREADY_THERE: &str = "You are already at your destination.";

/// Route for `origin == destination`: no segments, zero distance and duration.
pub fn arrived(origin_id: &str, level: Option<i32>) -> Route {
    Route {
        origin_poi_id: origin_id.to_string(),
        destination_poi_id: origin_id.to_string(),
        segments: Vec::new(),
        total_distance: 0.0,
        estimated_duration: 0.0,
        is_accessible: true,
        instructions: vec![ALREADY_THERE.to_string()],
        floors_visited: level.into_iter().collect(),
    }
}

/// Build the `Route` encoded by `tree`.
///
/// `accessibility_requested` controls whether `is_accessible` certifies the
/// segments; otherwise it is always `true`.
pub fn reconstruct(
    graph: &NavGraph,
    tree: &SearchTree,
    accessibility_requested: bool,
) -> Result<Route> {
    let mut segments: Vec<PathSegment> = Vec::new();
    let mut current = tree.destination;

    // A simple path never has more segments than nodes.
    let mut remaining = graph.node_count();
    while current != tree.origin {
        let Some(pred) = tree.predecessors[current] else {
            return Err(inconsistent(graph, tree));
        };
        if remaining == 0 {
            return Err(inconsistent(graph, tree));
        }
        remaining -= 1;
        segments.push(graph.segment(pred.segment).clone());
        current = pred.from;
    }
    segments.reverse();

    let total_distance = segments.iter().map(|s| s.distance).sum();
    let estimated_duration = segments.iter().map(segment_duration).sum();
    let is_accessible = !accessibility_requested || segments.iter().all(|s| s.is_accessible);
    let instructions = segments.iter().map(|s| instruction(graph, s)).collect();
    let floors_visited = floors_visited(graph, tree.origin, &segments);

    Ok(Route {
        origin_poi_id: graph.node(tree.origin).id.clone(),
        destination_poi_id: graph.node(tree.destination).id.clone(),
        segments,
        total_distance,
        estimated_duration,
        is_accessible,
        instructions,
        floors_visited,
    })
}

fn inconsistent(graph: &NavGraph, tree: &SearchTree) -> Error {
    let origin = graph.node(tree.origin).id.clone();
    let destination = graph.node(tree.destination).id.clone();
    error!("Predecessor walk from '{destination}' never reached '{origin}'");
    Error::InconsistentPredecessors {
        origin,
        destination,
    }
}

/// Seconds to traverse `segment`.
pub fn segment_duration(segment: &PathSegment) -> f64 {
    segment
        .duration_estimate
        .unwrap_or(segment.distance * SECONDS_PER_METER)
}

/// Human-readable step for one segment. Unknown endpoints fall back to
/// "previous point" / "next point".
pub fn instruction(graph: &NavGraph, segment: &PathSegment) -> String {
    let from = graph.node_by_id(&segment.from_poi_id);
    let to = graph.node_by_id(&segment.to_poi_id);
    let from_name = from.map_or("previous point", |p| p.name.as_str());
    let to_name = to.map_or("next point", |p| p.name.as_str());
    let distance = segment.distance;

    let transport = match segment.segment_type {
        SegmentType::Walkway => {
            return format!("Walk from {from_name} to {to_name} ({distance}m).");
        }
        SegmentType::Elevator => "Elevator",
        SegmentType::Escalator => "Escalator",
        SegmentType::Stairs => "Stairs",
    };

    let from_level = from.map_or_else(|| "?".to_string(), |p| p.level.to_string());
    let to_level = to.map_or_else(|| "?".to_string(), |p| p.level.to_string());
    format!(
        "Take {transport} from {from_name} (Level {from_level}) to {to_name} (Level {to_level}) ({distance}m)."
    )
}

fn floors_visited(graph: &NavGraph, origin: usize, segments: &[PathSegment]) -> Vec<i32> {
    let mut levels = vec![graph.node(origin).level];
    for segment in segments {
        if let Some(poi) = graph.node_by_id(&segment.to_poi_id) {
            if levels.last() != Some(&poi.level) {
                levels.push(poi.level);
            }
        }
    }
    levels
}

//! Single-source shortest path over a `GraphView`
//!
//! When the active preferences are the ones the graph was built with, the
//! cached edge weights are used. Otherwise weights are recomputed per
//! relaxation, so a one-off override needs no graph rebuild.

use log::debug;
use priority_queue::PriorityQueue;
use std::cmp::{Ordering, Reverse};

use crate::core::graph::GraphView;
use crate::core::model::NavigationUserPreferences;
use crate::core::weight::segment_weight;

/// Totally ordered accumulated cost
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Node reached through `segment` from `from`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Predecessor {
    pub from: usize,
    pub segment: usize,
}

/// Result of a successful search
#[derive(Debug, Clone)]
pub struct SearchTree {
    /// Weighted distance from the origin per node (`INFINITY` when not reached)
    pub distances: Vec<f64>,
    pub predecessors: Vec<Option<Predecessor>>,
    pub origin: usize,
    pub destination: usize,
    /// Nodes dequeued before the destination was reached
    pub settled: usize,
}

impl SearchTree {
    /// Weighted cost of the destination.
    pub fn cost(&self) -> f64 {
        self.distances[self.destination]
    }
}

/// Dijkstra from `origin` until `destination` is dequeued.
///
/// Returns `None` when the queue empties first, i.e. no feasible path exists
/// under `prefs` and the view's closures. Equal costs are served in the
/// order they were enqueued.
pub fn shortest_path(
    view: &GraphView<'_>,
    origin: usize,
    destination: usize,
    prefs: &NavigationUserPreferences,
) -> Option<SearchTree> {
    let graph = view.graph();
    let n = graph.node_count();
    let cached = graph.preferences() == prefs;
    let mut distances = vec![f64::INFINITY; n];
    let mut predecessors: Vec<Option<Predecessor>> = vec![None; n];

    // Min-heap via Reverse; the sequence number breaks ties first-in-first-out.
    let mut queue: PriorityQueue<usize, Reverse<(Cost, u64)>> = PriorityQueue::new();
    let mut sequence = 0u64;
    let mut settled = 0usize;

    distances[origin] = 0.0;
    queue.push(origin, Reverse((Cost(0.0), sequence)));

    while let Some((current, _)) = queue.pop() {
        settled += 1;

        if current == destination {
            debug!(
                "Dijkstra reached destination after settling {settled} nodes, cost {:.1}",
                distances[current]
            );
            return Some(SearchTree {
                distances,
                predecessors,
                origin,
                destination,
                settled,
            });
        }

        let base = distances[current];
        if base.is_infinite() {
            continue;
        }

        for edge in view.edges(current) {
            let weight = if cached {
                edge.weight
            } else {
                segment_weight(graph.segment(edge.segment), prefs)
            };
            let Some(weight) = weight else {
                continue;
            };

            let candidate = base + weight;
            if candidate < distances[edge.to] {
                distances[edge.to] = candidate;
                predecessors[edge.to] = Some(Predecessor {
                    from: current,
                    segment: edge.segment,
                });
                sequence += 1;
                // Replaces the queued priority when the neighbor is already enqueued
                queue.push(edge.to, Reverse((Cost(candidate), sequence)));
            }
        }
    }

    debug!("Dijkstra exhausted {settled} nodes without reaching destination");
    None
}

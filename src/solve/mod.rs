//! Shortest-path strategies.
//!
//! `RouteSolver` is the closed strategy set a graph is configured with. Every
//! strategy answers the same question — best edge sequence for an ordered
//! (source, target), empty when unreachable — but they differ in scope,
//! weight tolerance, and memoization (see the table in the crate docs).
//!
//! Tie-breaking between equal-cost paths is algorithm-dependent and not
//! stable across strategies.

pub(crate) mod astar;
pub(crate) mod bellman_ford;
pub(crate) mod dijkstra;
pub(crate) mod floyd_warshall;
pub(crate) mod yen;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::model::GraphKey;

/// Estimated remaining cost from a vertex to the query target. Must be
/// admissible (never overestimate) and consistent for A* to return optimal
/// routes; geometric distance over spatial networks is the usual choice.
pub type Heuristic<V> = Arc<dyn Fn(&V, &V) -> f64 + Send + Sync>;

/// Routing strategy selector.
pub enum RouteSolver<V> {
    /// All pairs at once, memoized on the graph until explicitly discarded
    /// via `Graph::clear_all_pairs_memo`. No negative-cycle check.
    FloydWarshall,
    /// Single source per query. Tolerates negative weights; a reachable
    /// negative cycle raises an error instead of a wrong route.
    BellmanFord,
    /// Single pair, nonnegative weights. The default.
    Dijkstra,
    /// Single pair guided by an injected heuristic, nonnegative weights.
    AStar { heuristic: Heuristic<V> },
}

impl<V> RouteSolver<V> {
    /// Convenience constructor wrapping a heuristic closure for A*.
    pub fn astar(heuristic: impl Fn(&V, &V) -> f64 + Send + Sync + 'static) -> Self {
        Self::AStar { heuristic: Arc::new(heuristic) }
    }
}

impl<V> Default for RouteSolver<V> {
    fn default() -> Self {
        Self::Dijkstra
    }
}

impl<V> Clone for RouteSolver<V> {
    fn clone(&self) -> Self {
        match self {
            Self::FloydWarshall => Self::FloydWarshall,
            Self::BellmanFord => Self::BellmanFord,
            Self::Dijkstra => Self::Dijkstra,
            Self::AStar { heuristic } => Self::AStar { heuristic: Arc::clone(heuristic) },
        }
    }
}

impl<V> fmt::Debug for RouteSolver<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FloydWarshall => f.write_str("FloydWarshall"),
            Self::BellmanFord => f.write_str("BellmanFord"),
            Self::Dijkstra => f.write_str("Dijkstra"),
            Self::AStar { .. } => f.write_str("AStar"),
        }
    }
}

// ============================================================================
// Shared frontier plumbing
// ============================================================================

/// Min-ordered frontier entry for the `BinaryHeap`-based strategies.
/// `BinaryHeap` is a max-heap, so the ordering is reversed.
#[derive(Clone)]
pub(crate) struct QueueEntry<V> {
    pub cost: f64,
    pub vertex: V,
}

impl<V> PartialEq for QueueEntry<V> {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost).is_eq()
    }
}

impl<V> Eq for QueueEntry<V> {}

impl<V> PartialOrd for QueueEntry<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V> Ord for QueueEntry<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

/// Rebuilds the edge sequence from parent pointers, target back to source.
/// Empty when the target was never reached (or equals the source).
pub(crate) fn assemble_route<V: GraphKey, E: GraphKey>(
    source: &V,
    target: &V,
    parent: &HashMap<V, (V, E)>,
) -> Vec<E> {
    if source == target {
        return Vec::new();
    }
    let mut route = Vec::new();
    let mut cursor = target.clone();
    while cursor != *source {
        match parent.get(&cursor) {
            Some((from, edge)) => {
                route.push(edge.clone());
                cursor = from.clone();
            }
            None => return Vec::new(),
        }
    }
    route.reverse();
    route
}

//! Dijkstra single-pair search.
//!
//! Requires nonnegative weights. The optional exclusion sets make this the
//! spur-path engine for the K-shortest enumerator as well.

use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};

use super::{QueueEntry, assemble_route};
use crate::graph::Graph;
use crate::model::GraphKey;

/// Best edge sequence from `source` to `target`, skipping any excluded
/// vertices/edges. Empty when unreachable, when either endpoint is missing,
/// or when the endpoints are equal.
pub(crate) fn best_route<V: GraphKey, E: GraphKey>(
    graph: &Graph<V, E>,
    source: &V,
    target: &V,
    excluded_vertices: Option<&HashSet<V>>,
    excluded_edges: Option<&HashSet<E>>,
) -> Vec<E> {
    if source == target || !graph.contains_vertex(source) || !graph.contains_vertex(target) {
        return Vec::new();
    }

    let mut dist: HashMap<V, f64> = HashMap::new();
    let mut parent: HashMap<V, (V, E)> = HashMap::new();
    let mut settled: HashSet<V> = HashSet::new();
    let mut frontier = BinaryHeap::new();

    dist.insert(source.clone(), 0.0);
    frontier.push(QueueEntry { cost: 0.0, vertex: source.clone() });

    while let Some(QueueEntry { cost, vertex }) = frontier.pop() {
        if !settled.insert(vertex.clone()) {
            continue;
        }
        if vertex == *target {
            break;
        }
        for (edge, far, weight) in graph.neighbor_edges(&vertex) {
            if excluded_edges.is_some_and(|skip| skip.contains(edge)) {
                continue;
            }
            if excluded_vertices.is_some_and(|skip| skip.contains(far)) {
                continue;
            }
            if settled.contains(far) {
                continue;
            }
            let candidate = cost + weight;
            let better = dist.get(far).is_none_or(|best| candidate < *best);
            if better {
                dist.insert(far.clone(), candidate);
                parent.insert(far.clone(), (vertex.clone(), edge.clone()));
                frontier.push(QueueEntry { cost: candidate, vertex: far.clone() });
            }
        }
    }

    assemble_route(source, target, &parent)
}

//! A* single-pair search — Dijkstra guided by an injected heuristic.
//!
//! The frontier is ordered by f = g + h. With an admissible, consistent
//! heuristic the first settlement of the target is optimal; with the zero
//! heuristic this degenerates into plain Dijkstra.

use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};

use super::{QueueEntry, assemble_route};
use crate::graph::Graph;
use crate::model::GraphKey;

pub(crate) fn best_route<V: GraphKey, E: GraphKey>(
    graph: &Graph<V, E>,
    source: &V,
    target: &V,
    heuristic: &(dyn Fn(&V, &V) -> f64 + Send + Sync),
) -> Vec<E> {
    if source == target || !graph.contains_vertex(source) || !graph.contains_vertex(target) {
        return Vec::new();
    }

    let mut g_score: HashMap<V, f64> = HashMap::new();
    let mut parent: HashMap<V, (V, E)> = HashMap::new();
    let mut settled: HashSet<V> = HashSet::new();
    let mut frontier = BinaryHeap::new();

    g_score.insert(source.clone(), 0.0);
    frontier.push(QueueEntry { cost: heuristic(source, target), vertex: source.clone() });

    while let Some(QueueEntry { vertex, .. }) = frontier.pop() {
        if !settled.insert(vertex.clone()) {
            continue;
        }
        if vertex == *target {
            break;
        }
        let g_here = *g_score.get(&vertex).unwrap_or(&f64::INFINITY);
        for (edge, far, weight) in graph.neighbor_edges(&vertex) {
            if settled.contains(far) {
                continue;
            }
            let tentative = g_here + weight;
            let better = g_score.get(far).is_none_or(|best| tentative < *best);
            if better {
                g_score.insert(far.clone(), tentative);
                parent.insert(far.clone(), (vertex.clone(), edge.clone()));
                frontier.push(QueueEntry {
                    cost: tentative + heuristic(far, target),
                    vertex: far.clone(),
                });
            }
        }
    }

    assemble_route(source, target, &parent)
}

//! Yen-style K-shortest loopless paths.
//!
//! Grows the result set one path at a time: every vertex of the latest
//! accepted path becomes a spur point, the prefix up to it a root path, and
//! a Dijkstra run with the root's vertices and the already-used continuation
//! edges excluded proposes a deviation. Candidates pool across rounds and
//! are accepted in ascending total-weight order.
//!
//! The enumerator always drives its own exclusion-aware Dijkstra, whatever
//! solver the graph is configured with, so nonnegative weights are required.

use hashbrown::HashSet;

use super::dijkstra;
use crate::graph::Graph;
use crate::model::GraphKey;

pub(crate) fn k_best_routes<V: GraphKey, E: GraphKey>(
    graph: &Graph<V, E>,
    source: &V,
    target: &V,
    k: usize,
) -> Vec<Vec<E>> {
    if k == 0 {
        return Vec::new();
    }
    if source == target {
        return vec![Vec::new()];
    }

    let first = dijkstra::best_route(graph, source, target, None, None);
    if first.is_empty() {
        return Vec::new();
    }

    let mut found: Vec<Vec<E>> = vec![first];
    let mut candidates: Vec<(f64, Vec<E>)> = Vec::new();

    while found.len() < k {
        let previous = match found.last() {
            Some(path) => path.clone(),
            None => break,
        };
        let chain = graph.route_vertices(source, &previous);
        if chain.len() != previous.len() + 1 {
            break;
        }

        for spur_idx in 0..previous.len() {
            let spur = chain[spur_idx].clone();
            let root = &previous[..spur_idx];

            // Continuations already taken from this root are off the table.
            let mut banned_edges: HashSet<E> = HashSet::new();
            for path in &found {
                if path.len() > spur_idx && path[..spur_idx] == *root {
                    banned_edges.insert(path[spur_idx].clone());
                }
            }
            // Root vertices (minus the spur itself) keep deviations loopless.
            let banned_vertices: HashSet<V> = chain[..spur_idx].iter().cloned().collect();

            let spur_route = dijkstra::best_route(
                graph,
                &spur,
                target,
                Some(&banned_vertices),
                Some(&banned_edges),
            );
            if spur_route.is_empty() {
                continue;
            }

            let mut candidate: Vec<E> = root.to_vec();
            candidate.extend(spur_route);
            if found.iter().any(|path| *path == candidate)
                || candidates.iter().any(|(_, path)| *path == candidate)
            {
                continue;
            }
            let weight = graph.route_weight(&candidate);
            candidates.push((weight, candidate));
        }

        let cheapest = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.0.total_cmp(&b.0))
            .map(|(idx, _)| idx);
        let Some(idx) = cheapest else {
            break;
        };
        let (_, path) = candidates.swap_remove(idx);
        found.push(path);
    }

    found
}

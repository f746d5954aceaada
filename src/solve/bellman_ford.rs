//! Bellman-Ford single-source search.
//!
//! Relaxes every edge up to |V| - 1 rounds with an early exit at fixpoint,
//! then runs one check round: any edge still relaxable means a negative
//! cycle is reachable from the source, which is an error rather than a
//! silently wrong route.

use hashbrown::HashMap;

use super::assemble_route;
use crate::graph::Graph;
use crate::model::GraphKey;
use crate::{Error, Result};

pub(crate) fn best_route<V: GraphKey, E: GraphKey>(
    graph: &Graph<V, E>,
    source: &V,
    target: &V,
) -> Result<Vec<E>> {
    if source == target || !graph.contains_vertex(source) || !graph.contains_vertex(target) {
        return Ok(Vec::new());
    }

    let mut dist: HashMap<V, f64> = HashMap::new();
    let mut parent: HashMap<V, (V, E)> = HashMap::new();
    dist.insert(source.clone(), 0.0);

    let rounds = graph.vertex_count().saturating_sub(1);
    let mut settled_early = false;
    for _ in 0..rounds {
        let mut changed = false;
        for (edge, record) in graph.edge_records() {
            changed |= relax(&mut dist, &mut parent, &record.source, &record.target, edge, record.weight);
            if !graph.is_directed() && !record.is_loop() {
                changed |= relax(&mut dist, &mut parent, &record.target, &record.source, edge, record.weight);
            }
        }
        if !changed {
            settled_early = true;
            break;
        }
    }

    // Check round: at fixpoint nothing can relax, so a hit here proves a
    // reachable negative cycle.
    if !settled_early {
        for (_, record) in graph.edge_records() {
            if would_relax(&dist, &record.source, &record.target, record.weight)
                || (!graph.is_directed()
                    && !record.is_loop()
                    && would_relax(&dist, &record.target, &record.source, record.weight))
            {
                return Err(Error::NegativeCycle { vertex: format!("{source:?}") });
            }
        }
    }

    Ok(assemble_route(source, target, &parent))
}

fn relax<V: GraphKey, E: GraphKey>(
    dist: &mut HashMap<V, f64>,
    parent: &mut HashMap<V, (V, E)>,
    from: &V,
    to: &V,
    edge: &E,
    weight: f64,
) -> bool {
    let Some(&from_dist) = dist.get(from) else {
        return false;
    };
    let candidate = from_dist + weight;
    if dist.get(to).is_none_or(|best| candidate < *best) {
        dist.insert(to.clone(), candidate);
        parent.insert(to.clone(), (from.clone(), edge.clone()));
        return true;
    }
    false
}

fn would_relax<V: GraphKey>(dist: &HashMap<V, f64>, from: &V, to: &V, weight: f64) -> bool {
    match dist.get(from) {
        Some(&from_dist) => dist.get(to).is_none_or(|best| from_dist + weight < *best),
        None => false,
    }
}

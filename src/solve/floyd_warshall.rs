//! Floyd-Warshall all-pairs tables.
//!
//! Built lazily on first use and held on the graph until
//! `Graph::clear_all_pairs_memo` discards them — staleness after mutation is
//! the caller's problem by contract, never auto-detected. Unlike the other
//! strategies the memo bypasses the path cache entirely.

use crate::graph::Graph;
use crate::model::GraphKey;

pub(crate) const NO_HOP: u32 = u32::MAX;

/// Distance, successor, and chosen-direct-edge tables over vertex indices
/// (insertion order at build time).
#[derive(Debug, Clone)]
pub(crate) struct AllPairsMemo<E> {
    n: usize,
    dist: Vec<f64>,
    /// Successor index on the best path, row-major; `NO_HOP` when
    /// unreachable, own index on the diagonal.
    next: Vec<u32>,
    /// Minimum-weight direct edge per ordered index pair.
    link: Vec<Option<E>>,
}

pub(crate) fn build<V: GraphKey, E: GraphKey>(graph: &Graph<V, E>) -> AllPairsMemo<E> {
    let n = graph.vertex_count();
    let mut dist = vec![f64::INFINITY; n * n];
    let mut next = vec![NO_HOP; n * n];
    let mut link: Vec<Option<E>> = vec![None; n * n];

    for i in 0..n {
        dist[i * n + i] = 0.0;
        next[i * n + i] = i as u32;
    }

    for (edge, record) in graph.edge_records() {
        let (Some(s), Some(t)) = (graph.index_of(&record.source), graph.index_of(&record.target))
        else {
            continue;
        };
        if record.weight < dist[s * n + t] {
            dist[s * n + t] = record.weight;
            next[s * n + t] = t as u32;
            link[s * n + t] = Some(edge.clone());
        }
        if !graph.is_directed() && s != t && record.weight < dist[t * n + s] {
            dist[t * n + s] = record.weight;
            next[t * n + s] = s as u32;
            link[t * n + s] = Some(edge.clone());
        }
    }

    for k in 0..n {
        for i in 0..n {
            let through = dist[i * n + k];
            if through.is_infinite() {
                continue;
            }
            for j in 0..n {
                let candidate = through + dist[k * n + j];
                if candidate < dist[i * n + j] {
                    dist[i * n + j] = candidate;
                    next[i * n + j] = next[i * n + k];
                }
            }
        }
    }

    tracing::debug!(vertices = n, "all-pairs tables built");
    AllPairsMemo { n, dist, next, link }
}

impl<E: GraphKey> AllPairsMemo<E> {
    pub fn vertex_count(&self) -> usize {
        self.n
    }

    /// Successor index toward `target`, `None` when no route is known.
    pub fn next_hop(&self, source: usize, target: usize) -> Option<usize> {
        if source >= self.n || target >= self.n {
            return None;
        }
        match self.next[source * self.n + target] {
            NO_HOP => None,
            hop => Some(hop as usize),
        }
    }

    pub fn distance(&self, source: usize, target: usize) -> f64 {
        if source >= self.n || target >= self.n {
            return f64::INFINITY;
        }
        self.dist[source * self.n + target]
    }

    /// Edge sequence reconstructed from the successor table. Empty when the
    /// endpoints coincide or no route exists. The walk is hop-bounded so
    /// successor cycles caused by negative-weight input cannot hang it.
    pub fn route(&self, source: usize, target: usize) -> Vec<E> {
        if source == target || source >= self.n || target >= self.n {
            return Vec::new();
        }
        let mut edges = Vec::new();
        let mut cursor = source;
        while cursor != target {
            let Some(hop) = self.next_hop(cursor, target) else {
                return Vec::new();
            };
            match &self.link[cursor * self.n + hop] {
                Some(edge) => edges.push(edge.clone()),
                None => return Vec::new(),
            }
            cursor = hop;
            if edges.len() > self.n {
                return Vec::new();
            }
        }
        edges
    }
}

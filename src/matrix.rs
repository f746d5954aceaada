//! Next-hop routing matrix — persist precomputed routing, reload it later.
//!
//! The matrix stores, for every ordered (source, target) pair of vertex
//! indices, only the index of the next vertex toward the target, row-major:
//! `cells[source * n + target]`. A cell equal to its own source index is the
//! sentinel meaning "no route / arrived". Indices follow the graph's vertex
//! insertion order, so a matrix saved from one run loads into an identically
//! built graph in the next.
//!
//! ```text
//! graph.save_routing_matrix() → RoutingMatrix → to_json() → store
//!   … next run …
//! RoutingMatrix::from_json() → graph.load_routing_matrix() → cache warm
//! ```

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::cache::PathCache;
use crate::graph::Graph;
use crate::model::GraphKey;
use crate::{Error, Result};

/// |V|×|V| next-hop table with its dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingMatrix {
    n: usize,
    cells: Vec<u32>,
}

impl RoutingMatrix {
    /// A matrix of dimension `n` with every cell at the sentinel.
    pub fn new(n: usize) -> Self {
        let mut cells = vec![0u32; n * n];
        for source in 0..n {
            for target in 0..n {
                cells[source * n + target] = source as u32;
            }
        }
        Self { n, cells }
    }

    pub fn vertex_count(&self) -> usize {
        self.n
    }

    /// Next vertex index from `source` toward `target`; `None` at the
    /// sentinel or out of range.
    pub fn next_hop(&self, source: usize, target: usize) -> Option<usize> {
        if source >= self.n || target >= self.n {
            return None;
        }
        let cell = self.cells[source * self.n + target] as usize;
        if cell == source { None } else { Some(cell) }
    }

    pub(crate) fn get(&self, source: usize, target: usize) -> u32 {
        self.cells[source * self.n + target]
    }

    pub(crate) fn set(&mut self, source: usize, target: usize, hop: u32) {
        self.cells[source * self.n + target] = hop;
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("routing matrix serializes to plain JSON")
    }

    /// Decodes and shape-checks a matrix. Malformed text or a cell/dimension
    /// mismatch is [`Error::MalformedMatrix`].
    pub fn from_json(text: &str) -> Result<Self> {
        let matrix: Self = serde_json::from_str(text).map_err(|err| Error::MalformedMatrix {
            reason: format!("json decode: {err}"),
        })?;
        matrix.validate_shape()?;
        Ok(matrix)
    }

    fn validate_shape(&self) -> Result<()> {
        // The dimension is decoder-supplied; its square must not be trusted
        // to fit in usize.
        let Some(expected) = self.n.checked_mul(self.n) else {
            return Err(Error::MalformedMatrix {
                reason: format!("dimension {} overflows the cell count", self.n),
            });
        };
        if self.cells.len() != expected {
            return Err(Error::MalformedMatrix {
                reason: format!(
                    "{} cells for dimension {} (expected {expected})",
                    self.cells.len(),
                    self.n
                ),
            });
        }
        for (index, &cell) in self.cells.iter().enumerate() {
            if cell as usize >= self.n {
                return Err(Error::MalformedMatrix {
                    reason: format!(
                        "cell {index} points at vertex {cell}, but the matrix has {} vertices",
                        self.n
                    ),
                });
            }
        }
        Ok(())
    }
}

impl<V: GraphKey, E: GraphKey> Graph<V, E> {
    /// Builds the next-hop matrix for the current topology.
    ///
    /// With all-pairs tables already memoized the successor table maps
    /// directly onto cells. Otherwise every still-sentinel pair triggers one
    /// best-route computation whose walk fills the cell for each suffix it
    /// passes through, skipping pairs an earlier walk already resolved —
    /// amortized O(V²) cell writes in total.
    pub fn save_routing_matrix(&self) -> Result<RoutingMatrix> {
        let n = self.vertex_count();
        let mut matrix = RoutingMatrix::new(n);

        {
            let memo = self.all_pairs.read();
            if let Some(tables) = memo.as_ref() {
                if tables.vertex_count() == n {
                    for s in 0..n {
                        for t in 0..n {
                            if let Some(hop) = tables.next_hop(s, t) {
                                matrix.set(s, t, hop as u32);
                            }
                        }
                    }
                    tracing::debug!(vertices = n, "routing matrix saved from all-pairs tables");
                    return Ok(matrix);
                }
            }
        }

        for s in 0..n {
            for t in 0..n {
                if s == t || matrix.get(s, t) != s as u32 {
                    continue;
                }
                let (Some(sv), Some(tv)) = (self.vertex_at(s), self.vertex_at(t)) else {
                    continue;
                };
                let (sv, tv) = (sv.clone(), tv.clone());
                let route = self.best_route_between(&sv, &tv)?;
                if route.is_empty() {
                    continue;
                }
                let chain = self.route_vertices(&sv, &route);
                for i in 0..chain.len().saturating_sub(1) {
                    let Some(here) = self.index_of(&chain[i]) else {
                        break;
                    };
                    // A filled cell means this suffix is already recorded.
                    if here != s && matrix.get(here, t) != here as u32 {
                        break;
                    }
                    let Some(hop) = self.index_of(&chain[i + 1]) else {
                        break;
                    };
                    matrix.set(here, t, hop as u32);
                }
            }
        }
        tracing::debug!(vertices = n, "routing matrix saved from per-pair routes");
        Ok(matrix)
    }

    /// Rebuilds the path cache from a next-hop matrix: for every ordered
    /// pair, follows next-hop pointers until the target or the sentinel,
    /// taking the minimum-weight parallel edge toward each prescribed next
    /// vertex (memoized per ordered hop). Pairs that stop at the sentinel
    /// cache an empty "no route" answer.
    ///
    /// Walks are bounded by |V| hops; exceeding the bound, a prescribed hop
    /// with no matching edge, or a shape mismatch is
    /// [`Error::MalformedMatrix`], and the live cache is left untouched.
    /// Loaded routes are consulted only while path caching is enabled and a
    /// non-all-pairs solver is active.
    pub fn load_routing_matrix(&self, matrix: &RoutingMatrix) -> Result<()> {
        let n = self.vertex_count();
        if matrix.vertex_count() != n {
            return Err(Error::MalformedMatrix {
                reason: format!(
                    "matrix is for {} vertices, the graph has {n}",
                    matrix.vertex_count()
                ),
            });
        }
        matrix.validate_shape()?;

        let mut rebuilt: PathCache<V, E> = PathCache::new();
        let mut hop_edges: HashMap<(usize, usize), E> = HashMap::new();

        for s in 0..n {
            for t in 0..n {
                let (Some(sv), Some(tv)) = (self.vertex_at(s), self.vertex_at(t)) else {
                    continue;
                };
                let (sv, tv) = (sv.clone(), tv.clone());
                let mut route: Vec<E> = Vec::new();
                let mut cursor = s;
                let mut hops = 0usize;
                while cursor != t {
                    if hops >= n {
                        return Err(Error::MalformedMatrix {
                            reason: format!(
                                "next-hop walk from index {s} to {t} still open after {n} hops"
                            ),
                        });
                    }
                    let next = matrix.get(cursor, t) as usize;
                    if next == cursor {
                        route.clear();
                        break;
                    }
                    let edge = match hop_edges.get(&(cursor, next)) {
                        Some(edge) => edge.clone(),
                        None => {
                            let edge = self
                                .hop_edge(cursor, next)
                                .ok_or_else(|| Error::MalformedMatrix {
                                    reason: format!(
                                        "no edge for prescribed hop {cursor} -> {next}"
                                    ),
                                })?;
                            hop_edges.insert((cursor, next), edge.clone());
                            edge
                        }
                    };
                    route.push(edge);
                    cursor = next;
                    hops += 1;
                }
                rebuilt.store_best(sv, tv, route);
            }
        }

        *self.cache.write() = rebuilt;
        tracing::debug!(vertices = n, pairs = n * n, "routing matrix loaded into path cache");
        Ok(())
    }

    fn hop_edge(&self, from: usize, to: usize) -> Option<E> {
        let from_v = self.vertex_at(from)?.clone();
        let to_v = self.vertex_at(to)?.clone();
        self.min_weight_edge_between(&from_v, &to_v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_matrix_is_all_sentinel() {
        let matrix = RoutingMatrix::new(3);
        for s in 0..3 {
            for t in 0..3 {
                assert_eq!(matrix.next_hop(s, t), None);
            }
        }
    }

    #[test]
    fn json_round_trip() {
        let mut matrix = RoutingMatrix::new(2);
        matrix.set(0, 1, 1);
        let text = matrix.to_json();
        let back = RoutingMatrix::from_json(&text).unwrap();
        assert_eq!(back, matrix);
        assert_eq!(back.next_hop(0, 1), Some(1));
        assert_eq!(back.next_hop(1, 0), None);
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(RoutingMatrix::from_json("not json").is_err());
        // 2x2 dimension with too few cells
        assert!(RoutingMatrix::from_json(r#"{"n":2,"cells":[0,0,0]}"#).is_err());
        // cell pointing past the dimension
        assert!(RoutingMatrix::from_json(r#"{"n":2,"cells":[0,7,1,1]}"#).is_err());
        // dimension whose square overflows usize
        assert!(RoutingMatrix::from_json(r#"{"n":4294967296,"cells":[]}"#).is_err());
    }
}

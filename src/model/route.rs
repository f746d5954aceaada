//! Route — the path value returned by shortest-path queries.

/// An ordered edge sequence from `source` to `target`, with the total weight
/// as computed against the graph at query time.
///
/// A route between a vertex and itself has no edges and weight zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<V, E> {
    source: V,
    target: V,
    edges: Vec<E>,
    weight: f64,
}

impl<V, E> Route<V, E> {
    pub(crate) fn new(source: V, target: V, edges: Vec<E>, weight: f64) -> Self {
        Self { source, target, edges, weight }
    }

    pub fn source(&self) -> &V {
        &self.source
    }

    pub fn target(&self) -> &V {
        &self.target
    }

    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    /// Consumes the route, keeping only the edge sequence.
    pub fn into_edges(self) -> Vec<E> {
        self.edges
    }

    /// Total weight at computation time. Stale if edge weights changed since.
    pub fn total_weight(&self) -> f64 {
        self.weight
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

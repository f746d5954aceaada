//! Storage rows backing the vertex and edge maps.

use smallvec::SmallVec;

/// Weight assigned to every element until a caller sets one, and assumed for
/// edge values that are not (or no longer) part of the graph.
pub(crate) const DEFAULT_WEIGHT: f64 = 1.0;

/// Per-vertex row: scalar weight plus the incident edge lists.
///
/// Registration is single-sided regardless of directedness: an edge (s, t)
/// appears once in `s.outgoing` and once in `t.incoming`. Undirected
/// traversal reads both lists of a vertex.
#[derive(Debug, Clone)]
pub(crate) struct VertexRecord<E> {
    pub weight: f64,
    /// Edges whose stored target is this vertex.
    pub incoming: SmallVec<[E; 4]>,
    /// Edges whose stored source is this vertex.
    pub outgoing: SmallVec<[E; 4]>,
}

impl<E> VertexRecord<E> {
    pub fn new() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            incoming: SmallVec::new(),
            outgoing: SmallVec::new(),
        }
    }
}

/// Per-edge row: endpoints, weight, and whether the graph materialized the
/// value through its edge factory (and therefore disposes it on removal).
#[derive(Debug, Clone)]
pub(crate) struct EdgeRecord<V> {
    pub source: V,
    pub target: V,
    pub weight: f64,
    pub owned: bool,
}

impl<V> EdgeRecord<V> {
    pub fn new(source: V, target: V) -> Self {
        Self {
            source,
            target,
            weight: DEFAULT_WEIGHT,
            owned: false,
        }
    }

    pub fn is_loop(&self) -> bool
    where
        V: PartialEq,
    {
        self.source == self.target
    }
}

//! Graph core — vertex/edge storage, structural mutation, versioning, and
//! event dispatch.
//!
//! Mutation is single-writer by construction (`&mut self`); every successful
//! topology change bumps the structural version and swaps the path cache.
//! Queries take `&self` and may populate the cache and the all-pairs memo
//! through interior mutability.

mod build;
mod query;

pub use build::{EdgeEndpoints, EdgeFactory, GraphBuilder};

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use crate::cache::PathCache;
use crate::event::{GraphEvent, GraphListener, ListenerRegistry};
use crate::model::{DEFAULT_WEIGHT, EdgeRecord, GraphKey, VertexRecord};
use crate::solve::RouteSolver;
use crate::solve::floyd_warshall::AllPairsMemo;
use crate::{Error, Result};

/// A mutable directed or undirected graph over opaque vertex values `V` and
/// edge values `E`, with routing queries dispatched through a configurable
/// [`RouteSolver`].
///
/// Vertex and edge maps keep insertion order, so the vertex indices used by
/// the routing matrix reproduce across identically built graphs.
pub struct Graph<V, E> {
    pub(crate) vertices: IndexMap<V, VertexRecord<E>>,
    pub(crate) edges: IndexMap<E, EdgeRecord<V>>,
    pub(crate) directed: bool,
    pub(crate) edge_based: bool,
    pub(crate) version: u64,
    pub(crate) caching: bool,
    pub(crate) seed_subpaths: bool,
    pub(crate) solver: RouteSolver<V>,
    pub(crate) cache: RwLock<PathCache<V, E>>,
    pub(crate) all_pairs: RwLock<Option<AllPairsMemo<E>>>,
    pub(crate) listeners: ListenerRegistry<V, E>,
    pub(crate) edge_factory: Option<Arc<Mutex<dyn EdgeFactory<V, E> + Send>>>,
}

impl<V: GraphKey, E: GraphKey> Graph<V, E> {
    /// An empty graph with default configuration (Dijkstra, caching on).
    pub fn new(directed: bool) -> Self {
        GraphBuilder::new(directed).build()
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Adds a vertex. Returns false (and changes nothing) if it is already
    /// present.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.vertices.contains_key(&vertex) {
            return false;
        }
        self.vertices.insert(vertex.clone(), VertexRecord::new());
        self.bump_version();
        self.notify(GraphEvent::VertexAdded(vertex));
        true
    }

    /// Adds an edge with an explicit value. Returns false if the value is
    /// already present. Absent endpoints are auto-created, each with its own
    /// `VertexAdded` event.
    pub fn add_edge(&mut self, source: V, target: V, edge: E) -> bool {
        if self.edges.contains_key(&edge) {
            return false;
        }
        self.add_vertex(source.clone());
        self.add_vertex(target.clone());
        self.insert_edge_record(source, target, edge, false);
        true
    }

    /// Adds an edge whose value is materialized by the configured edge
    /// factory. The created value is marked owned, so the graph disposes it
    /// on removal.
    ///
    /// Factory failure aborts the mutation before any state changes and
    /// surfaces as [`Error::Construction`] with the offending endpoints. A
    /// created value equal to an existing edge is disposed again and `None`
    /// returned.
    pub fn add_edge_between(&mut self, source: V, target: V) -> Result<Option<E>> {
        let Some(factory) = self.edge_factory.clone() else {
            return Err(Error::Construction {
                value: format!("({source:?}, {target:?})"),
                reason: "no edge factory configured".into(),
                vertices: self.vertices.len(),
                edges: self.edges.len(),
            });
        };
        let edge = factory
            .lock()
            .create_edge(&source, &target)
            .map_err(|reason| Error::Construction {
                value: format!("({source:?}, {target:?})"),
                reason,
                vertices: self.vertices.len(),
                edges: self.edges.len(),
            })?;
        if self.edges.contains_key(&edge) {
            factory.lock().dispose_edge(&edge);
            return Ok(None);
        }
        self.add_vertex(source.clone());
        self.add_vertex(target.clone());
        self.insert_edge_record(source, target, edge.clone(), true);
        Ok(Some(edge))
    }

    /// Removes a vertex and, first, every edge incident to it (cascading
    /// through full edge-removal semantics). Returns false if absent.
    pub fn remove_vertex(&mut self, vertex: &V) -> bool {
        if !self.vertices.contains_key(vertex) {
            return false;
        }
        let incident = self.edges_of(vertex);
        for edge in &incident {
            self.remove_edge(edge);
        }
        self.vertices.swap_remove(vertex);
        self.bump_version();
        self.notify(GraphEvent::VertexRemoved(vertex.clone()));
        true
    }

    /// Removes an edge: detaches it from both endpoints, disposes the value
    /// through the factory if the graph owns it. Returns false if absent.
    pub fn remove_edge(&mut self, edge: &E) -> bool {
        let Some(record) = self.edges.swap_remove(edge) else {
            return false;
        };
        if let Some(rec) = self.vertices.get_mut(&record.source) {
            rec.outgoing.retain(|e| *e != *edge);
        }
        if let Some(rec) = self.vertices.get_mut(&record.target) {
            rec.incoming.retain(|e| *e != *edge);
        }
        if record.owned {
            if let Some(factory) = self.edge_factory.clone() {
                factory.lock().dispose_edge(edge);
            }
        }
        self.bump_version();
        self.notify(GraphEvent::EdgeRemoved(edge.clone()));
        true
    }

    /// Removes at most one edge connecting the pair (the first parallel edge
    /// found), returning its value.
    pub fn remove_edge_between(&mut self, source: &V, target: &V) -> Option<E> {
        let edge = self.edge_between(source, target)?;
        self.remove_edge(&edge);
        Some(edge)
    }

    fn insert_edge_record(&mut self, source: V, target: V, edge: E, owned: bool) {
        let mut record = EdgeRecord::new(source.clone(), target.clone());
        record.owned = owned;
        self.edges.insert(edge.clone(), record);
        if let Some(rec) = self.vertices.get_mut(&source) {
            rec.outgoing.push(edge.clone());
        }
        if let Some(rec) = self.vertices.get_mut(&target) {
            rec.incoming.push(edge.clone());
        }
        self.bump_version();
        self.notify(GraphEvent::EdgeAdded(edge));
    }

    // ========================================================================
    // Weights
    // ========================================================================

    pub fn vertex_weight(&self, vertex: &V) -> Option<f64> {
        self.vertices.get(vertex).map(|record| record.weight)
    }

    pub fn edge_weight(&self, edge: &E) -> Option<f64> {
        self.edges.get(edge).map(|record| record.weight)
    }

    /// Sets a vertex weight. Not a topology change: the version stays, but
    /// the path cache is swapped so later queries recompute. The all-pairs
    /// memo is untouched; callers discard it themselves.
    pub fn set_vertex_weight(&mut self, vertex: &V, weight: f64) -> bool {
        match self.vertices.get_mut(vertex) {
            Some(record) => {
                record.weight = weight;
                self.cache.get_mut().invalidate_all();
                true
            }
            None => false,
        }
    }

    /// Sets an edge weight. Same invalidation contract as
    /// [`Self::set_vertex_weight`].
    pub fn set_edge_weight(&mut self, edge: &E, weight: f64) -> bool {
        match self.edges.get_mut(edge) {
            Some(record) => {
                record.weight = weight;
                self.cache.get_mut().invalidate_all();
                true
            }
            None => false,
        }
    }

    /// Sum of all edge weights.
    pub fn total_edge_weight(&self) -> f64 {
        self.edges.values().map(|record| record.weight).sum()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.vertices.contains_key(vertex)
    }

    pub fn contains_edge(&self, edge: &E) -> bool {
        self.edges.contains_key(edge)
    }

    /// Whether any edge connects the pair, honoring directedness.
    pub fn contains_edge_between(&self, source: &V, target: &V) -> bool {
        self.edge_between(source, target).is_some()
    }

    /// One edge connecting the pair (the first parallel edge found). For
    /// undirected graphs both orientations match.
    pub fn edge_between(&self, source: &V, target: &V) -> Option<E> {
        let record = self.vertices.get(source)?;
        for edge in &record.outgoing {
            if self.edges.get(edge).is_some_and(|rec| rec.target == *target) {
                return Some(edge.clone());
            }
        }
        if !self.directed {
            for edge in &record.incoming {
                if self
                    .edges
                    .get(edge)
                    .is_some_and(|rec| rec.source == *target && !rec.is_loop())
                {
                    return Some(edge.clone());
                }
            }
        }
        None
    }

    /// All edges connecting the pair, including parallels.
    pub fn edges_between(&self, source: &V, target: &V) -> Vec<E> {
        let Some(record) = self.vertices.get(source) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for edge in &record.outgoing {
            if self.edges.get(edge).is_some_and(|rec| rec.target == *target) {
                found.push(edge.clone());
            }
        }
        if !self.directed {
            for edge in &record.incoming {
                if self
                    .edges
                    .get(edge)
                    .is_some_and(|rec| rec.source == *target && !rec.is_loop())
                {
                    found.push(edge.clone());
                }
            }
        }
        found
    }

    /// Every edge incident to the vertex, in either direction. Self-loops
    /// appear once.
    pub fn edges_of(&self, vertex: &V) -> Vec<E> {
        let Some(record) = self.vertices.get(vertex) else {
            return Vec::new();
        };
        let mut incident: Vec<E> = record.outgoing.iter().cloned().collect();
        for edge in &record.incoming {
            if self.edges.get(edge).is_some_and(|rec| !rec.is_loop()) {
                incident.push(edge.clone());
            }
        }
        incident
    }

    /// Edges whose stored target is this vertex.
    pub fn incoming_edges_of(&self, vertex: &V) -> Vec<E> {
        self.vertices
            .get(vertex)
            .map(|record| record.incoming.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Edges whose stored source is this vertex.
    pub fn outgoing_edges_of(&self, vertex: &V) -> Vec<E> {
        self.vertices
            .get(vertex)
            .map(|record| record.outgoing.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn in_degree_of(&self, vertex: &V) -> usize {
        self.vertices.get(vertex).map_or(0, |record| record.incoming.len())
    }

    pub fn out_degree_of(&self, vertex: &V) -> usize {
        self.vertices.get(vertex).map_or(0, |record| record.outgoing.len())
    }

    /// In-degree plus out-degree; a self-loop counts twice.
    pub fn degree_of(&self, vertex: &V) -> usize {
        self.in_degree_of(vertex) + self.out_degree_of(vertex)
    }

    /// Stored (source, target) of an edge.
    pub fn edge_endpoints(&self, edge: &E) -> Option<(&V, &V)> {
        self.edges.get(edge).map(|record| (&record.source, &record.target))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.keys()
    }

    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.edges.keys()
    }

    /// Structural version: strictly increases on every successful topology
    /// change, never on failed or no-op mutations.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Whether edges (rather than vertices) are the canonical content, as
    /// declared at construction.
    pub fn is_edge_based(&self) -> bool {
        self.edge_based
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn path_caching_enabled(&self) -> bool {
        self.caching
    }

    /// Turns the path cache on or off. Purely an optimization: queries
    /// return the same routes either way.
    pub fn set_path_caching(&mut self, caching: bool) {
        self.caching = caching;
    }

    pub fn subpath_seeding_enabled(&self) -> bool {
        self.seed_subpaths
    }

    pub fn set_subpath_seeding(&mut self, seeding: bool) {
        self.seed_subpaths = seeding;
    }

    pub fn solver(&self) -> &RouteSolver<V> {
        &self.solver
    }

    /// Selects the routing strategy for subsequent queries. The all-pairs
    /// memo survives a solver change until explicitly discarded.
    pub fn set_solver(&mut self, solver: RouteSolver<V>) {
        self.solver = solver;
    }

    /// Discards the memoized all-pairs tables. The Floyd-Warshall strategy
    /// never detects staleness itself: whoever mutates topology or weights
    /// decides when the memo dies.
    pub fn clear_all_pairs_memo(&self) {
        *self.all_pairs.write() = None;
    }

    pub fn has_all_pairs_memo(&self) -> bool {
        self.all_pairs.read().is_some()
    }

    /// Best cached route for the ordered pair, if the cache holds one. A
    /// `Some` holding an empty sequence is a cached "no route" answer.
    pub fn cached_route(&self, source: &V, target: &V) -> Option<Vec<E>> {
        self.cache.read().best(source, target).cloned()
    }

    /// Number of (source, target) pairs currently cached.
    pub fn cached_pair_count(&self) -> usize {
        self.cache.read().len()
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Registers a listener; false if this exact handle is already known.
    pub fn add_listener(&self, listener: Arc<dyn GraphListener<V, E>>) -> bool {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&self, listener: &Arc<dyn GraphListener<V, E>>) -> bool {
        self.listeners.remove(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ========================================================================
    // Copies
    // ========================================================================

    /// A new graph with the same configuration, topology, and weights, a
    /// shared edge-factory handle, but a fresh version counter, cache, memo,
    /// and listener registry. Ownership flags are not carried over: disposal
    /// duty stays with the originating graph.
    pub fn duplicate(&self) -> Self {
        self.rebuild(false)
    }

    /// Like [`Self::duplicate`], with every edge's source/target flipped.
    pub fn reverse(&self) -> Self {
        self.rebuild(true)
    }

    fn rebuild(&self, flip: bool) -> Self {
        let mut graph = GraphBuilder::new(self.directed)
            .edge_based(self.edge_based)
            .path_caching(self.caching)
            .subpath_seeding(self.seed_subpaths)
            .solver(self.solver.clone())
            .build();
        graph.edge_factory = self.edge_factory.clone();
        for (vertex, record) in &self.vertices {
            graph.add_vertex(vertex.clone());
            if let Some(rec) = graph.vertices.get_mut(vertex) {
                rec.weight = record.weight;
            }
        }
        for (edge, record) in &self.edges {
            let (source, target) = if flip {
                (record.target.clone(), record.source.clone())
            } else {
                (record.source.clone(), record.target.clone())
            };
            graph.add_edge(source, target, edge.clone());
            if let Some(rec) = graph.edges.get_mut(edge) {
                rec.weight = record.weight;
            }
        }
        graph
    }

    // ========================================================================
    // Internals
    // ========================================================================

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
        self.cache.get_mut().invalidate_all();
        tracing::trace!(version = self.version, "topology changed, path cache invalidated");
    }

    fn notify(&self, event: GraphEvent<V, E>) {
        self.listeners.dispatch(self, &event);
    }

    pub(crate) fn index_of(&self, vertex: &V) -> Option<usize> {
        self.vertices.get_index_of(vertex)
    }

    pub(crate) fn vertex_at(&self, index: usize) -> Option<&V> {
        self.vertices.get_index(index).map(|(vertex, _)| vertex)
    }

    pub(crate) fn edge_records(&self) -> impl Iterator<Item = (&E, &EdgeRecord<V>)> {
        self.edges.iter()
    }

    /// Traversable neighbors of a vertex with the connecting edge and its
    /// weight. Directed graphs walk outgoing edges only; undirected graphs
    /// walk both lists, with self-loops yielded once.
    pub(crate) fn neighbor_edges<'a>(
        &'a self,
        vertex: &V,
    ) -> impl Iterator<Item = (&'a E, &'a V, f64)> + use<'a, V, E> {
        let record = self.vertices.get(vertex);
        let outgoing: &[E] = record.map(|r| r.outgoing.as_slice()).unwrap_or_default();
        let incoming: &[E] = if self.directed {
            &[]
        } else {
            record.map(|r| r.incoming.as_slice()).unwrap_or_default()
        };
        let via_out = outgoing
            .iter()
            .filter_map(move |edge| self.edges.get(edge).map(|rec| (edge, &rec.target, rec.weight)));
        let via_in = incoming.iter().filter_map(move |edge| {
            self.edges
                .get(edge)
                .and_then(|rec| (!rec.is_loop()).then(|| (edge, &rec.source, rec.weight)))
        });
        via_out.chain(via_in)
    }

    /// Vertices visited by walking `route` from `source`, the start
    /// included. Resolves each edge's far endpoint, which for undirected
    /// graphs may be its stored source.
    pub(crate) fn route_vertices(&self, source: &V, route: &[E]) -> Vec<V> {
        let mut chain = Vec::with_capacity(route.len() + 1);
        chain.push(source.clone());
        let mut cursor = source.clone();
        for edge in route {
            let Some(record) = self.edges.get(edge) else {
                break;
            };
            let next = if record.source == cursor {
                record.target.clone()
            } else {
                record.source.clone()
            };
            chain.push(next.clone());
            cursor = next;
        }
        chain
    }

    /// Minimum-weight edge among the parallels connecting the pair.
    pub(crate) fn min_weight_edge_between(&self, source: &V, target: &V) -> Option<E> {
        let mut best: Option<(f64, E)> = None;
        for edge in self.edges_between(source, target) {
            let weight = self.edge_weight(&edge).unwrap_or(DEFAULT_WEIGHT);
            if best.as_ref().is_none_or(|(known, _)| weight < *known) {
                best = Some((weight, edge));
            }
        }
        best.map(|(_, edge)| edge)
    }
}

/// Plain-pair edges need no factory: the value is the endpoint pair itself.
impl<V: GraphKey> Graph<V, (V, V)> {
    /// Adds an auto-generated `(source, target)` pair edge. `None` if that
    /// pair value already exists.
    pub fn add_pair_edge(&mut self, source: V, target: V) -> Option<(V, V)> {
        let edge = (source.clone(), target.clone());
        if self.add_edge(source, target, edge.clone()) {
            Some(edge)
        } else {
            None
        }
    }
}

impl<V: GraphKey, E: GraphKey> fmt::Display for Graph<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.directed { "directed" } else { "undirected" };
        if self.edge_based {
            write!(
                f,
                "{kind} graph: {} edges over {} vertices",
                self.edges.len(),
                self.vertices.len()
            )
        } else {
            write!(
                f,
                "{kind} graph: {} vertices, {} edges",
                self.vertices.len(),
                self.edges.len()
            )
        }
    }
}

impl<V: GraphKey, E: GraphKey> fmt::Debug for Graph<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("directed", &self.directed)
            .field("edge_based", &self.edge_based)
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edges.len())
            .field("version", &self.version)
            .field("solver", &self.solver)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_bookkeeping_on_add_and_remove() {
        let mut g: Graph<&str, u32> = Graph::directed();
        assert!(g.add_edge("a", "b", 1));
        assert!(g.add_edge("a", "c", 2));
        assert_eq!(g.out_degree_of(&"a"), 2);
        assert_eq!(g.in_degree_of(&"b"), 1);

        assert!(g.remove_edge(&1));
        assert_eq!(g.out_degree_of(&"a"), 1);
        assert_eq!(g.in_degree_of(&"b"), 0);
        assert!(!g.contains_edge(&1));
    }

    #[test]
    fn undirected_edge_visible_from_both_sides() {
        let mut g: Graph<u32, u32> = Graph::undirected();
        g.add_edge(1, 2, 7);
        assert!(g.contains_edge_between(&1, &2));
        assert!(g.contains_edge_between(&2, &1));
        assert_eq!(g.edge_between(&2, &1), Some(7));
        let neighbors: Vec<u32> = g.neighbor_edges(&2).map(|(_, v, _)| *v).collect();
        assert_eq!(neighbors, vec![1]);
    }

    #[test]
    fn self_loop_counted_once_in_edges_of_twice_in_degree() {
        let mut g: Graph<u32, u32> = Graph::undirected();
        g.add_edge(1, 1, 9);
        assert_eq!(g.edges_of(&1), vec![9]);
        assert_eq!(g.degree_of(&1), 2);
    }

    #[test]
    fn reverse_flips_endpoints_and_keeps_weights() {
        let mut g: Graph<&str, u32> = Graph::directed();
        g.add_edge("a", "b", 1);
        g.set_edge_weight(&1, 4.5);
        let r = g.reverse();
        assert_eq!(r.edge_endpoints(&1), Some((&"b", &"a")));
        assert_eq!(r.edge_weight(&1), Some(4.5));
        assert!(r.contains_edge_between(&"b", &"a"));
    }

    #[test]
    fn pair_edges_need_no_factory() {
        let mut g: Graph<u32, (u32, u32)> = Graph::directed();
        assert_eq!(g.add_pair_edge(1, 2), Some((1, 2)));
        assert_eq!(g.add_pair_edge(1, 2), None, "same pair value again");
        assert_eq!(g.edge_count(), 1);
    }
}

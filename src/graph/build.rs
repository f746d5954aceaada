//! Graph construction — builder, edge factory, edge-representation traits.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use super::Graph;
use crate::cache::PathCache;
use crate::event::ListenerRegistry;
use crate::model::GraphKey;
use crate::solve::RouteSolver;

/// Materializes live edge entities on demand, and releases them again when
/// the graph removes an edge it owns. The simulation layer implements this
/// for its own edge types; the graph only records ownership.
pub trait EdgeFactory<V, E> {
    /// Builds an edge value for the given endpoints. The reason string of a
    /// failure is wrapped into [`crate::Error::Construction`] together with
    /// the graph state, before any mutation is committed.
    fn create_edge(&mut self, source: &V, target: &V) -> Result<E, String>;

    /// Releases a value this factory created. Invoked when the graph removes
    /// an owned edge, or immediately when a freshly created value duplicates
    /// an existing edge.
    fn dispose_edge(&mut self, _edge: &E) {}
}

/// An edge representation whose endpoints can be derived, so a graph can be
/// built from a plain collection of edges.
pub trait EdgeEndpoints<V> {
    fn source(&self) -> V;
    fn target(&self) -> V;
}

impl<V: Clone> EdgeEndpoints<V> for (V, V) {
    fn source(&self) -> V {
        self.0.clone()
    }

    fn target(&self) -> V {
        self.1.clone()
    }
}

/// Configures and builds a [`Graph`].
///
/// ```rust
/// use routegraph::{GraphBuilder, RouteSolver};
///
/// let graph: routegraph::Graph<u32, (u32, u32)> = GraphBuilder::new(false)
///     .solver(RouteSolver::FloydWarshall)
///     .from_edges([(1, 2), (2, 3), (3, 4)]);
/// assert_eq!(graph.vertex_count(), 4);
/// assert!(graph.is_edge_based());
/// ```
pub struct GraphBuilder<V, E> {
    directed: bool,
    edge_based: bool,
    caching: bool,
    seed_subpaths: bool,
    solver: RouteSolver<V>,
    factory: Option<Arc<Mutex<dyn EdgeFactory<V, E> + Send>>>,
    weight_fn: Option<Box<dyn Fn(&E) -> f64>>,
}

impl<V: GraphKey, E: GraphKey> GraphBuilder<V, E> {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            edge_based: false,
            caching: true,
            seed_subpaths: true,
            solver: RouteSolver::default(),
            factory: None,
            weight_fn: None,
        }
    }

    /// Marks edges (rather than vertices) as the canonical content of the
    /// built graph. `from_edges` sets this automatically.
    pub fn edge_based(mut self, edge_based: bool) -> Self {
        self.edge_based = edge_based;
        self
    }

    /// Enables or disables the path cache (on by default).
    pub fn path_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }

    /// Enables or disables optimal-subpath seeding (on by default). Only
    /// meaningful while caching is on.
    pub fn subpath_seeding(mut self, seeding: bool) -> Self {
        self.seed_subpaths = seeding;
        self
    }

    /// Selects the initial routing strategy (Dijkstra by default).
    pub fn solver(mut self, solver: RouteSolver<V>) -> Self {
        self.solver = solver;
        self
    }

    /// Installs the factory that materializes live edge entities for
    /// [`Graph::add_edge_between`].
    pub fn edge_factory(mut self, factory: impl EdgeFactory<V, E> + Send + 'static) -> Self {
        self.factory = Some(Arc::new(Mutex::new(factory)));
        self
    }

    /// Derives each edge's weight from its value during `from_edges`.
    pub fn edge_weights_with(mut self, weight: impl Fn(&E) -> f64 + 'static) -> Self {
        self.weight_fn = Some(Box::new(weight));
        self
    }

    /// Builds an empty graph.
    pub fn build(self) -> Graph<V, E> {
        Graph {
            vertices: IndexMap::new(),
            edges: IndexMap::new(),
            directed: self.directed,
            edge_based: self.edge_based,
            version: 1,
            caching: self.caching,
            seed_subpaths: self.seed_subpaths,
            solver: self.solver,
            cache: RwLock::new(PathCache::new()),
            all_pairs: RwLock::new(None),
            listeners: ListenerRegistry::new(),
            edge_factory: self.factory,
        }
    }

    /// Builds a graph seeded with the given vertices and no edges.
    pub fn from_vertices(self, vertices: impl IntoIterator<Item = V>) -> Graph<V, E> {
        let mut graph = self.build();
        for vertex in vertices {
            graph.add_vertex(vertex);
        }
        graph
    }

    /// Builds an edge-based graph from edge representations, auto-creating
    /// the endpoint vertices and applying any configured weight derivation.
    pub fn from_edges(mut self, edges: impl IntoIterator<Item = E>) -> Graph<V, E>
    where
        E: EdgeEndpoints<V>,
    {
        self.edge_based = true;
        let weight_fn = self.weight_fn.take();
        let mut graph = self.build();
        for edge in edges {
            let (source, target) = (edge.source(), edge.target());
            let weight = weight_fn.as_ref().map(|derive| derive(&edge));
            if graph.add_edge(source, target, edge.clone()) {
                if let Some(w) = weight {
                    if let Some(record) = graph.edges.get_mut(&edge) {
                        record.weight = w;
                    }
                }
            }
        }
        graph
    }
}

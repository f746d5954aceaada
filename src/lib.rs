//! # routegraph — Mutable Graph Core for Agent-Based Simulations
//!
//! A general-purpose graph abstraction for simulation platforms that issue
//! shortest-path and routing queries repeatedly while the underlying network
//! keeps changing.
//!
//! ## Design Principles
//!
//! 1. **Mutation is explicit**: topology changes go through `&mut self`,
//!    bump a structural version counter, and invalidate cached routing
//!    wholesale
//! 2. **Strategies are a closed set**: `RouteSolver` selects Floyd-Warshall,
//!    Bellman-Ford, Dijkstra, or A* — swappable at runtime, no subclassing
//! 3. **Caching is pure optimization**: disabling the path cache changes
//!    nothing but speed
//! 4. **Routing state is portable**: a next-hop matrix round-trips
//!    precomputed routes across runs with unchanged topology
//!
//! ## Quick Start
//!
//! ```rust
//! use routegraph::Graph;
//!
//! // Road triangle: three junctions, unit-weight segments.
//! let mut g: Graph<&str, (&str, &str)> = Graph::undirected();
//! g.add_edge("a", "b", ("a", "b"));
//! g.add_edge("b", "c", ("b", "c"));
//! g.add_edge("a", "c", ("a", "c"));
//!
//! let route = g.best_route_between(&"a", &"c")?;
//! assert_eq!(route, vec![("a", "c")]);
//! # Ok::<(), routegraph::Error>(())
//! ```
//!
//! ## Strategy Selection
//!
//! | Solver | Scope | Weights |
//! |--------|-------|---------|
//! | `FloydWarshall` | all pairs, memoized on the graph | any (no cycle check) |
//! | `BellmanFord` | single source per query | negative allowed, cycles detected |
//! | `Dijkstra` | single pair (default) | nonnegative |
//! | `AStar` | single pair with injected heuristic | nonnegative |

// ============================================================================
// Modules
// ============================================================================

pub mod event;
pub mod graph;
pub mod matrix;
pub mod model;
pub mod solve;

mod cache;

// ============================================================================
// Re-exports: Graph core
// ============================================================================

pub use graph::{EdgeEndpoints, EdgeFactory, Graph, GraphBuilder};

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{GraphKey, Route};

// ============================================================================
// Re-exports: Events, strategies, persistence
// ============================================================================

pub use event::{GraphEvent, GraphListener};
pub use matrix::RoutingMatrix;
pub use solve::RouteSolver;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An edge value could not be materialized from its endpoints. The
    /// mutation that triggered construction was aborted; the graph is
    /// unchanged.
    #[error("cannot create edge from {value} in graph ({vertices} vertices, {edges} edges): {reason}")]
    Construction {
        value: String,
        reason: String,
        vertices: usize,
        edges: usize,
    },

    /// Bellman-Ford found a negative-weight cycle reachable from the query
    /// source. Raised instead of returning a silently wrong route.
    #[error("negative cycle reachable from {vertex}")]
    NegativeCycle { vertex: String },

    /// A routing matrix handed to `load_routing_matrix` (or decoded from
    /// JSON) is unusable: wrong shape, out-of-range cell, a prescribed hop
    /// with no matching edge, or a next-hop walk that fails to converge
    /// within the vertex-count bound.
    #[error("malformed routing matrix: {reason}")]
    MalformedMatrix { reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

//! End-to-end integration tests for routing-matrix save and load.
//!
//! Tests next-hop extraction on both save paths, JSON round-tripping, cache
//! rebuild on load (including cached unreachability), minimum-weight
//! parallel-edge selection, and rejection of malformed matrices without
//! touching the live cache.

use pretty_assertions::assert_eq;
use routegraph::{Error, Graph, RouteSolver, RoutingMatrix};

// ============================================================================
// Helper: weighted diamond, vertex insertion order a, b, d, c.
// ============================================================================

fn diamond() -> Graph<&'static str, u32> {
    let mut g = Graph::directed();
    g.add_edge("a", "b", 1);
    g.add_edge("b", "d", 2);
    g.add_edge("a", "c", 3);
    g.add_edge("c", "d", 4);
    g.set_edge_weight(&4, 3.0);
    g
}

const VERTICES: [&str; 4] = ["a", "b", "d", "c"];

// ============================================================================
// 1. Saving — per-pair route walks fill the next-hop cells
// ============================================================================

#[test]
fn test_save_records_next_hops_along_best_routes() {
    let g = diamond();
    let m = g.save_routing_matrix().unwrap();

    assert_eq!(m.vertex_count(), 4);
    // a -> d goes over the top: first hop is b (index 1), then d (index 2)
    assert_eq!(m.next_hop(0, 2), Some(1));
    assert_eq!(m.next_hop(1, 2), Some(2));
    assert_eq!(m.next_hop(0, 3), Some(3));
    assert_eq!(m.next_hop(3, 2), Some(2));

    assert_eq!(m.next_hop(2, 0), None, "d reaches nothing");
    assert_eq!(m.next_hop(0, 0), None, "diagonal is the sentinel");
    assert_eq!(m.next_hop(9, 0), None, "out of range");
}

#[test]
fn test_save_from_all_pairs_memo_matches_per_pair_walks() {
    let slow = diamond().save_routing_matrix().unwrap();

    let mut g = diamond();
    g.set_solver(RouteSolver::FloydWarshall);
    g.best_route_between(&"a", &"d").unwrap();
    assert!(g.has_all_pairs_memo());
    let fast = g.save_routing_matrix().unwrap();

    assert_eq!(fast, slow);
}

// ============================================================================
// 2. JSON round trip
// ============================================================================

#[test]
fn test_matrix_survives_json() {
    let m = diamond().save_routing_matrix().unwrap();
    let text = m.to_json();
    let back = RoutingMatrix::from_json(&text).unwrap();
    assert_eq!(back, m);
}

#[test]
fn test_from_json_rejects_malformed_text() {
    for text in [
        "",
        "not a matrix",
        r#"{"n":2}"#,
        r#"{"n":2,"cells":[0,0,0]}"#,
        r#"{"n":2,"cells":[0,9,1,1]}"#,
        // dimension whose square overflows usize
        r#"{"n":4294967296,"cells":[]}"#,
    ] {
        assert!(
            matches!(RoutingMatrix::from_json(text), Err(Error::MalformedMatrix { .. })),
            "accepted: {text}"
        );
    }
}

// ============================================================================
// 3. Loading — cache rebuild, unreachable pairs, parallel edges
// ============================================================================

#[test]
fn test_load_rebuilds_the_path_cache() {
    let m = diamond().save_routing_matrix().unwrap();

    let g = diamond();
    assert_eq!(g.cached_pair_count(), 0);
    g.load_routing_matrix(&m).unwrap();

    assert_eq!(g.cached_pair_count(), 16, "every ordered pair gets an entry");
    assert_eq!(g.cached_route(&"a", &"d"), Some(vec![1, 2]));
    assert_eq!(g.cached_route(&"c", &"d"), Some(vec![4]));
    assert_eq!(g.cached_route(&"d", &"a"), Some(Vec::new()), "unreachability is cached");
    assert_eq!(g.cached_route(&"a", &"a"), Some(Vec::new()));

    // queries replay the loaded routes
    assert_eq!(g.best_route_between(&"a", &"d").unwrap(), vec![1, 2]);
    assert_eq!(g.best_route_between(&"d", &"a").unwrap(), Vec::<u32>::new());
}

#[test]
fn test_loaded_routes_weigh_the_same_as_computed_ones() {
    let m = diamond().save_routing_matrix().unwrap();
    let loaded = diamond();
    loaded.load_routing_matrix(&m).unwrap();
    let reference = diamond();

    for s in VERTICES {
        for t in VERTICES {
            let replayed = loaded.cached_route(&s, &t).unwrap();
            let computed = reference.best_route_between(&s, &t).unwrap();
            assert_eq!(
                loaded.route_weight(&replayed),
                reference.route_weight(&computed),
                "weight mismatch for {s} -> {t}"
            );
        }
    }
}

#[test]
fn test_load_picks_the_cheapest_parallel_edge() {
    let mut g: Graph<u32, u32> = Graph::directed();
    g.add_edge(1, 2, 91);
    g.add_edge(1, 2, 92);
    g.set_edge_weight(&91, 5.0);
    g.set_edge_weight(&92, 1.5);

    let m = g.save_routing_matrix().unwrap();
    g.load_routing_matrix(&m).unwrap();
    assert_eq!(g.cached_route(&1, &2), Some(vec![92]));
}

// ============================================================================
// 4. Rejection — malformed matrices leave the cache untouched
// ============================================================================

#[test]
fn test_load_rejects_dimension_mismatch() {
    let m = diamond().save_routing_matrix().unwrap();

    let mut small: Graph<&str, u32> = Graph::directed();
    small.add_edge("a", "b", 1);
    small.add_edge("b", "c", 2);

    match small.load_routing_matrix(&m) {
        Err(Error::MalformedMatrix { reason }) => {
            assert_eq!(reason, "matrix is for 4 vertices, the graph has 3");
        }
        other => panic!("expected a malformed-matrix error, got {other:?}"),
    }
    assert_eq!(small.cached_pair_count(), 0);
}

#[test]
fn test_load_rejects_missing_prescribed_edge() {
    let m = diamond().save_routing_matrix().unwrap();

    // Same vertices in the same order, but b -> d is gone.
    let mut g: Graph<&str, u32> = Graph::directed();
    g.add_edge("a", "b", 1);
    g.add_vertex("d");
    g.add_edge("a", "c", 3);
    g.add_edge("c", "d", 4);

    let err = g.load_routing_matrix(&m).unwrap_err();
    assert!(
        matches!(&err, Error::MalformedMatrix { reason } if reason.contains("no edge")),
        "got {err:?}"
    );
    assert_eq!(g.cached_pair_count(), 0, "failed load must not leave partial state");
}

#[test]
fn test_load_rejects_non_convergent_walks() {
    let mut g: Graph<u32, u32> = Graph::directed();
    g.add_edge(1, 2, 12);
    g.add_edge(2, 1, 21);
    g.add_vertex(3);

    // Cells for (0 -> 2) and (1 -> 2) point at each other: the walk
    // ping-pongs and must trip the hop bound.
    let m = RoutingMatrix::from_json(r#"{"n":3,"cells":[0,1,1,0,1,0,2,2,2]}"#).unwrap();
    let err = g.load_routing_matrix(&m).unwrap_err();
    assert!(
        matches!(&err, Error::MalformedMatrix { reason } if reason.contains("3 hops")),
        "got {err:?}"
    );
    assert_eq!(g.cached_pair_count(), 0);
}

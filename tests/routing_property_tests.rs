//! Property-based agreement tests for the routing strategies.
//!
//! These tests throw randomized sparse graphs with strictly positive weights
//! at every routing strategy and require agreement on reachability and route
//! weight, ranked K output, version accounting, and matrix round-trips.

use proptest::{
    collection::vec,
    prelude::{Just, Strategy, any, prop_assert, prop_assert_eq},
    proptest,
    test_runner::{Config as ProptestConfig, FileFailurePersistence},
};
use routegraph::{Graph, GraphBuilder, RouteSolver};

const ROUTING_PROP_CASES: u32 = 96;

/// Summed float weights may associate differently per strategy.
const WEIGHT_EPSILON: f64 = 1.0e-9;

fn sparse_graph_strategy() -> impl Strategy<Value = (usize, Vec<(u32, u32, f64)>, bool)> {
    (2_usize..7).prop_flat_map(|n| {
        let edges = vec((0..n as u32, 0..n as u32, 1.0_f64..10.0), 0..=n * 3);
        (Just(n), edges, any::<bool>())
    })
}

fn routing_proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: ROUTING_PROP_CASES,
        // Integration tests do not have a nearby lib.rs/main.rs, so set an
        // explicit persistence root for reproducible counterexamples.
        failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
            "routing-property-regressions",
        ))),
        ..ProptestConfig::default()
    }
}

fn build(n: usize, edges: &[(u32, u32, f64)], directed: bool) -> Graph<u32, u32> {
    let mut graph = GraphBuilder::new(directed).from_vertices(0..n as u32);
    for (id, (source, target, weight)) in edges.iter().enumerate() {
        let edge = id as u32;
        graph.add_edge(*source, *target, edge);
        graph.set_edge_weight(&edge, *weight);
    }
    graph
}

proptest! {
    #![proptest_config(routing_proptest_config())]

    #[test]
    fn test_every_strategy_agrees_on_reachability_and_weight(
        (n, edges, directed) in sparse_graph_strategy()
    ) {
        let reference = build(n, &edges, directed);

        let mut others = Vec::new();
        for solver in [
            RouteSolver::BellmanFord,
            RouteSolver::FloydWarshall,
            RouteSolver::astar(|_, _| 0.0),
        ] {
            let mut graph = build(n, &edges, directed);
            graph.set_solver(solver);
            others.push(graph);
        }

        for s in 0..n as u32 {
            for t in 0..n as u32 {
                let expected = reference.best_route_between(&s, &t).unwrap();
                let expected_weight = reference.route_weight(&expected);
                for graph in &others {
                    let route = graph.best_route_between(&s, &t).unwrap();
                    prop_assert_eq!(
                        route.is_empty(),
                        expected.is_empty(),
                        "reachability mismatch for {} -> {} under {:?}",
                        s,
                        t,
                        graph.solver()
                    );
                    let weight = graph.route_weight(&route);
                    prop_assert!(
                        (weight - expected_weight).abs() <= WEIGHT_EPSILON,
                        "weight mismatch for {} -> {} under {:?}: {} vs {}",
                        s,
                        t,
                        graph.solver(),
                        weight,
                        expected_weight
                    );
                }
            }
        }
    }

    #[test]
    fn test_undirected_routes_weigh_the_same_both_ways(
        (n, edges, _) in sparse_graph_strategy()
    ) {
        let graph = build(n, &edges, false);
        for s in 0..n as u32 {
            for t in 0..n as u32 {
                let forward = graph.route_weight(&graph.best_route_between(&s, &t).unwrap());
                let backward = graph.route_weight(&graph.best_route_between(&t, &s).unwrap());
                prop_assert!(
                    (forward - backward).abs() <= WEIGHT_EPSILON,
                    "asymmetric weight between {} and {}: {} vs {}",
                    s,
                    t,
                    forward,
                    backward
                );
            }
        }
    }

    #[test]
    fn test_k_ranking_is_sound(
        (n, edges, directed) in sparse_graph_strategy()
    ) {
        let graph = build(n, &edges, directed);
        for s in 0..n as u32 {
            for t in 0..n as u32 {
                if s == t {
                    continue;
                }
                let ranked = graph.k_best_routes_between(&s, &t, 4).unwrap();

                for window in ranked.windows(2) {
                    prop_assert!(
                        graph.route_weight(&window[0])
                            <= graph.route_weight(&window[1]) + WEIGHT_EPSILON,
                        "ranking out of order for {} -> {}",
                        s,
                        t
                    );
                }
                for (i, a) in ranked.iter().enumerate() {
                    for b in ranked.iter().skip(i + 1) {
                        prop_assert!(a != b, "duplicate alternative for {} -> {}", s, t);
                    }
                }
                let best = graph.best_route_between(&s, &t).unwrap();
                prop_assert_eq!(
                    ranked.is_empty(),
                    best.is_empty(),
                    "K disagreement on reachability for {} -> {}",
                    s,
                    t
                );
                if let Some(first) = ranked.first() {
                    prop_assert!(
                        (graph.route_weight(first) - graph.route_weight(&best)).abs()
                            <= WEIGHT_EPSILON,
                        "first alternative is not a best route for {} -> {}",
                        s,
                        t
                    );
                }
            }
        }
    }

    #[test]
    fn test_version_counts_every_successful_mutation(
        (n, edges, directed) in sparse_graph_strategy()
    ) {
        let graph = build(n, &edges, directed);
        // fresh graph at 1, one bump per seeded vertex, one per edge; the
        // endpoints all pre-exist, so edge adds bump exactly once each
        prop_assert_eq!(graph.version(), 1 + n as u64 + edges.len() as u64);
    }

    #[test]
    fn test_matrix_round_trip_replays_equal_weights(
        (n, edges, directed) in sparse_graph_strategy()
    ) {
        let graph = build(n, &edges, directed);
        let matrix = graph.save_routing_matrix().unwrap();
        let text = matrix.to_json();
        let decoded = routegraph::RoutingMatrix::from_json(&text).unwrap();

        let replay = graph.duplicate();
        replay.load_routing_matrix(&decoded).unwrap();

        for s in 0..n as u32 {
            for t in 0..n as u32 {
                let loaded = replay.cached_route(&s, &t);
                prop_assert!(loaded.is_some(), "no entry loaded for {} -> {}", s, t);
                let loaded = loaded.unwrap();
                let computed = graph.best_route_between(&s, &t).unwrap();
                prop_assert_eq!(
                    loaded.is_empty(),
                    computed.is_empty(),
                    "reachability lost in round trip for {} -> {}",
                    s,
                    t
                );
                prop_assert!(
                    (replay.route_weight(&loaded) - graph.route_weight(&computed)).abs()
                        <= WEIGHT_EPSILON,
                    "weight drift in round trip for {} -> {}",
                    s,
                    t
                );
            }
        }
    }
}

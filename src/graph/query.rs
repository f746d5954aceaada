//! Query surface — cache consult, strategy dispatch, optimal-subpath
//! seeding, K-shortest entry points.
//!
//! Flow per query: consult the path cache (Floyd-Warshall bypasses it and
//! uses the all-pairs memo instead), otherwise delegate to the configured
//! strategy, then populate the cache when caching is on. A cached empty
//! sequence short-circuits later queries for a known-unreachable pair.

use super::Graph;
use crate::Result;
use crate::model::{DEFAULT_WEIGHT, GraphKey, Route};
use crate::solve::{self, RouteSolver};

impl<V: GraphKey, E: GraphKey> Graph<V, E> {
    /// Best edge sequence from `source` to `target` under the configured
    /// strategy. Empty when the endpoints coincide, either is missing, or no
    /// route exists. Bellman-Ford may fail with
    /// [`crate::Error::NegativeCycle`].
    pub fn best_route_between(&self, source: &V, target: &V) -> Result<Vec<E>> {
        if source == target {
            return Ok(Vec::new());
        }
        if !self.contains_vertex(source) || !self.contains_vertex(target) {
            return Ok(Vec::new());
        }

        if let RouteSolver::FloydWarshall = self.solver {
            return Ok(self.all_pairs_route(source, target));
        }

        if let Some(cached) = self.cached_route_hit(source, target) {
            return Ok(cached);
        }

        let route = match &self.solver {
            RouteSolver::FloydWarshall => unreachable!("handled above"),
            RouteSolver::BellmanFord => solve::bellman_ford::best_route(self, source, target)?,
            RouteSolver::Dijkstra => solve::dijkstra::best_route(self, source, target, None, None),
            RouteSolver::AStar { heuristic } => {
                solve::astar::best_route(self, source, target, heuristic.as_ref())
            }
        };
        self.store_route(source, target, &route);
        Ok(route)
    }

    /// Like [`Self::best_route_between`], wrapped as a [`Route`] with its
    /// total weight. `None` when unreachable; a source queried against
    /// itself yields an empty route of weight zero.
    pub fn route_between(&self, source: &V, target: &V) -> Result<Option<Route<V, E>>> {
        let edges = self.best_route_between(source, target)?;
        if edges.is_empty() && source != target {
            return Ok(None);
        }
        let weight = self.route_weight(&edges);
        Ok(Some(Route::new(source.clone(), target.clone(), edges, weight)))
    }

    /// Up to `k` loopless routes ranked by ascending total weight
    /// (Yen-style, always over the exclusion-aware Dijkstra engine; see
    /// module docs in `solve`).
    ///
    /// A cache entry already holding at least `k` alternatives answers
    /// directly; otherwise the enumeration runs fresh and, with caching on,
    /// every found alternative replaces the entry.
    pub fn k_best_routes_between(&self, source: &V, target: &V, k: usize) -> Result<Vec<Vec<E>>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        if !self.contains_vertex(source) || !self.contains_vertex(target) {
            return Ok(Vec::new());
        }
        if source == target {
            return Ok(vec![Vec::new()]);
        }
        if self.caching {
            let cache = self.cache.read();
            if let Some(ranked) = cache.ranked(source, target) {
                if ranked.len() >= k {
                    return Ok(ranked[..k].to_vec());
                }
            }
        }
        let routes = solve::yen::k_best_routes(self, source, target, k);
        if self.caching {
            self.cache
                .write()
                .store_ranked(source.clone(), target.clone(), routes.clone());
        }
        Ok(routes)
    }

    /// [`Self::k_best_routes_between`] wrapped as [`Route`] values.
    pub fn k_shortest_routes_between(
        &self,
        source: &V,
        target: &V,
        k: usize,
    ) -> Result<Vec<Route<V, E>>> {
        let ranked = self.k_best_routes_between(source, target, k)?;
        Ok(ranked
            .into_iter()
            .map(|edges| {
                let weight = self.route_weight(&edges);
                Route::new(source.clone(), target.clone(), edges, weight)
            })
            .collect())
    }

    /// Total weight of an arbitrary edge sequence. Values not present in
    /// the graph weigh 1.0.
    pub fn route_weight(&self, route: &[E]) -> f64 {
        route
            .iter()
            .map(|edge| self.edge_weight(edge).unwrap_or(DEFAULT_WEIGHT))
            .sum()
    }

    // ========================================================================
    // Cache plumbing
    // ========================================================================

    fn cached_route_hit(&self, source: &V, target: &V) -> Option<Vec<E>> {
        if !self.caching {
            return None;
        }
        let hit = self.cache.read().best(source, target).cloned();
        if hit.is_some() {
            tracing::trace!("path cache hit");
        }
        hit
    }

    /// Stores the computed route and, when seeding is on, the suffix for
    /// every intermediate vertex: subpaths of shortest paths are themselves
    /// shortest under nonnegative weights. The full entry always replaces;
    /// suffixes never clobber existing entries.
    fn store_route(&self, source: &V, target: &V, route: &[E]) {
        if !self.caching {
            return;
        }
        let mut cache = self.cache.write();
        cache.store_best(source.clone(), target.clone(), route.to_vec());
        if !self.seed_subpaths || route.is_empty() {
            return;
        }
        let chain = self.route_vertices(source, route);
        if chain.len() != route.len() + 1 {
            return;
        }
        for i in 1..route.len() {
            let intermediate = &chain[i];
            if intermediate == target {
                continue;
            }
            cache.store_if_absent(intermediate.clone(), target.clone(), route[i..].to_vec());
        }
    }

    fn all_pairs_route(&self, source: &V, target: &V) -> Vec<E> {
        let (Some(s), Some(t)) = (self.index_of(source), self.index_of(target)) else {
            return Vec::new();
        };
        {
            let memo = self.all_pairs.read();
            if let Some(tables) = memo.as_ref() {
                return tables.route(s, t);
            }
        }
        let tables = solve::floyd_warshall::build(self);
        let route = tables.route(s, t);
        *self.all_pairs.write() = Some(tables);
        route
    }
}

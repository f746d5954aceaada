//! Path cache — ranked route alternatives keyed by ordered (source, target).
//!
//! Entries are created lazily by queries and evicted en masse whenever the
//! graph's structural version changes. A stored empty sequence is a positive
//! "no route exists" answer, distinct from cache absence.

use hashbrown::HashMap;

use crate::model::GraphKey;

/// Cached shortest-path results. The first entry of each ranked list is the
/// best known route for its pair.
///
/// Keys stay ordered even for undirected graphs: the (t, s) orientation of a
/// query recomputes rather than reading the (s, t) entry, so each
/// orientation is independently consistent.
#[derive(Debug)]
pub(crate) struct PathCache<V, E> {
    routes: HashMap<(V, V), Vec<Vec<E>>>,
}

impl<V: GraphKey, E: GraphKey> PathCache<V, E> {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Best cached route for the pair, if any.
    pub fn best(&self, source: &V, target: &V) -> Option<&Vec<E>> {
        self.routes
            .get(&(source.clone(), target.clone()))
            .and_then(|ranked| ranked.first())
    }

    /// All cached alternatives for the pair, best first.
    pub fn ranked(&self, source: &V, target: &V) -> Option<&Vec<Vec<E>>> {
        self.routes.get(&(source.clone(), target.clone()))
    }

    /// Stores a single best route, replacing any previous entry (including a
    /// longer ranked list).
    pub fn store_best(&mut self, source: V, target: V, route: Vec<E>) {
        self.routes.insert((source, target), vec![route]);
    }

    /// Stores ranked alternatives, replacing any previous entry.
    pub fn store_ranked(&mut self, source: V, target: V, routes: Vec<Vec<E>>) {
        self.routes.insert((source, target), routes);
    }

    /// Stores a best route only when the pair has no entry yet. Used by
    /// optimal-subpath seeding, which must not clobber fresher results.
    pub fn store_if_absent(&mut self, source: V, target: V, route: Vec<E>) {
        self.routes
            .entry((source, target))
            .or_insert_with(|| vec![route]);
    }

    /// Drops every entry by replacing the backing map. Any topology change
    /// can invalidate unboundedly many routes, so eviction is wholesale,
    /// never selective.
    pub fn invalidate_all(&mut self) {
        self.routes = HashMap::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_fetch_best() {
        let mut cache: PathCache<u32, u32> = PathCache::new();
        cache.store_best(1, 2, vec![10, 11]);
        assert_eq!(cache.best(&1, &2), Some(&vec![10, 11]));
        assert_eq!(cache.best(&2, &1), None, "keys are ordered");
    }

    #[test]
    fn if_absent_never_clobbers() {
        let mut cache: PathCache<u32, u32> = PathCache::new();
        cache.store_best(1, 2, vec![10]);
        cache.store_if_absent(1, 2, vec![99]);
        assert_eq!(cache.best(&1, &2), Some(&vec![10]));
        cache.store_if_absent(1, 3, vec![7]);
        assert_eq!(cache.best(&1, &3), Some(&vec![7]));
    }

    #[test]
    fn ranked_replaces_single() {
        let mut cache: PathCache<u32, u32> = PathCache::new();
        cache.store_best(1, 2, vec![10]);
        cache.store_ranked(1, 2, vec![vec![10], vec![11, 12]]);
        assert_eq!(cache.ranked(&1, &2).map(Vec::len), Some(2));
        assert_eq!(cache.best(&1, &2), Some(&vec![10]));
    }

    #[test]
    fn empty_route_is_a_positive_answer() {
        let mut cache: PathCache<u32, u32> = PathCache::new();
        cache.store_best(1, 2, Vec::new());
        assert_eq!(cache.best(&1, &2), Some(&Vec::new()));
    }

    #[test]
    fn invalidate_all_drops_everything() {
        let mut cache: PathCache<u32, u32> = PathCache::new();
        cache.store_best(1, 2, vec![10]);
        cache.store_best(3, 4, vec![11]);
        assert_eq!(cache.len(), 2);
        cache.invalidate_all();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.best(&1, &2), None);
    }
}

//! Spanning-tree cache for repeated one-to-many queries.
//!
//! Trees are keyed on `(graph version, algorithm tag, root id)`. The version
//! is the graph's monotone mutation counter, so any mutator implicitly
//! invalidates every cached tree; stale entries are evicted lazily the next
//! time the cache is consulted.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::routing::PathAlgorithm;
use crate::spanning::{makowskis_spanning_tree, SpanningTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    version: u64,
    algorithm: PathAlgorithm,
    root: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct SpanningTreeCache {
    entries: HashMap<CacheKey, Arc<SpanningTree>>,
}

impl SpanningTreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the tree rooted at `root` for the graph's current version,
    /// computing and storing it on a miss. Entries from older versions are
    /// dropped on the way through.
    pub fn tree_for(
        &mut self,
        graph: &Graph,
        algorithm: PathAlgorithm,
        root: NodeId,
    ) -> Result<Arc<SpanningTree>> {
        let key = CacheKey {
            version: graph.version(),
            algorithm,
            root,
        };
        if let Some(tree) = self.entries.get(&key) {
            return Ok(Arc::clone(tree));
        }

        let before = self.entries.len();
        self.entries.retain(|k, _| k.version == key.version);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, version = key.version, "evicted stale spanning trees");
        }

        let tree = Arc::new(makowskis_spanning_tree(graph, root)?);
        debug!(root, version = key.version, "cached spanning tree");
        self.entries.insert(key, Arc::clone(&tree));
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Graph {
        let mut graph = Graph::with_node_count(3);
        graph.add_arc(0, 1, 1.0, false).unwrap();
        graph.add_arc(1, 2, 2.0, false).unwrap();
        graph
    }

    #[test]
    fn hit_returns_the_same_tree() {
        let graph = line();
        let mut cache = SpanningTreeCache::new();
        let first = cache
            .tree_for(&graph, PathAlgorithm::DijkstraMakowski, 0)
            .unwrap();
        let second = cache
            .tree_for(&graph, PathAlgorithm::DijkstraMakowski, 0)
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn mutation_evicts_stale_trees() {
        let mut graph = line();
        let mut cache = SpanningTreeCache::new();
        let stale = cache
            .tree_for(&graph, PathAlgorithm::DijkstraMakowski, 0)
            .unwrap();
        assert_eq!(stale.distances[2], 3.0);

        graph.add_arc(0, 2, 0.5, false).unwrap();
        let fresh = cache
            .tree_for(&graph, PathAlgorithm::DijkstraMakowski, 0)
            .unwrap();
        assert_eq!(fresh.distances[2], 0.5);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_roots_and_algorithms_get_distinct_entries() {
        let graph = line();
        let mut cache = SpanningTreeCache::new();
        cache
            .tree_for(&graph, PathAlgorithm::DijkstraMakowski, 0)
            .unwrap();
        cache
            .tree_for(&graph, PathAlgorithm::DijkstraMakowski, 2)
            .unwrap();
        cache.tree_for(&graph, PathAlgorithm::AStar, 0).unwrap();
        assert_eq!(cache.len(), 3);
    }
}

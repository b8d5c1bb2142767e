//! Sparse weighted undirected graph.
//!
//! Adjacency is an ordered sequence of `neighbour id -> weight` maps, one per
//! node. Arcs are stored symmetrically (both endpoints carry the weight) and
//! a map per node deduplicates parallel edges by construction. Ordered maps
//! keep relaxation order deterministic, so repeated identical queries break
//! equal-cost ties the same way.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};

/// Index of a node within a graph.
pub type NodeId = usize;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    adjacency: Vec<BTreeMap<NodeId, f64>>,
    /// Monotone mutation counter; every mutator bumps it. Spanning-tree cache
    /// entries are keyed on this value and evicted when it moves on.
    version: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph with `count` isolated nodes.
    pub fn with_node_count(count: usize) -> Self {
        Self {
            adjacency: vec![BTreeMap::new(); count],
            version: 0,
        }
    }

    /// Wrap a prebuilt adjacency table. No validation is performed here; call
    /// [`Graph::validate`] when the table comes from an untrusted source.
    pub fn from_adjacency(adjacency: Vec<BTreeMap<NodeId, f64>>) -> Self {
        Self {
            adjacency,
            version: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of undirected arcs.
    pub fn arc_count(&self) -> usize {
        self.adjacency.iter().map(BTreeMap::len).sum::<usize>() / 2
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Neighbours of `id` with their arc weights.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range; solvers bounds-check endpoints before
    /// entering their loops.
    pub fn neighbors(&self, id: NodeId) -> &BTreeMap<NodeId, f64> {
        &self.adjacency[id]
    }

    pub fn arc_weight(&self, origin: NodeId, destination: NodeId) -> Option<f64> {
        self.adjacency.get(origin)?.get(&destination).copied()
    }

    pub fn contains_arc(&self, origin: NodeId, destination: NodeId) -> bool {
        self.arc_weight(origin, destination).is_some()
    }

    /// Reject node ids outside the graph.
    pub fn check_node(&self, id: NodeId) -> Result<()> {
        if id >= self.adjacency.len() {
            return Err(Error::InvalidNode {
                id,
                len: self.adjacency.len(),
            });
        }
        Ok(())
    }

    /// Append an isolated node, returning its id.
    pub fn add_node(&mut self) -> NodeId {
        self.adjacency.push(BTreeMap::new());
        self.version += 1;
        self.adjacency.len() - 1
    }

    /// Insert a symmetric arc. Errors on duplicates unless `overwrite` is set.
    pub fn add_arc(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        weight: f64,
        overwrite: bool,
    ) -> Result<()> {
        self.check_node(origin)?;
        self.check_node(destination)?;
        if origin == destination {
            return Err(Error::InvalidGraph {
                reason: format!("arc from node {origin} to itself is not allowed"),
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidGraph {
                reason: format!("arc {origin} -> {destination} has invalid weight {weight}"),
            });
        }
        if !overwrite && self.adjacency[origin].contains_key(&destination) {
            return Err(Error::DuplicateArc {
                origin,
                destination,
            });
        }
        self.adjacency[origin].insert(destination, weight);
        self.adjacency[destination].insert(origin, weight);
        self.version += 1;
        Ok(())
    }

    /// Remove a symmetric arc. Errors when the arc is absent.
    pub fn remove_arc(&mut self, origin: NodeId, destination: NodeId) -> Result<()> {
        self.check_node(origin)?;
        self.check_node(destination)?;
        if self.adjacency[origin].remove(&destination).is_none() {
            return Err(Error::MissingArc {
                origin,
                destination,
            });
        }
        self.adjacency[destination].remove(&origin);
        self.version += 1;
        Ok(())
    }

    /// Remove a node and every incident arc.
    ///
    /// Removing the last index is O(degree); any other index renumbers every
    /// subsequent node down by one, which costs O(N + E).
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        self.check_node(id)?;
        let neighbors: Vec<NodeId> = self.adjacency[id].keys().copied().collect();
        for neighbor in neighbors {
            self.adjacency[neighbor].remove(&id);
        }
        self.adjacency.remove(id);
        if id < self.adjacency.len() {
            // Renumber: every id above the removed one shifts down by one.
            for entry in &mut self.adjacency {
                let shifted: BTreeMap<NodeId, f64> = entry
                    .iter()
                    .map(|(&k, &w)| (if k > id { k - 1 } else { k }, w))
                    .collect();
                *entry = shifted;
            }
            debug!(removed = id, nodes = self.adjacency.len(), "renumbered graph after node removal");
        }
        self.version += 1;
        Ok(())
    }

    /// Append a node wired to `arcs`, without bumping the version.
    ///
    /// Used only by the transient endpoint-splice protocol; callers must
    /// unwind with [`Graph::pop_node`] before the query returns.
    pub(crate) fn push_node_with_arcs(&mut self, arcs: &[(NodeId, f64)]) -> NodeId {
        let id = self.adjacency.len();
        self.adjacency.push(arcs.iter().copied().collect());
        for &(neighbor, weight) in arcs {
            self.adjacency[neighbor].insert(id, weight);
        }
        id
    }

    /// Remove the most recently appended node and its back-arcs, without
    /// bumping the version. Inverse of [`Graph::push_node_with_arcs`].
    pub(crate) fn pop_node(&mut self) {
        let Some(entry) = self.adjacency.pop() else {
            return;
        };
        let id = self.adjacency.len();
        for neighbor in entry.keys() {
            if let Some(back) = self.adjacency.get_mut(*neighbor) {
                back.remove(&id);
            }
        }
    }

    /// Check the structural invariants: in-range neighbour ids, no self-loops,
    /// finite non-negative weights, and symmetry with equal weights. Returns
    /// on the first violation with the offending entry named.
    ///
    /// This is an opt-in pre-flight check; solvers do not run it per query.
    pub fn validate(&self) -> Result<()> {
        let len = self.adjacency.len();
        for (origin, entry) in self.adjacency.iter().enumerate() {
            for (&destination, &weight) in entry {
                if destination >= len {
                    return Err(Error::InvalidGraph {
                        reason: format!(
                            "entry {origin} references node {destination}, but the graph has {len} nodes"
                        ),
                    });
                }
                if destination == origin {
                    return Err(Error::InvalidGraph {
                        reason: format!("entry {origin} contains a self-loop"),
                    });
                }
                if !weight.is_finite() || weight < 0.0 {
                    return Err(Error::InvalidGraph {
                        reason: format!(
                            "entry {origin} has invalid weight {weight} for neighbour {destination}"
                        ),
                    });
                }
                if self.adjacency[destination].get(&origin) != Some(&weight) {
                    return Err(Error::InvalidGraph {
                        reason: format!(
                            "asymmetric arc: {origin} -> {destination} has weight {weight} but the reverse entry disagrees"
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether every node can reach `origin`. Assumes a symmetric graph.
    pub fn is_connected_from(&self, origin: NodeId) -> bool {
        if origin >= self.adjacency.len() {
            return false;
        }
        let mut visited = vec![false; self.adjacency.len()];
        let mut stack = vec![origin];
        visited[origin] = true;
        while let Some(current) = stack.pop() {
            for &next in self.adjacency[current].keys() {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
        visited.into_iter().all(|seen| seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        let mut graph = Graph::with_node_count(3);
        graph.add_arc(0, 1, 1.0, false).unwrap();
        graph.add_arc(1, 2, 2.0, false).unwrap();
        graph.add_arc(0, 2, 4.0, false).unwrap();
        graph
    }

    #[test]
    fn arcs_are_symmetric() {
        let graph = triangle();
        assert_eq!(graph.arc_weight(0, 1), Some(1.0));
        assert_eq!(graph.arc_weight(1, 0), Some(1.0));
        assert_eq!(graph.arc_count(), 3);
        graph.validate().unwrap();
    }

    #[test]
    fn duplicate_arc_is_rejected_unless_overwritten() {
        let mut graph = triangle();
        let error = graph.add_arc(0, 1, 9.0, false).unwrap_err();
        assert!(matches!(error, Error::DuplicateArc { origin: 0, destination: 1 }));
        graph.add_arc(0, 1, 9.0, true).unwrap();
        assert_eq!(graph.arc_weight(1, 0), Some(9.0));
    }

    #[test]
    fn missing_arc_removal_errors() {
        let mut graph = Graph::with_node_count(2);
        assert!(matches!(
            graph.remove_arc(0, 1),
            Err(Error::MissingArc { .. })
        ));
    }

    #[test]
    fn every_mutator_bumps_the_version() {
        let mut graph = Graph::with_node_count(2);
        let start = graph.version();
        graph.add_arc(0, 1, 1.0, false).unwrap();
        graph.remove_arc(0, 1).unwrap();
        let id = graph.add_node();
        graph.remove_node(id).unwrap();
        assert_eq!(graph.version(), start + 4);
    }

    #[test]
    fn transient_push_and_pop_restore_state() {
        let before = triangle();
        let mut graph = before.clone();
        let id = graph.push_node_with_arcs(&[(0, 5.0), (2, 7.0)]);
        assert_eq!(id, 3);
        assert_eq!(graph.arc_weight(0, 3), Some(5.0));
        graph.pop_node();
        assert_eq!(graph, before);
    }

    #[test]
    fn remove_node_renumbers_neighbours() {
        let mut graph = Graph::with_node_count(4);
        graph.add_arc(0, 1, 1.0, false).unwrap();
        graph.add_arc(1, 3, 2.0, false).unwrap();
        graph.remove_node(1).unwrap();
        // Old node 3 is now node 2 and lost its only arc partner.
        assert_eq!(graph.node_count(), 3);
        assert!(graph.neighbors(0).is_empty());
        assert!(graph.neighbors(2).is_empty());
        graph.validate().unwrap();
    }

    #[test]
    fn remove_last_node_skips_renumbering() {
        let mut graph = triangle();
        graph.remove_node(2).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.arc_weight(0, 1), Some(1.0));
        assert!(!graph.contains_arc(0, 2));
        graph.validate().unwrap();
    }

    #[test]
    fn validator_names_the_offending_entry() {
        let mut adjacency = vec![BTreeMap::new(), BTreeMap::new()];
        adjacency[0].insert(1, 3.0);
        adjacency[1].insert(0, 4.0);
        let graph = Graph::from_adjacency(adjacency);
        let error = graph.validate().unwrap_err();
        assert!(error.to_string().contains("asymmetric"));
    }

    #[test]
    fn validator_rejects_out_of_range_and_self_loops() {
        let mut adjacency = vec![BTreeMap::new()];
        adjacency[0].insert(5, 1.0);
        assert!(Graph::from_adjacency(adjacency).validate().is_err());

        let mut adjacency = vec![BTreeMap::new()];
        adjacency[0].insert(0, 1.0);
        assert!(Graph::from_adjacency(adjacency).validate().is_err());
    }

    #[test]
    fn connectivity_check() {
        let graph = triangle();
        assert!(graph.is_connected_from(0));
        let mut split = Graph::with_node_count(4);
        split.add_arc(0, 1, 1.0, false).unwrap();
        split.add_arc(2, 3, 1.0, false).unwrap();
        assert!(!split.is_connected_from(0));
    }
}

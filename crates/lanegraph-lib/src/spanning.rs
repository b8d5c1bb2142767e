//! Single-source shortest-path trees.
//!
//! The spanning-tree builder shares its loop with the point-to-point solver
//! but never short-circuits: it exhausts the queue and yields the full
//! predecessor and distance tables, which the cache layer reuses to answer
//! repeated queries from the same root in O(path length).

use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::path::{PathResult, QueueEntry};

/// Shortest-path tree rooted at a single node.
///
/// `predecessors[root]` is `None`, as is the entry for every node the root
/// cannot reach; unreachable nodes carry an infinite distance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanningTree {
    pub root: NodeId,
    pub predecessors: Vec<Option<NodeId>>,
    pub distances: Vec<f64>,
}

/// Build the shortest-path tree rooted at `root` with the same lazy-deletion
/// loop as the point-to-point solver. Runs in O((N + E) log N).
pub fn makowskis_spanning_tree(graph: &Graph, root: NodeId) -> Result<SpanningTree> {
    graph.check_node(root)?;

    let mut distances = vec![f64::INFINITY; graph.node_count()];
    let mut predecessors: Vec<Option<NodeId>> = vec![None; graph.node_count()];
    distances[root] = 0.0;

    // (priority, node) min-queue; stale entries filtered on pop.
    let mut open = BinaryHeap::new();
    open.push(QueueEntry {
        priority: 0.0,
        node: root,
    });

    while let Some(QueueEntry { priority, node }) = open.pop() {
        if priority > distances[node] {
            continue;
        }
        for (&next, &weight) in graph.neighbors(node) {
            let candidate = priority + weight;
            if candidate < distances[next] {
                distances[next] = candidate;
                predecessors[next] = Some(node);
                open.push(QueueEntry {
                    priority: candidate,
                    node: next,
                });
            }
        }
    }

    Ok(SpanningTree {
        root,
        predecessors,
        distances,
    })
}

impl SpanningTree {
    /// Distance from the root to `node`; infinite when unreachable.
    pub fn distance_to(&self, node: NodeId) -> Option<f64> {
        self.distances.get(node).copied()
    }

    /// Reconstruct the path between two nodes through this tree.
    ///
    /// The result is a shortest path only when one of the endpoints is the
    /// tree root and the graph is symmetric; the cache layer guarantees both.
    pub fn path_between(&self, origin: NodeId, destination: NodeId) -> Result<PathResult> {
        let len = self.distances.len();
        for id in [origin, destination] {
            if id >= len {
                return Err(Error::InvalidNode { id, len });
            }
        }
        if self.distances[origin].is_infinite() || self.distances[destination].is_infinite() {
            return Err(Error::UnreachableDestination {
                origin,
                destination,
            });
        }
        if origin == destination {
            return Ok(PathResult {
                path: vec![origin],
                length: 0.0,
            });
        }

        let mut path = self.walk_to_root(origin)?;
        let mut from_destination = self.walk_to_root(destination)?;
        // origin -> root, then root -> destination.
        from_destination.pop(); // drop the duplicated root
        from_destination.reverse();
        path.extend(from_destination);

        Ok(PathResult {
            path,
            length: self.distances[origin] + self.distances[destination],
        })
    }

    fn walk_to_root(&self, start: NodeId) -> Result<Vec<NodeId>> {
        let mut path = vec![start];
        let mut current = start;
        while current != self.root {
            match self.predecessors[current] {
                Some(previous) => {
                    path.push(previous);
                    current = previous;
                    if path.len() > self.predecessors.len() {
                        return Err(Error::CorruptState {
                            reason: format!("predecessor cycle below spanning-tree root {}", self.root),
                        });
                    }
                }
                None => {
                    return Err(Error::CorruptState {
                        reason: format!(
                            "spanning-tree walk from node {start} broke at node {current} before root {}",
                            self.root
                        ),
                    });
                }
            }
        }
        Ok(path)
    }
}

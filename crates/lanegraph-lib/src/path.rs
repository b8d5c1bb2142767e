//! Shortest-path solvers over the sparse graph.
//!
//! Both solvers use the lazy-deletion heap pattern: stale queue entries are
//! filtered on pop by comparing against the distance table instead of
//! maintaining a decrease-key structure or (for the Dijkstra variant) a
//! visited set. On sparse networks this keeps the queue small and the data
//! structures trivial.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

/// A solved point-to-point query: node ids from origin to destination and the
/// summed arc weight along them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub path: Vec<NodeId>,
    pub length: f64,
}

/// Min-queue entry. `BinaryHeap` is a max-heap, so the ordering is reversed;
/// ties on priority fall back to the node id, which keeps pop order total and
/// path choice reproducible across identical queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct QueueEntry {
    pub(crate) priority: f64,
    pub(crate) node: NodeId,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn input_check(graph: &Graph, origin: NodeId, destination: NodeId) -> Result<()> {
    graph.check_node(origin)?;
    graph.check_node(destination)
}

/// Makowski's modified Dijkstra: exact on any non-negative-weight graph.
///
/// No visited set is kept; a popped entry whose priority exceeds the current
/// best distance for its node is stale and skipped. Terminates as soon as the
/// destination is popped.
pub fn dijkstra_makowski(
    graph: &Graph,
    origin: NodeId,
    destination: NodeId,
) -> Result<PathResult> {
    input_check(graph, origin, destination)?;

    let mut distances = vec![f64::INFINITY; graph.node_count()];
    let mut predecessors: Vec<Option<NodeId>> = vec![None; graph.node_count()];
    distances[origin] = 0.0;

    let mut open_leaves = BinaryHeap::new();
    open_leaves.push(QueueEntry {
        priority: 0.0,
        node: origin,
    });

    while let Some(QueueEntry { priority, node }) = open_leaves.pop() {
        if node == destination {
            let path = reconstruct_path(&predecessors, origin, destination)?;
            return Ok(PathResult {
                path,
                length: distances[destination],
            });
        }
        if priority > distances[node] {
            continue; // stale entry
        }
        for (&next, &weight) in graph.neighbors(node) {
            let candidate = priority + weight;
            if candidate < distances[next] {
                distances[next] = candidate;
                predecessors[next] = Some(node);
                open_leaves.push(QueueEntry {
                    priority: candidate,
                    node: next,
                });
            }
        }
    }

    Err(Error::UnreachableDestination {
        origin,
        destination,
    })
}

/// A* extension of the same loop: the queue priority is the true path cost
/// plus `heuristic(node)`, an estimate of the remaining distance to the
/// destination.
///
/// The caller guarantees the heuristic is non-negative and never
/// over-estimates; that is not checked here, and a violating heuristic costs
/// optimality, not termination. With the zero heuristic this is exactly
/// [`dijkstra_makowski`].
pub fn a_star<H>(
    graph: &Graph,
    origin: NodeId,
    destination: NodeId,
    heuristic: H,
) -> Result<PathResult>
where
    H: Fn(NodeId) -> f64,
{
    input_check(graph, origin, destination)?;

    let mut distances = vec![f64::INFINITY; graph.node_count()];
    let mut predecessors: Vec<Option<NodeId>> = vec![None; graph.node_count()];
    // The heuristic offset makes popped priorities incomparable with the
    // distance table, so settled nodes are tracked explicitly instead.
    let mut visited = vec![false; graph.node_count()];
    distances[origin] = 0.0;

    let mut open_leaves = BinaryHeap::new();
    open_leaves.push(QueueEntry {
        priority: 0.0,
        node: origin,
    });

    while let Some(QueueEntry { node, .. }) = open_leaves.pop() {
        if node == destination {
            let path = reconstruct_path(&predecessors, origin, destination)?;
            return Ok(PathResult {
                path,
                length: distances[destination],
            });
        }
        if visited[node] {
            continue;
        }
        visited[node] = true;
        let current = distances[node];
        for (&next, &weight) in graph.neighbors(node) {
            let candidate = current + weight;
            if candidate < distances[next] {
                distances[next] = candidate;
                predecessors[next] = Some(node);
                open_leaves.push(QueueEntry {
                    priority: candidate + heuristic(next),
                    node: next,
                });
            }
        }
    }

    Err(Error::UnreachableDestination {
        origin,
        destination,
    })
}

/// Walk the predecessor table from destination back to origin and reverse.
///
/// A broken or cyclic chain means the table did not come from a completed
/// solve; that is a bug in the caller, surfaced as corrupt state rather than
/// an infinite loop.
pub(crate) fn reconstruct_path(
    predecessors: &[Option<NodeId>],
    origin: NodeId,
    destination: NodeId,
) -> Result<Vec<NodeId>> {
    let mut path = vec![destination];
    let mut current = destination;
    while current != origin {
        match predecessors[current] {
            Some(previous) => {
                path.push(previous);
                current = previous;
                if path.len() > predecessors.len() {
                    return Err(Error::CorruptState {
                        reason: format!("predecessor cycle while walking back from node {destination}"),
                    });
                }
            }
            None => {
                return Err(Error::CorruptState {
                    reason: format!(
                        "predecessor chain from node {destination} broke at node {current} before reaching node {origin}"
                    ),
                });
            }
        }
    }
    path.reverse();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The six-city fixture: London, Paris, Berlin, Rome, Madrid, Lisbon.
    fn cities() -> Graph {
        let mut graph = Graph::with_node_count(6);
        graph.add_arc(0, 1, 311.0, false).unwrap();
        graph.add_arc(1, 2, 878.0, false).unwrap();
        graph.add_arc(1, 3, 1439.0, false).unwrap();
        graph.add_arc(1, 4, 1053.0, false).unwrap();
        graph.add_arc(2, 3, 1181.0, false).unwrap();
        graph.add_arc(4, 5, 623.0, false).unwrap();
        graph
    }

    #[test]
    fn shortest_route_london_to_lisbon() {
        let result = dijkstra_makowski(&cities(), 0, 5).unwrap();
        assert_eq!(result.path, vec![0, 1, 4, 5]);
        assert!((result.length - 1987.0).abs() < 1e-9);
    }

    #[test]
    fn origin_equals_destination() {
        let result = dijkstra_makowski(&cities(), 3, 3).unwrap();
        assert_eq!(result.path, vec![3]);
        assert_eq!(result.length, 0.0);
    }

    #[test]
    fn out_of_range_nodes_are_rejected() {
        let graph = cities();
        assert!(matches!(
            dijkstra_makowski(&graph, 0, 99),
            Err(Error::InvalidNode { id: 99, len: 6 })
        ));
        assert!(matches!(
            a_star(&graph, 42, 0, |_| 0.0),
            Err(Error::InvalidNode { id: 42, len: 6 })
        ));
    }

    #[test]
    fn disconnected_destination_is_unreachable() {
        let mut graph = cities();
        let island = graph.add_node();
        let error = dijkstra_makowski(&graph, 0, island).unwrap_err();
        assert!(matches!(error, Error::UnreachableDestination { .. }));
    }

    #[test]
    fn a_star_with_zero_heuristic_matches_dijkstra() {
        let graph = cities();
        for destination in 0..graph.node_count() {
            let plain = dijkstra_makowski(&graph, 0, destination).unwrap();
            let guided = a_star(&graph, 0, destination, |_| 0.0).unwrap();
            assert_eq!(plain.length, guided.length);
            assert_eq!(plain.path, guided.path);
        }
    }

    #[test]
    fn zero_weight_arcs_are_traversable() {
        let mut graph = Graph::with_node_count(3);
        graph.add_arc(0, 1, 0.0, false).unwrap();
        graph.add_arc(1, 2, 0.0, false).unwrap();
        let result = dijkstra_makowski(&graph, 0, 2).unwrap();
        assert_eq!(result.length, 0.0);
        assert_eq!(result.path, vec![0, 1, 2]);
    }

    #[test]
    fn broken_predecessor_chain_is_corrupt_state() {
        let predecessors = vec![None, None, Some(1)];
        let error = reconstruct_path(&predecessors, 0, 2).unwrap_err();
        assert!(matches!(error, Error::CorruptState { .. }));
    }
}

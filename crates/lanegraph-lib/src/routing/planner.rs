//! Pathfinding strategies implementing the Strategy pattern.
//!
//! Each solver is wrapped in a planner struct behind the [`PathPlanner`]
//! trait, so the query layer dispatches on the [`PathAlgorithm`] tag without
//! holding function references. Tags, not method pointers, also keep cache
//! keys stable.

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::path::{a_star, dijkstra_makowski, PathResult};

use super::PathAlgorithm;

/// Remaining-distance estimate for A*; must be non-negative and admissible.
pub type Heuristic<'a> = dyn Fn(NodeId) -> f64 + 'a;

/// Trait for pathfinding strategies.
pub trait PathPlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> PathAlgorithm;

    /// Execute the solver on the given graph. Planners that cannot use a
    /// heuristic ignore it.
    fn find_path(
        &self,
        graph: &Graph,
        origin: NodeId,
        destination: NodeId,
        heuristic: Option<&Heuristic<'_>>,
    ) -> Result<PathResult>;
}

/// Makowski's modified Dijkstra; exact on non-negative weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraMakowskiPlanner;

impl PathPlanner for DijkstraMakowskiPlanner {
    fn algorithm(&self) -> PathAlgorithm {
        PathAlgorithm::DijkstraMakowski
    }

    fn find_path(
        &self,
        graph: &Graph,
        origin: NodeId,
        destination: NodeId,
        _heuristic: Option<&Heuristic<'_>>,
    ) -> Result<PathResult> {
        dijkstra_makowski(graph, origin, destination)
    }
}

/// A* search; without a heuristic it degenerates to the Dijkstra planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStarPlanner;

impl PathPlanner for AStarPlanner {
    fn algorithm(&self) -> PathAlgorithm {
        PathAlgorithm::AStar
    }

    fn find_path(
        &self,
        graph: &Graph,
        origin: NodeId,
        destination: NodeId,
        heuristic: Option<&Heuristic<'_>>,
    ) -> Result<PathResult> {
        match heuristic {
            Some(h) => a_star(graph, origin, destination, h),
            None => dijkstra_makowski(graph, origin, destination),
        }
    }
}

/// Select the planner for an algorithm tag.
pub fn select_planner(algorithm: PathAlgorithm) -> Box<dyn PathPlanner> {
    match algorithm {
        PathAlgorithm::DijkstraMakowski => Box::new(DijkstraMakowskiPlanner),
        PathAlgorithm::AStar => Box::new(AStarPlanner),
    }
}

//! Query surface for geographic shortest-path requests.
//!
//! This module provides:
//! - [`PathAlgorithm`] - Supported solvers as named strategies
//! - [`NodeAdditionType`] - How off-graph endpoints snap onto the network
//! - [`PathRequest`] - High-level query with its knobs and defaults
//! - [`PathPlanner`] / [`select_planner`] - Strategy dispatch
//!
//! Algorithms are exposed as enum tags rather than function references so
//! serialized requests and spanning-tree cache keys stay stable.

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraMakowskiPlanner, Heuristic, PathPlanner};

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;
use crate::geo::{Coordinate, DistanceUnit};
use crate::output::CoordinateFormat;

/// Supported solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PathAlgorithm {
    /// Lazy-deletion Dijkstra tuned for sparse graphs.
    #[default]
    DijkstraMakowski,
    /// Heuristic-guided extension of the same loop.
    AStar,
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PathAlgorithm::DijkstraMakowski => "dijkstra_makowski",
            PathAlgorithm::AStar => "a_star",
        };
        f.write_str(value)
    }
}

impl FromStr for PathAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "dijkstra_makowski" => Ok(PathAlgorithm::DijkstraMakowski),
            "a_star" => Ok(PathAlgorithm::AStar),
            other => Err(Error::InvalidRequest {
                reason: format!(
                    "unknown algorithm {other:?}; expected dijkstra_makowski or a_star"
                ),
            }),
        }
    }
}

/// How an off-graph endpoint is wired into the network for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeAdditionType {
    /// Nearest node in each of the four lat/lon quadrants around the endpoint.
    #[default]
    Quadrant,
    /// Single nearest node by linear scan.
    Closest,
    /// Single nearest node through the KD-tree index.
    KdClosest,
    /// Every node in the table.
    All,
}

/// Which endpoint a cached spanning tree is rooted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CacheTarget {
    #[default]
    Origin,
    Destination,
}

/// How a coordinate path that crosses ±180° longitude is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AntimeridianMode {
    /// Insert a pair of interpolated points at ±180° on each crossing.
    #[default]
    Interpolate,
    /// Leave the raw crossing in place for the line utility to split on.
    Split,
}

/// High-level geographic shortest-path request.
///
/// `node_addition_circuity` inflates the synthetic splice edges while
/// solving, which keeps the solver from shortcutting over impassable terrain
/// near the endpoints; the reported length is re-priced at
/// `off_graph_circuity` afterwards. The default of 4 is deliberately
/// conservative; it is a knob, not a constant.
#[derive(Debug, Clone)]
pub struct PathRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub algorithm: PathAlgorithm,
    pub output_units: DistanceUnit,
    pub node_addition_type: NodeAdditionType,
    pub destination_node_addition_type: NodeAdditionType,
    pub node_addition_circuity: f64,
    pub off_graph_circuity: f64,
    pub output_coordinate_path: CoordinateFormat,
    /// Also return the raw node-id path (informational).
    pub output_path: bool,
    pub antimeridian: AntimeridianMode,
    /// Reuse a spanning tree across queries sharing an endpoint.
    pub cache: bool,
    pub cache_for: CacheTarget,
}

impl PathRequest {
    /// A request with every knob at its default.
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            algorithm: PathAlgorithm::default(),
            output_units: DistanceUnit::default(),
            node_addition_type: NodeAdditionType::default(),
            destination_node_addition_type: NodeAdditionType::default(),
            node_addition_circuity: 4.0,
            off_graph_circuity: 1.0,
            output_coordinate_path: CoordinateFormat::default(),
            output_path: false,
            antimeridian: AntimeridianMode::default(),
            cache: false,
            cache_for: CacheTarget::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: PathAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_units(mut self, units: DistanceUnit) -> Self {
        self.output_units = units;
        self
    }

    /// Use the same snap mode for both endpoints.
    pub fn with_node_addition(mut self, addition: NodeAdditionType) -> Self {
        self.node_addition_type = addition;
        self.destination_node_addition_type = addition;
        self
    }

    pub fn with_cache(mut self, cache_for: CacheTarget) -> Self {
        self.cache = true;
        self.cache_for = cache_for;
        // Cached trees need a single, stable entry node per endpoint.
        self.node_addition_type = NodeAdditionType::KdClosest;
        self.destination_node_addition_type = NodeAdditionType::KdClosest;
        self
    }

    pub fn with_output_path(mut self) -> Self {
        self.output_path = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_matches_documented_defaults() {
        let request = PathRequest::new(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0));
        assert_eq!(request.algorithm, PathAlgorithm::DijkstraMakowski);
        assert_eq!(request.output_units, DistanceUnit::Km);
        assert_eq!(request.node_addition_type, NodeAdditionType::Quadrant);
        assert_eq!(request.node_addition_circuity, 4.0);
        assert_eq!(request.off_graph_circuity, 1.0);
        assert_eq!(request.antimeridian, AntimeridianMode::Interpolate);
        assert!(!request.cache);
        assert!(!request.output_path);
    }

    #[test]
    fn algorithm_tags_round_trip_through_strings() {
        for algorithm in [PathAlgorithm::DijkstraMakowski, PathAlgorithm::AStar] {
            let parsed: PathAlgorithm = algorithm.to_string().parse().unwrap();
            assert_eq!(parsed, algorithm);
        }
        assert!("bellman_ford".parse::<PathAlgorithm>().is_err());
    }

    #[test]
    fn enabling_the_cache_forces_single_candidate_snapping() {
        let request = PathRequest::new(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0))
            .with_cache(CacheTarget::Destination);
        assert!(request.cache);
        assert_eq!(request.cache_for, CacheTarget::Destination);
        assert_eq!(request.node_addition_type, NodeAdditionType::KdClosest);
        assert_eq!(
            request.destination_node_addition_type,
            NodeAdditionType::KdClosest
        );
    }
}

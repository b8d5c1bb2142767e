//! Shortest paths over sparse geographic networks and grid graphs.
//!
//! This crate computes shortest paths over large, sparse, weighted,
//! undirected networks — maritime lanes, rail lines, road freeways — between
//! two arbitrary earth coordinates that need not coincide with graph nodes,
//! and over regular 2-D grids with blocked cells.
//!
//! # Quick Start
//!
//! The typical workflow is:
//!
//! 1. **Load or build a network**: [`dataset::load_graphjson`] for a static
//!    dataset, or [`GeoGraph::new`] from adjacency and coordinate tables
//! 2. **Describe the query** with a [`PathRequest`]
//! 3. **Solve** with [`GeoGraph::shortest_path`]
//! 4. **Format the output**: the returned [`GeoPath`] serializes directly;
//!    [`output::line_geometry`] and [`output::feature_collection`] emit
//!    GeoJSON
//!
//! # Example
//!
//! ```
//! use lanegraph_lib::{Coordinate, GeoGraph, Graph, PathRequest};
//!
//! # fn main() -> lanegraph_lib::Result<()> {
//! // Two nodes joined by one weighted arc.
//! let mut graph = Graph::with_node_count(2);
//! graph.add_arc(0, 1, 311.0, false)?;
//! let nodes = vec![
//!     Coordinate::new(51.5074, -0.1278), // London
//!     Coordinate::new(48.8566, 2.3522),  // Paris
//! ];
//! let mut geograph = GeoGraph::new(graph, nodes)?;
//!
//! let request = PathRequest::new(
//!     Coordinate::new(52.4862, -1.8904), // Birmingham
//!     Coordinate::new(48.7, 2.5),
//! );
//! let solved = geograph.shortest_path(&request)?;
//! assert!(solved.length > 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Algorithms
//!
//! Two solvers are exposed as named strategies via [`PathAlgorithm`]:
//!
//! - **`dijkstra_makowski`** (default): lazy-deletion Dijkstra tuned for
//!   sparse graphs — staleness is filtered by comparing popped priorities to
//!   the distance table instead of keeping a visited set
//! - **`a_star`**: the same loop guided by an admissible heuristic; on
//!   geographic graphs the haversine distance to the destination
//!
//! [`makowskis_spanning_tree`] computes the full one-to-many tree, which the
//! [`SpanningTreeCache`] reuses to answer repeated queries sharing an
//! endpoint in O(path length).
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Solvers fail
//! with [`Error::InvalidNode`] on out-of-range endpoints and
//! [`Error::UnreachableDestination`] when no path exists; transient graph
//! extensions are always rolled back before an error reaches the caller.
//!
//! # Concurrency
//!
//! Queries take `&mut self`: endpoint splicing temporarily mutates the
//! shared adjacency, so the borrow checker serializes queries per graph.
//! Clone the graph to fan work out across threads.

pub mod cache;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod geograph;
pub mod graph;
pub mod grid;
pub mod output;
pub mod path;
pub mod routing;
pub mod spanning;
pub mod spatial;

pub use cache::SpanningTreeCache;
pub use error::{Error, Result};
pub use geo::{convert_distance, haversine, Coordinate, DistanceUnit, EARTH_RADIUS_KM};
pub use geograph::GeoGraph;
pub use graph::{Graph, NodeId};
pub use grid::{GridCoordinatePath, GridGraph, GridPath, GridPathRequest, GridPoint};
pub use output::{
    feature_collection, line_geometry, split_at_antimeridian, CoordinateFormat, CoordinatePath,
    GeoPath,
};
pub use path::{a_star, dijkstra_makowski, PathResult};
pub use routing::{
    select_planner, AntimeridianMode, AStarPlanner, CacheTarget, DijkstraMakowskiPlanner,
    Heuristic, NodeAdditionType, PathAlgorithm, PathPlanner, PathRequest,
};
pub use spanning::{makowskis_spanning_tree, SpanningTree};
pub use spatial::GeoKdTree;

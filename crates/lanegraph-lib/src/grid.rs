//! Regular 2-D grid graphs with blocked cells.
//!
//! Cells are nodes (`id = y * x_size + x`) with 8-connected edges: cardinal
//! moves cost 1, diagonal moves √2. A blocked cell has no edges at all, and a
//! diagonal move is dropped when either of its two orthogonally shared cells
//! is blocked, so nothing squeezes between two corner-adjacent blocks.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::cache::SpanningTreeCache;
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::output::CoordinateFormat;
use crate::routing::{select_planner, CacheTarget, PathAlgorithm};

/// A cell position within the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: usize,
    pub y: usize,
}

impl GridPoint {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A grid cell path in the caller's requested shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GridCoordinatePath {
    Dicts(Vec<GridPoint>),
    Lists(Vec<[usize; 2]>),
}

impl GridCoordinatePath {
    fn from_points(points: Vec<GridPoint>, format: CoordinateFormat) -> Self {
        match format {
            CoordinateFormat::ListOfDicts => GridCoordinatePath::Dicts(points),
            CoordinateFormat::ListOfLists => {
                GridCoordinatePath::Lists(points.into_iter().map(|p| [p.x, p.y]).collect())
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            GridCoordinatePath::Dicts(points) => points.len(),
            GridCoordinatePath::Lists(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A solved grid query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPath {
    pub coordinate_path: GridCoordinatePath,
    pub length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<NodeId>>,
}

/// Query over a [`GridGraph`]. Cell endpoints map straight to node ids; there
/// is no snapping and no geographic handling.
#[derive(Debug, Clone)]
pub struct GridPathRequest {
    pub origin: GridPoint,
    pub destination: GridPoint,
    /// A* (with the euclidean heuristic) by default.
    pub algorithm: PathAlgorithm,
    pub output_coordinate_path: CoordinateFormat,
    pub output_path: bool,
    pub cache: bool,
    pub cache_for: CacheTarget,
}

impl GridPathRequest {
    pub fn new(origin: GridPoint, destination: GridPoint) -> Self {
        Self {
            origin,
            destination,
            algorithm: PathAlgorithm::AStar,
            output_coordinate_path: CoordinateFormat::default(),
            output_path: false,
            cache: false,
            cache_for: CacheTarget::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: PathAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_cache(mut self, cache_for: CacheTarget) -> Self {
        self.cache = true;
        self.cache_for = cache_for;
        self
    }

    pub fn with_output_path(mut self) -> Self {
        self.output_path = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GridGraph {
    graph: Graph,
    x_size: usize,
    y_size: usize,
    blocks: HashSet<(usize, usize)>,
    cache: SpanningTreeCache,
}

const CONNECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl GridGraph {
    /// Build an `x_size` × `y_size` grid. `blocks` lists impassable cells;
    /// `add_exterior_walls` prepends the border cells to that list.
    pub fn new(
        x_size: usize,
        y_size: usize,
        blocks: &[(usize, usize)],
        add_exterior_walls: bool,
    ) -> Result<Self> {
        if x_size == 0 || y_size == 0 {
            return Err(Error::InvalidRequest {
                reason: format!("grid sizes must be positive, got {x_size}x{y_size}"),
            });
        }
        for &(x, y) in blocks {
            if x >= x_size || y >= y_size {
                return Err(Error::InvalidRequest {
                    reason: format!("blocked cell ({x}, {y}) is outside the {x_size}x{y_size} grid"),
                });
            }
        }

        let mut blocked: HashSet<(usize, usize)> = blocks.iter().copied().collect();
        if add_exterior_walls {
            for x in 0..x_size {
                blocked.insert((x, 0));
                blocked.insert((x, y_size - 1));
            }
            for y in 0..y_size {
                blocked.insert((0, y));
                blocked.insert((x_size - 1, y));
            }
        }

        let mut adjacency = vec![BTreeMap::new(); x_size * y_size];
        for y in 0..y_size {
            for x in 0..x_size {
                if blocked.contains(&(x, y)) {
                    continue;
                }
                for (dx, dy) in CONNECTIONS {
                    let Some((nx, ny)) = offset(x, y, dx, dy, x_size, y_size) else {
                        continue;
                    };
                    if blocked.contains(&(nx, ny)) {
                        continue;
                    }
                    let diagonal = dx != 0 && dy != 0;
                    if diagonal
                        && (blocked.contains(&(nx, y)) || blocked.contains(&(x, ny)))
                    {
                        continue; // no squeezing between corner-adjacent blocks
                    }
                    let weight = if diagonal { std::f64::consts::SQRT_2 } else { 1.0 };
                    adjacency[y * x_size + x].insert(ny * x_size + nx, weight);
                }
            }
        }

        Ok(Self {
            graph: Graph::from_adjacency(adjacency),
            x_size,
            y_size,
            blocks: blocked,
            cache: SpanningTreeCache::new(),
        })
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }

    pub fn y_size(&self) -> usize {
        self.y_size
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn is_blocked(&self, point: GridPoint) -> bool {
        self.blocks.contains(&(point.x, point.y))
    }

    /// Node id of a cell.
    pub fn index_of(&self, point: GridPoint) -> Result<NodeId> {
        if point.x >= self.x_size || point.y >= self.y_size {
            return Err(Error::InvalidRequest {
                reason: format!(
                    "cell ({}, {}) is outside the {}x{} grid",
                    point.x, point.y, self.x_size, self.y_size
                ),
            });
        }
        Ok(point.y * self.x_size + point.x)
    }

    /// Cell of a node id.
    pub fn point_of(&self, id: NodeId) -> Result<GridPoint> {
        self.graph.check_node(id)?;
        Ok(GridPoint::new(id % self.x_size, id / self.x_size))
    }

    /// Straight-line cell distance, the A* heuristic for grids. Admissible:
    /// every move covers at most its euclidean cell distance.
    fn euclidean(&self, node: NodeId, destination: GridPoint) -> f64 {
        let x = (node % self.x_size) as f64;
        let y = (node / self.x_size) as f64;
        let dx = x - destination.x as f64;
        let dy = y - destination.y as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Shortest path between two cells.
    pub fn shortest_path(&mut self, request: &GridPathRequest) -> Result<GridPath> {
        let origin_id = self.index_of(request.origin)?;
        let destination_id = self.index_of(request.destination)?;
        for (id, point) in [
            (origin_id, request.origin),
            (destination_id, request.destination),
        ] {
            if self.graph.neighbors(id).is_empty() {
                return Err(Error::BlockedCell {
                    x: point.x,
                    y: point.y,
                });
            }
        }

        let solved = if request.cache {
            let root = match request.cache_for {
                CacheTarget::Origin => origin_id,
                CacheTarget::Destination => destination_id,
            };
            let tree = self.cache.tree_for(&self.graph, request.algorithm, root)?;
            tree.path_between(origin_id, destination_id)?
        } else {
            let planner = select_planner(request.algorithm);
            let destination = request.destination;
            let heuristic = |node: NodeId| self.euclidean(node, destination);
            planner.find_path(&self.graph, origin_id, destination_id, Some(&heuristic))?
        };

        let points = solved
            .path
            .iter()
            .map(|&id| GridPoint::new(id % self.x_size, id / self.x_size))
            .collect();
        Ok(GridPath {
            coordinate_path: GridCoordinatePath::from_points(
                points,
                request.output_coordinate_path,
            ),
            length: solved.length,
            path: request.output_path.then_some(solved.path),
        })
    }
}

fn offset(
    x: usize,
    y: usize,
    dx: isize,
    dy: isize,
    x_size: usize,
    y_size: usize,
) -> Option<(usize, usize)> {
    let nx = x.checked_add_signed(dx)?;
    let ny = y.checked_add_signed(dy)?;
    (nx < x_size && ny < y_size).then_some((nx, ny))
}

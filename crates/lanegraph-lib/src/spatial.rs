//! KD-tree spatial index for nearest-node snapping.
//!
//! Latitude/longitude pairs are projected onto the unit sphere and indexed as
//! 3-D Cartesian points. Squared chord distance between unit vectors is
//! monotone in angular separation, so the nearest indexed point under the
//! euclidean metric is also the nearest by great-circle distance, with no
//! antimeridian or pole special-casing.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;

use crate::geo::Coordinate;
use crate::graph::NodeId;

type Tree = KdTree<f64, u64, 3, 32, u32>;

pub struct GeoKdTree {
    tree: Tree,
    points: Vec<[f64; 3]>,
}

impl GeoKdTree {
    /// Index a node table. Node ids are the positions in the slice.
    pub fn build(nodes: &[Coordinate]) -> Self {
        let points: Vec<[f64; 3]> = nodes.iter().map(|c| c.to_unit_xyz()).collect();
        Self::from_points(points)
    }

    fn from_points(points: Vec<[f64; 3]>) -> Self {
        let mut tree = Tree::with_capacity(points.len());
        for (idx, point) in points.iter().enumerate() {
            tree.add(point, idx as u64);
        }
        Self { tree, points }
    }

    /// Id of the indexed node nearest to `point`, or `None` on an empty index.
    pub fn nearest(&self, point: Coordinate) -> Option<NodeId> {
        if self.points.is_empty() {
            return None;
        }
        let hit = self.tree.nearest_one::<SquaredEuclidean>(&point.to_unit_xyz());
        Some(hit.item as NodeId)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Clone for GeoKdTree {
    fn clone(&self) -> Self {
        Self::from_points(self.points.clone())
    }
}

impl std::fmt::Debug for GeoKdTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoKdTree")
            .field("len", &self.points.len())
            .finish()
    }
}

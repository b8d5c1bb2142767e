//! Geographic wrapper over the sparse graph engine.
//!
//! A `GeoGraph` pairs the adjacency table with a parallel coordinate table
//! and answers shortest-path queries between arbitrary earth coordinates.
//! Off-graph endpoints are spliced into the shared graph as transient nodes
//! for the duration of one solve and unwound on every exit path, so the
//! graph the caller observes never changes shape across a query.

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::cache::SpanningTreeCache;
use crate::error::{Error, Result};
use crate::geo::{convert_distance, haversine, Coordinate, DistanceUnit};
use crate::graph::{Graph, NodeId};
use crate::output::{interpolate_antimeridian, CoordinatePath, GeoPath};
use crate::routing::{
    select_planner, AntimeridianMode, CacheTarget, NodeAdditionType, PathRequest,
};
use crate::spatial::GeoKdTree;

#[derive(Debug, Clone)]
pub struct GeoGraph {
    graph: Graph,
    nodes: Vec<Coordinate>,
    spatial: GeoKdTree,
    cache: SpanningTreeCache,
}

impl GeoGraph {
    /// Pair an adjacency table with its coordinate table.
    ///
    /// The tables must be the same length and every coordinate in range;
    /// structural graph validation stays opt-in via [`GeoGraph::validate`].
    pub fn new(graph: Graph, nodes: Vec<Coordinate>) -> Result<Self> {
        if graph.node_count() != nodes.len() {
            return Err(Error::InvalidGraph {
                reason: format!(
                    "graph has {} adjacency entries but {} coordinates",
                    graph.node_count(),
                    nodes.len()
                ),
            });
        }
        for node in &nodes {
            node.check()?;
        }
        let spatial = GeoKdTree::build(&nodes);
        Ok(Self {
            graph,
            nodes,
            spatial,
            cache: SpanningTreeCache::new(),
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn nodes(&self) -> &[Coordinate] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Opt-in structural validation of the adjacency table (I1–I4).
    pub fn validate(&self) -> Result<()> {
        self.graph.validate()
    }

    /// Great-circle distance between two graph nodes in kilometres.
    pub fn node_haversine(&self, origin: NodeId, destination: NodeId) -> Result<f64> {
        self.graph.check_node(origin)?;
        self.graph.check_node(destination)?;
        Ok(haversine(self.nodes[origin], self.nodes[destination]))
    }

    /// Translate a node-id path into coordinates.
    pub fn coordinate_path(&self, path: &[NodeId]) -> Vec<Coordinate> {
        path.iter().map(|&id| self.nodes[id]).collect()
    }

    // ------------------------------------------------------------------
    // Mutators. Each bumps the graph version, which invalidates every
    // cached spanning tree.
    // ------------------------------------------------------------------

    /// Append an isolated node, returning its id.
    pub fn mod_add_node(&mut self, latitude: f64, longitude: f64) -> Result<NodeId> {
        let coordinate = Coordinate::checked(latitude, longitude)?;
        let id = self.graph.add_node();
        self.nodes.push(coordinate);
        self.spatial = GeoKdTree::build(&self.nodes);
        Ok(id)
    }

    /// Insert a symmetric arc. With no explicit weight the haversine distance
    /// between the endpoints is used.
    pub fn mod_add_arc(
        &mut self,
        origin: NodeId,
        destination: NodeId,
        weight: Option<f64>,
        overwrite: bool,
    ) -> Result<()> {
        self.graph.check_node(origin)?;
        self.graph.check_node(destination)?;
        let weight =
            weight.unwrap_or_else(|| haversine(self.nodes[origin], self.nodes[destination]));
        self.graph.add_arc(origin, destination, weight, overwrite)
    }

    /// Remove a symmetric arc.
    pub fn mod_remove_arc(&mut self, origin: NodeId, destination: NodeId) -> Result<()> {
        self.graph.remove_arc(origin, destination)
    }

    /// Remove a node and renumber every subsequent node down by one.
    /// Removing the last index skips the renumbering pass.
    pub fn mod_remove_node(&mut self, id: NodeId) -> Result<()> {
        self.graph.remove_node(id)?;
        self.nodes.remove(id);
        self.spatial = GeoKdTree::build(&self.nodes);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Shortest path between two arbitrary earth coordinates.
    ///
    /// Exclusive access (`&mut self`) serializes the transient-splice
    /// protocol; clone the `GeoGraph` to run queries in parallel.
    pub fn shortest_path(&mut self, request: &PathRequest) -> Result<GeoPath> {
        request.origin.check()?;
        request.destination.check()?;
        if !(request.node_addition_circuity > 0.0) || !(request.off_graph_circuity > 0.0) {
            return Err(Error::InvalidRequest {
                reason: "circuity factors must be positive".to_string(),
            });
        }

        if request.cache {
            return self.shortest_path_cached(request);
        }

        let base_count = self.graph.node_count();
        let solved = self.solve_extended(request);
        self.rollback_to(base_count);
        let (ids, coordinates, length_km) = solved?;
        Ok(self.finish_path(request, ids, coordinates, length_km))
    }

    /// Splice both endpoints into the graph, solve, and translate the result.
    /// Callers unwind the splice with [`GeoGraph::rollback_to`] regardless of
    /// the outcome.
    fn solve_extended(
        &mut self,
        request: &PathRequest,
    ) -> Result<(Vec<NodeId>, Vec<Coordinate>, f64)> {
        let origin_arcs = self.candidate_arcs(
            request.origin,
            request.node_addition_type,
            request.node_addition_circuity,
        );
        let origin_id = self.append_transient(request.origin, origin_arcs);
        let destination_arcs = self.candidate_arcs(
            request.destination,
            request.destination_node_addition_type,
            request.node_addition_circuity,
        );
        let destination_id = self.append_transient(request.destination, destination_arcs);
        debug!(
            origin_id,
            destination_id,
            origin_degree = self.graph.neighbors(origin_id).len(),
            destination_degree = self.graph.neighbors(destination_id).len(),
            "spliced query endpoints"
        );

        let planner = select_planner(request.algorithm);
        let destination = request.destination;
        let nodes = &self.nodes;
        let heuristic = move |node: NodeId| haversine(nodes[node], destination);
        let solved = planner.find_path(&self.graph, origin_id, destination_id, Some(&heuristic))?;

        let coordinates: Vec<Coordinate> =
            solved.path.iter().map(|&id| self.nodes[id]).collect();
        let length_km = adjust_circuity_length(
            solved.length,
            &coordinates,
            request.node_addition_circuity,
            request.off_graph_circuity,
        );
        Ok((solved.path, coordinates, length_km))
    }

    /// Cache-backed variant: no splice, single entry node per endpoint, path
    /// reconstructed from a spanning tree rooted per `cache_for`.
    fn shortest_path_cached(&mut self, request: &PathRequest) -> Result<GeoPath> {
        for addition in [
            request.node_addition_type,
            request.destination_node_addition_type,
        ] {
            if !matches!(
                addition,
                NodeAdditionType::Closest | NodeAdditionType::KdClosest
            ) {
                return Err(Error::InvalidRequest {
                    reason: format!(
                        "cached queries need a single entry node per endpoint; node addition type {addition:?} produces several"
                    ),
                });
            }
        }

        let (entry_id, entry_leg_km) = self.single_candidate(
            request.origin,
            request.node_addition_type,
            request.off_graph_circuity,
        )?;
        let (exit_id, exit_leg_km) = self.single_candidate(
            request.destination,
            request.destination_node_addition_type,
            request.off_graph_circuity,
        )?;
        let root = match request.cache_for {
            CacheTarget::Origin => entry_id,
            CacheTarget::Destination => exit_id,
        };

        let tree = self.cache.tree_for(&self.graph, request.algorithm, root)?;
        let core = tree.path_between(entry_id, exit_id)?;

        let mut coordinates = Vec::with_capacity(core.path.len() + 2);
        coordinates.push(request.origin);
        coordinates.extend(core.path.iter().map(|&id| self.nodes[id]));
        coordinates.push(request.destination);
        // Pad the id path with the entry ids so it aligns with the
        // coordinate path positions.
        let mut ids = Vec::with_capacity(core.path.len() + 2);
        ids.push(entry_id);
        ids.extend(core.path.iter().copied());
        ids.push(exit_id);

        let length_km = core.length + entry_leg_km + exit_leg_km;
        Ok(self.finish_path(request, ids, coordinates, length_km))
    }

    fn finish_path(
        &self,
        request: &PathRequest,
        ids: Vec<NodeId>,
        mut coordinates: Vec<Coordinate>,
        length_km: f64,
    ) -> GeoPath {
        if request.antimeridian == AntimeridianMode::Interpolate {
            coordinates = interpolate_antimeridian(coordinates);
        }
        GeoPath {
            coordinate_path: CoordinatePath::from_coordinates(
                coordinates,
                request.output_coordinate_path,
            ),
            length: convert_distance(length_km, DistanceUnit::Km, request.output_units),
            path: request.output_path.then_some(ids),
        }
    }

    // ------------------------------------------------------------------
    // Endpoint snapping
    // ------------------------------------------------------------------

    /// Candidate arcs for splicing `point` into the network: node ids paired
    /// with haversine-times-circuity weights.
    ///
    /// Scanning modes run over the current node table, so a previously
    /// spliced endpoint is itself a legal candidate (the degenerate two-point
    /// path). The KD-tree mode only ever sees persistent nodes.
    fn candidate_arcs(
        &self,
        point: Coordinate,
        addition: NodeAdditionType,
        circuity: f64,
    ) -> Vec<(NodeId, f64)> {
        let candidates: Vec<NodeId> = match addition {
            NodeAdditionType::KdClosest => self.spatial.nearest(point).into_iter().collect(),
            NodeAdditionType::Closest => self.closest_by_scan(point).into_iter().collect(),
            NodeAdditionType::Quadrant => self.quadrant_candidates(point),
            NodeAdditionType::All => (0..self.nodes.len()).collect(),
        };
        if candidates.is_empty() {
            warn!(
                latitude = point.latitude,
                longitude = point.longitude,
                "no snap candidates for endpoint; it will join the graph isolated"
            );
        }
        candidates
            .into_iter()
            .map(|id| (id, haversine(point, self.nodes[id]) * circuity))
            .collect()
    }

    /// Nearest node by linear scan over unit-sphere chord distance.
    fn closest_by_scan(&self, point: Coordinate) -> Option<NodeId> {
        let target = point.to_unit_xyz();
        self.nodes
            .iter()
            .enumerate()
            .map(|(id, node)| (id, chord_squared(node.to_unit_xyz(), target)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Nearest node in each lat/lon quadrant around the endpoint (up to 4).
    fn quadrant_candidates(&self, point: Coordinate) -> Vec<NodeId> {
        let target = point.to_unit_xyz();
        let mut best: [Option<(f64, NodeId)>; 4] = [None; 4];
        for (id, node) in self.nodes.iter().enumerate() {
            let north = node.latitude > point.latitude;
            let east = node.longitude > point.longitude;
            let slot = (north as usize) * 2 + east as usize;
            let distance = chord_squared(node.to_unit_xyz(), target);
            if best[slot].map_or(true, |(current, _)| distance < current) {
                best[slot] = Some((distance, id));
            }
        }
        best.into_iter().flatten().map(|(_, id)| id).collect()
    }

    /// Single entry node and the off-graph leg weight for cached queries.
    fn single_candidate(
        &self,
        point: Coordinate,
        addition: NodeAdditionType,
        circuity: f64,
    ) -> Result<(NodeId, f64)> {
        let id = match addition {
            NodeAdditionType::KdClosest => self.spatial.nearest(point),
            _ => self.closest_by_scan(point),
        }
        .ok_or_else(|| Error::InvalidGraph {
            reason: "graph has no nodes to snap an endpoint onto".to_string(),
        })?;
        Ok((id, haversine(point, self.nodes[id]) * circuity))
    }

    // ------------------------------------------------------------------
    // Transient splice bookkeeping
    // ------------------------------------------------------------------

    fn append_transient(&mut self, point: Coordinate, arcs: Vec<(NodeId, f64)>) -> NodeId {
        let id = self.graph.push_node_with_arcs(&arcs);
        self.nodes.push(point);
        id
    }

    /// Unwind transient splices until only `node_count` nodes remain. Restores
    /// the exact pre-splice adjacency, coordinates, and version.
    fn rollback_to(&mut self, node_count: usize) {
        while self.graph.node_count() > node_count {
            self.graph.pop_node();
            self.nodes.pop();
        }
    }

    /// The network arcs as a GeoJSON `FeatureCollection` of two-point
    /// `LineString`s (undirected: each arc appears once).
    pub fn to_geojson(&self) -> Value {
        let mut features = Vec::new();
        for origin in 0..self.graph.node_count() {
            for (&destination, &distance) in self.graph.neighbors(origin) {
                if origin > destination {
                    continue;
                }
                let from = self.nodes[origin];
                let to = self.nodes[destination];
                features.push(json!({
                    "type": "Feature",
                    "properties": {
                        "origin_idx": origin,
                        "destination_idx": destination,
                        "distance": distance,
                    },
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [
                            [from.longitude, from.latitude],
                            [to.longitude, to.latitude],
                        ],
                    },
                }));
            }
        }
        json!({ "type": "FeatureCollection", "features": features })
    }
}

/// Re-price the off-graph legs from the solving circuity down to the
/// reporting circuity.
///
/// A two-point path never entered the network, so the whole length was priced
/// at the splice circuity and is rescaled wholesale. Longer paths re-price
/// only the first and last legs.
fn adjust_circuity_length(
    length: f64,
    coordinates: &[Coordinate],
    node_addition_circuity: f64,
    off_graph_circuity: f64,
) -> f64 {
    if coordinates.len() <= 2 {
        return length / node_addition_circuity * off_graph_circuity;
    }
    let direct = haversine(coordinates[0], coordinates[1])
        + haversine(
            coordinates[coordinates.len() - 2],
            coordinates[coordinates.len() - 1],
        );
    length + direct * (off_graph_circuity - node_addition_circuity)
}

fn chord_squared(a: [f64; 3], b: [f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

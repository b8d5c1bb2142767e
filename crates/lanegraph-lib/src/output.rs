//! Output formatting for solved paths: coordinate forms, antimeridian
//! handling, and GeoJSON line geometry.

use serde::Serialize;
use serde_json::{json, Value};

use crate::geo::Coordinate;
use crate::graph::NodeId;

/// Shape of the coordinate path in query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateFormat {
    /// One `{latitude, longitude}` record per point.
    #[default]
    ListOfDicts,
    /// One `[latitude, longitude]` pair per point.
    ListOfLists,
}

/// A coordinate path in the caller's requested shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CoordinatePath {
    Dicts(Vec<Coordinate>),
    Lists(Vec<[f64; 2]>),
}

impl CoordinatePath {
    pub fn from_coordinates(coordinates: Vec<Coordinate>, format: CoordinateFormat) -> Self {
        match format {
            CoordinateFormat::ListOfDicts => CoordinatePath::Dicts(coordinates),
            CoordinateFormat::ListOfLists => CoordinatePath::Lists(
                coordinates
                    .into_iter()
                    .map(|c| [c.latitude, c.longitude])
                    .collect(),
            ),
        }
    }

    /// The points regardless of representation.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        match self {
            CoordinatePath::Dicts(points) => points.clone(),
            CoordinatePath::Lists(points) => points
                .iter()
                .map(|&[latitude, longitude]| Coordinate::new(latitude, longitude))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CoordinatePath::Dicts(points) => points.len(),
            CoordinatePath::Lists(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A solved geographic query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPath {
    pub coordinate_path: CoordinatePath,
    /// Total length in the requested output units.
    pub length: f64,
    /// Raw node-id path, when requested. Transient splice ids appear here and
    /// are only meaningful for debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<NodeId>>,
}

/// True when the segment between two points jumps across ±180° longitude.
fn crosses_antimeridian(a: Coordinate, b: Coordinate) -> bool {
    (b.longitude - a.longitude).abs() > 180.0
}

/// Insert a pair of points at ±180° wherever the path crosses the
/// antimeridian, with the crossing latitude linearly interpolated in wrapped
/// longitude space.
pub(crate) fn interpolate_antimeridian(points: Vec<Coordinate>) -> Vec<Coordinate> {
    if points.len() < 2 {
        return points;
    }
    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    for window in points.windows(2) {
        let (a, b) = (window[0], window[1]);
        if crosses_antimeridian(a, b) {
            let (latitude, eastward) = crossing_latitude(a, b);
            if eastward {
                out.push(Coordinate::new(latitude, 180.0));
                out.push(Coordinate::new(latitude, -180.0));
            } else {
                out.push(Coordinate::new(latitude, -180.0));
                out.push(Coordinate::new(latitude, 180.0));
            }
        }
        out.push(b);
    }
    out
}

/// Latitude where the segment meets ±180°, and whether travel is eastward.
fn crossing_latitude(a: Coordinate, b: Coordinate) -> (f64, bool) {
    let eastward = a.longitude > 0.0;
    let (span, to_boundary) = if eastward {
        ((b.longitude + 360.0) - a.longitude, 180.0 - a.longitude)
    } else {
        (a.longitude - (b.longitude - 360.0), a.longitude + 180.0)
    };
    let t = if span.abs() < f64::EPSILON {
        0.0
    } else {
        to_boundary / span
    };
    (a.latitude + t * (b.latitude - a.latitude), eastward)
}

/// Split a coordinate sequence into runs that stay on one side of ±180°.
pub fn split_at_antimeridian(points: &[Coordinate]) -> Vec<Vec<Coordinate>> {
    let mut segments = Vec::new();
    let mut current: Vec<Coordinate> = Vec::new();
    for &point in points {
        if let Some(&previous) = current.last() {
            if crosses_antimeridian(previous, point) {
                segments.push(std::mem::take(&mut current));
            }
        }
        current.push(point);
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn lon_first(points: &[Coordinate]) -> Vec<[f64; 2]> {
    points.iter().map(|c| [c.longitude, c.latitude]).collect()
}

/// GeoJSON geometry for a solved path: a `LineString`, or a
/// `MultiLineString` when the path crosses the antimeridian. Coordinates are
/// emitted longitude-first per the GeoJSON convention.
pub fn line_geometry(path: &GeoPath) -> Value {
    let points = path.coordinate_path.coordinates();
    let segments = split_at_antimeridian(&points);
    if segments.len() <= 1 {
        json!({
            "type": "LineString",
            "coordinates": lon_first(&points),
        })
    } else {
        json!({
            "type": "MultiLineString",
            "coordinates": segments.iter().map(|s| lon_first(s)).collect::<Vec<_>>(),
        })
    }
}

/// GeoJSON `FeatureCollection` wrapping one feature per solved path.
pub fn feature_collection<'a, I>(paths: I) -> Value
where
    I: IntoIterator<Item = &'a GeoPath>,
{
    let features: Vec<Value> = paths
        .into_iter()
        .map(|path| {
            json!({
                "type": "Feature",
                "properties": { "length": path.length },
                "geometry": line_geometry(path),
            })
        })
        .collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

//! Graphjson interchange: the on-disk form of a GeoGraph.
//!
//! The static network datasets (maritime lanes, rail, freeways) are produced
//! by external tooling and consumed here as `.graphjson` documents:
//!
//! ```json
//! { "type": "GeoGraph", "graph": [{"1": 311.0}, {"0": 311.0}], "nodes": [[51.5, -0.13], [48.86, 2.35]] }
//! ```
//!
//! Only the adjacency and coordinate tables are persisted; caches and
//! indexes are rebuilt on load.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::geograph::GeoGraph;
use crate::graph::{Graph, NodeId};

const GRAPHJSON_TYPE: &str = "GeoGraph";
const GRAPHJSON_EXTENSION: &str = "graphjson";

#[derive(Debug, Serialize, Deserialize)]
struct GraphJson {
    #[serde(rename = "type")]
    kind: String,
    graph: Vec<BTreeMap<NodeId, f64>>,
    nodes: Vec<[f64; 2]>,
}

fn check_extension(path: &Path) -> Result<()> {
    if path.extension().and_then(|e| e.to_str()) != Some(GRAPHJSON_EXTENSION) {
        return Err(Error::Format {
            reason: format!("expected a .{GRAPHJSON_EXTENSION} file, got {}", path.display()),
        });
    }
    Ok(())
}

/// Persist a GeoGraph's adjacency and coordinate tables.
pub fn save_graphjson(geograph: &GeoGraph, path: &Path) -> Result<()> {
    check_extension(path)?;
    let document = GraphJson {
        kind: GRAPHJSON_TYPE.to_string(),
        graph: (0..geograph.node_count())
            .map(|id| geograph.graph().neighbors(id).clone())
            .collect(),
        nodes: geograph
            .nodes()
            .iter()
            .map(|c| [c.latitude, c.longitude])
            .collect(),
    };
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, &document)?;
    info!(path = %path.display(), nodes = document.nodes.len(), "saved graphjson");
    Ok(())
}

/// Load a GeoGraph from a `.graphjson` document.
///
/// Table lengths and coordinate ranges are checked on construction;
/// structural validation of the adjacency stays opt-in.
pub fn load_graphjson(path: &Path) -> Result<GeoGraph> {
    check_extension(path)?;
    let reader = BufReader::new(File::open(path)?);
    let document: GraphJson = serde_json::from_reader(reader)?;
    if document.kind != GRAPHJSON_TYPE {
        return Err(Error::Format {
            reason: format!(
                "document type {:?} is not a {GRAPHJSON_TYPE}",
                document.kind
            ),
        });
    }
    info!(path = %path.display(), nodes = document.nodes.len(), "loaded graphjson");
    let nodes = document
        .nodes
        .into_iter()
        .map(|[latitude, longitude]| Coordinate::new(latitude, longitude))
        .collect();
    GeoGraph::new(Graph::from_adjacency(document.graph), nodes)
}

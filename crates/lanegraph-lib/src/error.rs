use thiserror::Error;

/// Convenient result alias for the lanegraph library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// An origin or destination node id fell outside the graph.
    #[error("node {id} is out of range for a graph of {len} nodes")]
    InvalidNode { id: usize, len: usize },

    /// A latitude/longitude pair fell outside the valid ranges.
    #[error("coordinate ({latitude}, {longitude}) is outside latitude [-90, 90] / longitude [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// The graph validator found a malformed adjacency entry.
    #[error("invalid graph: {reason}")]
    InvalidGraph { reason: String },

    /// The solver exhausted the queue without reaching the destination.
    #[error("no path exists between node {origin} and node {destination}")]
    UnreachableDestination { origin: usize, destination: usize },

    /// An arc insertion found the arc already present.
    #[error("arc between node {origin} and node {destination} already exists")]
    DuplicateArc { origin: usize, destination: usize },

    /// An arc removal found no arc to remove.
    #[error("no arc exists between node {origin} and node {destination}")]
    MissingArc { origin: usize, destination: usize },

    /// A grid endpoint landed on a cell with no usable connections.
    #[error("grid cell ({x}, {y}) has no connections (blocked or fenced in)")]
    BlockedCell { x: usize, y: usize },

    /// The query options were malformed or inconsistent.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// An internal invariant was violated; indicates a bug, not bad input.
    #[error("corrupt internal state: {reason}")]
    CorruptState { reason: String },

    /// A graphjson document had the wrong extension, type tag, or shape.
    #[error("unsupported graphjson document: {reason}")]
    Format { reason: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

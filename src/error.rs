//! Engine error taxonomy.
//!
//! Structural faults (malformed grids, cursors pushed past the end of a list)
//! are raised immediately and never retried. [`EngineError::AssetMissing`] is
//! the one presentation-level shortage: it is only produced on request by
//! [`AssetStore::require`](crate::resources::assetstore::AssetStore::require)
//! so the collaborator can log it, while drawing itself degrades to a no-op.

use crate::resources::grid::Node;
use crate::resources::scenes::SceneId;

/// Reasons an occupancy grid or a planning request is rejected before search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridFault {
    #[error("grid has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell glyph {glyph:?} at {node}")]
    BadGlyph { glyph: char, node: Node },
    #[error("{node} lies outside a {rows}x{cols} grid")]
    OutOfBounds { node: Node, rows: usize, cols: usize },
    #[error("{0} is a blocked cell")]
    Blocked(Node),
}

/// Errors surfaced by the choreography engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The goal is not reachable from the start in the occupancy graph.
    #[error("no path from {start} to {goal}")]
    PathNotFound { start: Node, goal: Node },

    /// A referenced image handle is absent from the asset store.
    #[error("asset not found: {0}")]
    AssetMissing(String),

    /// A beat cursor was pushed past the end of the beat list.
    #[error("beat index {index} is out of range for {len} beats")]
    InvalidBeatIndex { index: usize, len: usize },

    /// A section cursor was pushed past the end of a dialogue script.
    #[error("section index {index} is out of range for {len} sections")]
    InvalidSectionIndex { index: usize, len: usize },

    /// The grid or the start/goal pair was rejected before planning.
    #[error("malformed grid: {0}")]
    MalformedGrid(#[from] GridFault),

    /// The transition table names a scene that was never registered.
    #[error("scene '{0}' is not registered")]
    UnknownScene(SceneId),
}

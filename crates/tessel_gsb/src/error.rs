//! Errors raised by tile construction and mirror maintenance.
//!
//! Every failure here is fatal for the pass: corrupt input aborts before any
//! tile is published, and a broken mirror invariant is an internal bug.

use crate::gsb::BlockKind;
use tessel_common::InternalError;
use tessel_rrgraph::{RrNodeId, RrNodeType, Side};
use thiserror::Error;

/// Errors produced while building or canonicalizing routing tiles.
#[derive(Debug, Error)]
pub enum GsbError {
    /// A channel track resolves to a segment index outside the segment table.
    #[error(
        "{axis} track {track} at ({x}, {y}) has segment index {seg_index}, \
         outside the {num_segments} defined segment types"
    )]
    SegmentOutOfRange {
        /// Channel axis (`CHANX` or `CHANY`).
        axis: RrNodeType,
        /// Channel column.
        x: usize,
        /// Channel row.
        y: usize,
        /// Track position within the channel.
        track: usize,
        /// The raw segment index from the cost table.
        seg_index: i32,
        /// Size of the segment table.
        num_segments: usize,
    },

    /// A node's cost index has no row in the cost-index table.
    #[error("node {node} at ({x}, {y}) has cost index {cost_index} outside the cost table")]
    CostIndexOutOfRange {
        /// The offending node.
        node: RrNodeId,
        /// Its cost index.
        cost_index: usize,
        /// Column of the channel being built.
        x: usize,
        /// Row of the channel being built.
        y: usize,
    },

    /// A channel track has neither increasing nor decreasing direction.
    #[error("track node {node} on the {side} side of switch block ({x}, {y}) has no direction")]
    NonChannelDirection {
        /// The offending node.
        node: RrNodeId,
        /// Switch-block column.
        x: usize,
        /// Switch-block row.
        y: usize,
        /// Side of the switch block holding the track.
        side: Side,
    },

    /// A coordinate lies outside the device grid for the given tile kind.
    #[error("{kind} ({x}, {y}) is outside the device grid")]
    OutOfRange {
        /// Tile kind addressed.
        kind: BlockKind,
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
    },

    /// A mirror link points at a tile that is itself a mirror.
    #[error(
        "{kind} ({x}, {y}) mirrors ({target_x}, {target_y}), which is not a canonical representative"
    )]
    MirrorChain {
        /// Tile kind.
        kind: BlockKind,
        /// Column of the referencing tile.
        x: usize,
        /// Row of the referencing tile.
        y: usize,
        /// Column of the referenced tile.
        target_x: usize,
        /// Row of the referenced tile.
        target_y: usize,
    },

    /// Writing an export file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing an export report failed.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Any other internal bug.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

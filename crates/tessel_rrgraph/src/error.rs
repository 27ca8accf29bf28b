//! Errors raised while loading a routing-resource graph.

use thiserror::Error;

/// Errors that can occur while loading or validating a routing-resource graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The graph file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The graph file is not valid JSON for the graph schema.
    #[error("parse error: {0}")]
    Parse(String),

    /// A node's stored ID does not match its position in the node table.
    #[error("node at position {position} carries id {id}")]
    NodeIdMismatch {
        /// Position of the node in the table.
        position: usize,
        /// The ID stored on the node.
        id: u32,
    },

    /// A driver references a node that does not exist.
    #[error("node {node} is driven by missing node {driver}")]
    DanglingDriver {
        /// The driven node.
        node: u32,
        /// The missing driver ID.
        driver: u32,
    },

    /// A driver uses a switch type that does not exist.
    #[error("node {node} uses unknown switch {switch} ({num_switches} switch types defined)")]
    UnknownSwitch {
        /// The driven node.
        node: u32,
        /// The missing switch ID.
        switch: u32,
        /// Size of the switch table.
        num_switches: usize,
    },

    /// A pin node carries no grid side.
    #[error("{node_type} node {node} has no grid side")]
    MissingPinSide {
        /// The pin node.
        node: u32,
        /// Its node type.
        node_type: crate::types::RrNodeType,
    },

    /// A node's low corner lies above or right of its high corner.
    #[error("node {node} has inverted span ({xlow}, {ylow})..({xhigh}, {yhigh})")]
    InvertedSpan {
        /// The offending node.
        node: u32,
        /// Lowest column.
        xlow: usize,
        /// Lowest row.
        ylow: usize,
        /// Highest column.
        xhigh: usize,
        /// Highest row.
        yhigh: usize,
    },

    /// A node reaches past the I/O ring of the fabric.
    #[error("node {node} spans ({xlow}, {ylow})..({xhigh}, {yhigh}) outside the {nx}x{ny} fabric")]
    NodeOutOfGrid {
        /// The offending node.
        node: u32,
        /// Lowest column.
        xlow: usize,
        /// Lowest row.
        ylow: usize,
        /// Highest column.
        xhigh: usize,
        /// Highest row.
        yhigh: usize,
        /// Fabric width.
        nx: usize,
        /// Fabric height.
        ny: usize,
    },
}

//! Core routing-resource graph data structures.

use crate::ids::{RrNodeId, SwitchId};
use crate::types::{Direction, RrNodeType, Side};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One driving edge of a node: the upstream node and the switch type between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Driver {
    /// The upstream node.
    pub node: RrNodeId,
    /// The switch type connecting `node` to the driven node.
    pub switch: SwitchId,
}

/// A routing-resource node.
///
/// Channel nodes span `[xlow, xhigh] × [ylow, yhigh]`; pins sit at
/// `(xlow, ylow)` on `side` of their logic tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RrNode {
    /// Position of this node in the graph's node table.
    pub id: RrNodeId,
    /// Node kind.
    pub node_type: RrNodeType,
    /// Lowest covered column.
    pub xlow: usize,
    /// Lowest covered row.
    pub ylow: usize,
    /// Highest covered column.
    pub xhigh: usize,
    /// Highest covered row.
    pub yhigh: usize,
    /// Track index for channels, pin index for pins.
    pub ptc: usize,
    /// Track direction; [`Direction::None`] for pins.
    #[serde(default)]
    pub direction: Direction,
    /// Index into the graph's cost-index table.
    pub cost_index: usize,
    /// Grid side of a pin node.
    #[serde(default)]
    pub side: Option<Side>,
    /// Driving nodes, in the graph's fan-in order.
    #[serde(default)]
    pub drivers: Vec<Driver>,
}

/// A wire segment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment name from the architecture (e.g., "L4").
    pub name: String,
    /// Number of tiles a wire of this segment spans.
    #[serde(default = "default_length")]
    pub length: usize,
}

/// A routing switch type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    /// Switch name from the architecture.
    pub name: String,
}

/// One row of the cost-index table.
///
/// Channel rows carry the segment type of the wires using them; other rows
/// carry `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedData {
    /// Segment index, or a negative value when not a channel row.
    pub seg_index: i32,
}

fn default_length() -> usize {
    1
}

/// The routing-resource graph of an `nx × ny` fabric.
///
/// Lookup indices are not serialized; [`RrGraph::rebuild_indices`] restores
/// them after deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RrGraph {
    /// Number of logic-tile columns.
    pub nx: usize,
    /// Number of logic-tile rows.
    pub ny: usize,
    /// Segment type table.
    pub segments: Vec<Segment>,
    /// Switch type table.
    pub switches: Vec<Switch>,
    /// Cost-index table.
    pub indexed_data: Vec<IndexedData>,
    /// All nodes, indexed by [`RrNodeId`].
    pub nodes: Vec<RrNode>,
    #[serde(skip)]
    chan_index: ChanIndex,
    #[serde(skip)]
    pin_index: PinIndex,
}

impl RrGraph {
    /// Creates an empty graph for an `nx × ny` fabric.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            segments: Vec::new(),
            switches: Vec::new(),
            indexed_data: Vec::new(),
            nodes: Vec::new(),
            chan_index: HashMap::new(),
            pin_index: HashMap::new(),
        }
    }

    /// Appends a node, assigning its ID, and indexes it.
    pub fn add_node(&mut self, mut node: RrNode) -> RrNodeId {
        let id = RrNodeId::from_raw(self.nodes.len() as u32);
        node.id = id;
        index_node(&mut self.chan_index, &mut self.pin_index, &self.nodes, &node);
        self.nodes.push(node);
        id
    }

    /// Adds `driver` to the fan-in of `sink` through `switch`.
    pub fn add_driver(&mut self, sink: RrNodeId, driver: RrNodeId, switch: SwitchId) {
        self.nodes[sink.index()].drivers.push(Driver {
            node: driver,
            switch,
        });
    }

    /// Returns the node with the given ID.
    pub fn node(&self, id: RrNodeId) -> &RrNode {
        &self.nodes[id.index()]
    }

    /// Returns a mutable reference to the node with the given ID.
    ///
    /// Changing a node's type, position, track, or side invalidates the lookup
    /// indices until [`rebuild_indices`](Self::rebuild_indices) is called.
    pub fn node_mut(&mut self, id: RrNodeId) -> &mut RrNode {
        &mut self.nodes[id.index()]
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of segment types.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Resolves a node's cost index to its raw segment index.
    ///
    /// Returns `None` when the cost index itself is outside the table. The
    /// returned segment index is not range-checked.
    pub fn segment_index(&self, id: RrNodeId) -> Option<i32> {
        let node = self.node(id);
        self.indexed_data.get(node.cost_index).map(|d| d.seg_index)
    }

    /// Returns the channel nodes of `node_type` covering `(x, y)`, ordered by track index.
    pub fn chan_nodes(&self, node_type: RrNodeType, x: usize, y: usize) -> &[RrNodeId] {
        self.chan_index
            .get(&(node_type, x, y))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the pin nodes of `node_type` on `side` of grid tile `(x, y)`, ordered by pin index.
    pub fn grid_side_pins(
        &self,
        node_type: RrNodeType,
        x: usize,
        y: usize,
        side: Side,
    ) -> &[RrNodeId] {
        self.pin_index
            .get(&(node_type, x, y, side))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rebuilds the lookup indices from the node table.
    pub fn rebuild_indices(&mut self) {
        self.chan_index.clear();
        self.pin_index.clear();
        for node in &self.nodes {
            index_node(&mut self.chan_index, &mut self.pin_index, &self.nodes, node);
        }
    }
}

type ChanIndex = HashMap<(RrNodeType, usize, usize), Vec<RrNodeId>>;
type PinIndex = HashMap<(RrNodeType, usize, usize, Side), Vec<RrNodeId>>;

/// Inserts `node` into the lookup indices, keeping each entry sorted by `ptc`.
///
/// `node` may or may not already be stored in `nodes`.
fn index_node(
    chan_index: &mut ChanIndex,
    pin_index: &mut PinIndex,
    nodes: &[RrNode],
    node: &RrNode,
) {
    let ptc_of = |id: RrNodeId| {
        if id == node.id {
            node.ptc
        } else {
            nodes[id.index()].ptc
        }
    };
    match node.node_type {
        RrNodeType::ChanX | RrNodeType::ChanY => {
            for x in node.xlow..=node.xhigh {
                for y in node.ylow..=node.yhigh {
                    let entry = chan_index.entry((node.node_type, x, y)).or_default();
                    let pos = entry.partition_point(|&id| ptc_of(id) <= node.ptc);
                    entry.insert(pos, node.id);
                }
            }
        }
        RrNodeType::Opin | RrNodeType::Ipin => {
            if let Some(side) = node.side {
                let entry = pin_index
                    .entry((node.node_type, node.xlow, node.ylow, side))
                    .or_default();
                let pos = entry.partition_point(|&id| ptc_of(id) <= node.ptc);
                entry.insert(pos, node.id);
            }
        }
    }
}

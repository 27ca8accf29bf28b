//! Synthetic uniform fabrics.
//!
//! [`UniformFabric`] generates the routing-resource graph of a regular island
//! fabric: logic tiles at `1..=nx × 1..=ny` with pins on all four sides, an
//! empty I/O perimeter, and unidirectional length-1 tracks in every channel.
//! Every switch block uses the same subset pattern, so structurally identical
//! tiles are easy to predict in tests.

use crate::graph::{IndexedData, RrGraph, RrNode, Segment, Switch};
use crate::ids::{RrNodeId, SwitchId};
use crate::types::{Direction, RrNodeType, Side};

/// Cost index of output pins.
pub const OPIN_COST_INDEX: usize = 2;
/// Cost index of input pins.
pub const IPIN_COST_INDEX: usize = 3;
/// Cost index of horizontal tracks.
pub const CHANX_COST_INDEX: usize = 4;
/// Cost index of vertical tracks.
pub const CHANY_COST_INDEX: usize = 5;

/// Switch type used inside switch blocks.
pub const SB_SWITCH: SwitchId = SwitchId::from_raw(0);
/// Switch type used by connection-block input muxes.
pub const CB_SWITCH: SwitchId = SwitchId::from_raw(1);

/// Parameters of a uniform island fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformFabric {
    /// Logic-tile columns.
    pub nx: usize,
    /// Logic-tile rows.
    pub ny: usize,
    /// Tracks per channel. Odd widths are rounded down to even.
    pub chan_width: usize,
    /// Output pins on each side of a logic tile.
    pub opins_per_side: usize,
    /// Input pins on each side of a logic tile.
    pub ipins_per_side: usize,
}

impl UniformFabric {
    /// Creates a fabric description with two pins of each kind per side.
    pub fn new(nx: usize, ny: usize, chan_width: usize) -> Self {
        Self {
            nx,
            ny,
            chan_width,
            opins_per_side: 2,
            ipins_per_side: 2,
        }
    }

    /// Generates the routing-resource graph.
    pub fn build(&self) -> RrGraph {
        let mut graph = RrGraph::new(self.nx, self.ny);
        graph.segments.push(Segment {
            name: "L1".to_string(),
            length: 1,
        });
        graph.switches.push(Switch {
            name: "sb_mux".to_string(),
        });
        graph.switches.push(Switch {
            name: "cb_mux".to_string(),
        });
        graph.indexed_data = vec![
            IndexedData { seg_index: -1 },
            IndexedData { seg_index: -1 },
            IndexedData { seg_index: -1 },
            IndexedData { seg_index: -1 },
            IndexedData { seg_index: 0 },
            IndexedData { seg_index: 0 },
        ];

        self.add_pins(&mut graph);
        self.add_tracks(&mut graph);
        for x in 0..=self.nx {
            for y in 0..=self.ny {
                self.connect_switch_block(&mut graph, x, y);
            }
        }
        self.connect_ipins(&mut graph);
        graph
    }

    fn add_pins(&self, graph: &mut RrGraph) {
        for gx in 1..=self.nx {
            for gy in 1..=self.ny {
                for side in Side::ALL {
                    for p in 0..self.opins_per_side {
                        let ptc = side.index() * self.opins_per_side + p;
                        graph.add_node(pin_node(RrNodeType::Opin, gx, gy, side, ptc));
                    }
                    for p in 0..self.ipins_per_side {
                        let ptc = side.index() * self.ipins_per_side + p;
                        graph.add_node(pin_node(RrNodeType::Ipin, gx, gy, side, ptc));
                    }
                }
            }
        }
    }

    fn add_tracks(&self, graph: &mut RrGraph) {
        let width = self.chan_width / 2 * 2;
        for x in 1..=self.nx {
            for y in 0..=self.ny {
                for ptc in 0..width {
                    graph.add_node(track_node(RrNodeType::ChanX, x, y, ptc));
                }
            }
        }
        for x in 0..=self.nx {
            for y in 1..=self.ny {
                for ptc in 0..width {
                    graph.add_node(track_node(RrNodeType::ChanY, x, y, ptc));
                }
            }
        }
    }

    /// Channel tracks on `side` of switch block `(x, y)`, empty at the fabric border.
    fn side_tracks(&self, graph: &RrGraph, x: usize, y: usize, side: Side) -> Vec<RrNodeId> {
        let tracks = match side {
            Side::Top if y < self.ny => graph.chan_nodes(RrNodeType::ChanY, x, y + 1),
            Side::Right if x < self.nx => graph.chan_nodes(RrNodeType::ChanX, x + 1, y),
            Side::Bottom if y > 0 => graph.chan_nodes(RrNodeType::ChanY, x, y),
            Side::Left if x > 0 => graph.chan_nodes(RrNodeType::ChanX, x, y),
            _ => &[],
        };
        tracks.to_vec()
    }

    /// Output pins feeding `side` of switch block `(x, y)`, in tile-builder order.
    fn side_opins(&self, graph: &RrGraph, x: usize, y: usize, side: Side) -> Vec<RrNodeId> {
        let sources = match side {
            Side::Top => [(x, y + 1, Side::Right), (x + 1, y + 1, Side::Left)],
            Side::Right => [(x + 1, y + 1, Side::Bottom), (x + 1, y, Side::Top)],
            Side::Bottom => [(x + 1, y, Side::Left), (x, y, Side::Right)],
            Side::Left => [(x, y + 1, Side::Bottom), (x, y, Side::Top)],
        };
        sources
            .iter()
            .flat_map(|&(gx, gy, gside)| {
                graph
                    .grid_side_pins(RrNodeType::Opin, gx, gy, gside)
                    .iter()
                    .copied()
            })
            .collect()
    }

    /// Wires every output track of switch block `(x, y)`.
    ///
    /// The output track at subset position `k` is driven by the input track at
    /// position `k` of each other non-empty side, then by the side's OPINs.
    fn connect_switch_block(&self, graph: &mut RrGraph, x: usize, y: usize) {
        let tracks: Vec<Vec<RrNodeId>> = Side::ALL
            .iter()
            .map(|&side| self.side_tracks(graph, x, y, side))
            .collect();
        let pairs = self.chan_width / 2;
        for side in Side::ALL {
            if tracks[side.index()].is_empty() {
                continue;
            }
            let opins = self.side_opins(graph, x, y, side);
            for k in 0..pairs {
                let sink = tracks[side.index()][output_track(side, k)];
                for other in Side::ALL {
                    if other == side || tracks[other.index()].is_empty() {
                        continue;
                    }
                    let driver = tracks[other.index()][input_track(other, k)];
                    graph.add_driver(sink, driver, SB_SWITCH);
                }
                for &opin in &opins {
                    graph.add_driver(sink, opin, SB_SWITCH);
                }
            }
        }
    }

    /// Connects every input pin to all tracks of its adjacent channel.
    fn connect_ipins(&self, graph: &mut RrGraph) {
        for gx in 1..=self.nx {
            for gy in 1..=self.ny {
                for side in Side::ALL {
                    let tracks = match side {
                        Side::Top => graph.chan_nodes(RrNodeType::ChanX, gx, gy),
                        Side::Bottom => graph.chan_nodes(RrNodeType::ChanX, gx, gy - 1),
                        Side::Right => graph.chan_nodes(RrNodeType::ChanY, gx, gy),
                        Side::Left => graph.chan_nodes(RrNodeType::ChanY, gx - 1, gy),
                    }
                    .to_vec();
                    let ipins = graph
                        .grid_side_pins(RrNodeType::Ipin, gx, gy, side)
                        .to_vec();
                    for ipin in ipins {
                        for &track in &tracks {
                            graph.add_driver(ipin, track, CB_SWITCH);
                        }
                    }
                }
            }
        }
    }
}

/// Track index of the `k`-th output track on `side`.
///
/// Top and right sides drive increasing (even) tracks; bottom and left sides
/// drive decreasing (odd) tracks.
fn output_track(side: Side, k: usize) -> usize {
    match side {
        Side::Top | Side::Right => 2 * k,
        Side::Bottom | Side::Left => 2 * k + 1,
    }
}

/// Track index of the `k`-th input track on `side`.
fn input_track(side: Side, k: usize) -> usize {
    match side {
        Side::Top | Side::Right => 2 * k + 1,
        Side::Bottom | Side::Left => 2 * k,
    }
}

fn pin_node(node_type: RrNodeType, x: usize, y: usize, side: Side, ptc: usize) -> RrNode {
    let cost_index = match node_type {
        RrNodeType::Opin => OPIN_COST_INDEX,
        _ => IPIN_COST_INDEX,
    };
    RrNode {
        id: RrNodeId::from_raw(0),
        node_type,
        xlow: x,
        ylow: y,
        xhigh: x,
        yhigh: y,
        ptc,
        direction: Direction::None,
        cost_index,
        side: Some(side),
        drivers: Vec::new(),
    }
}

fn track_node(node_type: RrNodeType, x: usize, y: usize, ptc: usize) -> RrNode {
    let cost_index = match node_type {
        RrNodeType::ChanX => CHANX_COST_INDEX,
        _ => CHANY_COST_INDEX,
    };
    let direction = if ptc % 2 == 0 {
        Direction::Increasing
    } else {
        Direction::Decreasing
    };
    RrNode {
        id: RrNodeId::from_raw(0),
        node_type,
        xlow: x,
        ylow: y,
        xhigh: x,
        yhigh: y,
        ptc,
        direction,
        cost_index,
        side: None,
        drivers: Vec::new(),
    }
}

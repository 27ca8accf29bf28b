//! The General Switch Block tile model.
//!
//! An [`RrGsb`] gathers everything around one switch-block grid point: the
//! channel on each of its four sides with tile-local port directions, the
//! output pins that feed each side, and the input pins of the two connection
//! blocks sharing its left and top channels.

use crate::rr_chan::RrChan;
use serde::{Deserialize, Serialize};
use std::fmt;
use tessel_common::Coord;
use tessel_rrgraph::{Direction, RrNodeId, RrNodeType, SegmentId, Side};

/// Tile-local role of a channel track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// The track enters the tile.
    In,
    /// The tile drives the track.
    Out,
}

impl PortDirection {
    /// Maps a global track direction to a tile-local port direction on `side`.
    ///
    /// On the top and right sides an increasing track leaves the tile; on the
    /// bottom and left sides it enters. Tracks without a direction have no port.
    pub fn for_track(side: Side, direction: Direction) -> Option<PortDirection> {
        let increasing_out = matches!(side, Side::Top | Side::Right);
        match (direction, increasing_out) {
            (Direction::Increasing, true) | (Direction::Decreasing, false) => {
                Some(PortDirection::Out)
            }
            (Direction::Increasing, false) | (Direction::Decreasing, true) => {
                Some(PortDirection::In)
            }
            (Direction::None, _) => None,
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::In => write!(f, "in"),
            PortDirection::Out => write!(f, "out"),
        }
    }
}

/// The kind of a routing tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Switch block.
    Sb,
    /// Connection block on an X channel.
    CbX,
    /// Connection block on a Y channel.
    CbY,
}

impl BlockKind {
    /// All kinds, in reporting order.
    pub const ALL: [BlockKind; 3] = [BlockKind::Sb, BlockKind::CbX, BlockKind::CbY];
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Sb => write!(f, "switch block"),
            BlockKind::CbX => write!(f, "X connection block"),
            BlockKind::CbY => write!(f, "Y connection block"),
        }
    }
}

/// An inclusive range `[lsb, msb]` of configuration bits.
///
/// The default range is empty (width 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfBits {
    /// Lowest bit index.
    pub lsb: usize,
    /// Highest bit index.
    pub msb: usize,
}

impl ConfBits {
    /// Creates a range.
    pub fn new(lsb: usize, msb: usize) -> Self {
        Self { lsb, msb }
    }

    /// The compared width, `msb - lsb`.
    pub fn width(&self) -> usize {
        self.msb.saturating_sub(self.lsb)
    }
}

/// A pin node together with the side of its logic tile it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRef {
    /// The pin node.
    pub node: RrNodeId,
    /// Side of the logic tile the pin sits on.
    pub grid_side: Side,
}

/// Where a node sits inside one tile: a side and a position on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeLocation {
    /// Tile side.
    pub side: Side,
    /// Track, OPIN, or IPIN position on that side.
    pub index: usize,
}

/// One side of a switch block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsbSide {
    chan: RrChan,
    port_dirs: Vec<PortDirection>,
    opins: Vec<PinRef>,
    ipins: Vec<PinRef>,
}

impl GsbSide {
    /// Creates a side with an empty channel of the given axis.
    pub fn empty(node_type: RrNodeType) -> Self {
        Self {
            chan: RrChan::new(node_type),
            port_dirs: Vec::new(),
            opins: Vec::new(),
            ipins: Vec::new(),
        }
    }

    /// Creates a side from a channel and its per-track port directions.
    pub(crate) fn with_chan(chan: RrChan, port_dirs: Vec<PortDirection>) -> Self {
        debug_assert_eq!(chan.width(), port_dirs.len());
        Self {
            chan,
            port_dirs,
            opins: Vec::new(),
            ipins: Vec::new(),
        }
    }

    /// The channel on this side.
    pub fn chan(&self) -> &RrChan {
        &self.chan
    }

    /// Number of tracks on this side.
    pub fn chan_width(&self) -> usize {
        self.chan.width()
    }

    /// Port direction of track `track`.
    pub fn port_dir(&self, track: usize) -> PortDirection {
        self.port_dirs[track]
    }

    /// Port directions of all tracks.
    pub fn port_dirs(&self) -> &[PortDirection] {
        &self.port_dirs
    }

    /// Output pins feeding this side.
    pub fn opins(&self) -> &[PinRef] {
        &self.opins
    }

    /// Connection-block input pins on this side.
    pub fn ipins(&self) -> &[PinRef] {
        &self.ipins
    }

    pub(crate) fn push_opin(&mut self, pin: PinRef) {
        self.opins.push(pin);
    }

    pub(crate) fn push_ipin(&mut self, pin: PinRef) {
        self.ipins.push(pin);
    }
}

/// A General Switch Block: the routing tile at one switch-block grid point.
///
/// Sides are stored in [`Side::ALL`] order. A side on the fabric border holds
/// an empty channel and no output pins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrGsb {
    coord: Coord,
    sides: [GsbSide; 4],
    sb_conf: ConfBits,
    cbx_conf: ConfBits,
    cby_conf: ConfBits,
}

impl RrGsb {
    /// Creates a switch block with four empty sides.
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            sides: [
                GsbSide::empty(RrNodeType::ChanY),
                GsbSide::empty(RrNodeType::ChanX),
                GsbSide::empty(RrNodeType::ChanY),
                GsbSide::empty(RrNodeType::ChanX),
            ],
            sb_conf: ConfBits::default(),
            cbx_conf: ConfBits::default(),
            cby_conf: ConfBits::default(),
        }
    }

    /// Grid coordinate of the switch block.
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Number of sides; always four.
    pub fn num_sides(&self) -> usize {
        self.sides.len()
    }

    /// One side of the tile.
    pub fn side(&self, side: Side) -> &GsbSide {
        &self.sides[side.index()]
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut GsbSide {
        &mut self.sides[side.index()]
    }

    /// Number of tracks on `side`.
    pub fn chan_width(&self, side: Side) -> usize {
        self.side(side).chan_width()
    }

    /// Configuration-bit range of the switch block or one of its connection blocks.
    pub fn conf_bits(&self, kind: BlockKind) -> ConfBits {
        match kind {
            BlockKind::Sb => self.sb_conf,
            BlockKind::CbX => self.cbx_conf,
            BlockKind::CbY => self.cby_conf,
        }
    }

    /// Sets the configuration-bit range of the switch block or one of its connection blocks.
    pub fn set_conf_bits(&mut self, kind: BlockKind, bits: ConfBits) {
        match kind {
            BlockKind::Sb => self.sb_conf = bits,
            BlockKind::CbX => self.cbx_conf = bits,
            BlockKind::CbY => self.cby_conf = bits,
        }
    }

    /// Finds a driving node of this tile.
    ///
    /// Channel nodes are looked up among the input tracks first and then among
    /// all tracks, in side order; output pins are looked up among the OPINs of
    /// each side. Returns `None` when the node does not belong to the tile.
    pub fn locate(&self, node: RrNodeId, node_type: RrNodeType) -> Option<NodeLocation> {
        match node_type {
            RrNodeType::ChanX | RrNodeType::ChanY => self
                .locate_track(node, Some(PortDirection::In))
                .or_else(|| self.locate_track(node, None)),
            RrNodeType::Opin => self.locate_pin(node, GsbSide::opins),
            RrNodeType::Ipin => self.locate_pin(node, GsbSide::ipins),
        }
    }

    fn locate_track(&self, node: RrNodeId, port: Option<PortDirection>) -> Option<NodeLocation> {
        Side::ALL.iter().find_map(|&side| {
            let s = self.side(side);
            (0..s.chan_width())
                .find(|&t| s.chan.node(t) == node && port.map_or(true, |p| s.port_dir(t) == p))
                .map(|index| NodeLocation { side, index })
        })
    }

    fn locate_pin(
        &self,
        node: RrNodeId,
        pins: impl Fn(&GsbSide) -> &[PinRef],
    ) -> Option<NodeLocation> {
        Side::ALL.iter().find_map(|&side| {
            pins(self.side(side))
                .iter()
                .position(|p| p.node == node)
                .map(|index| NodeLocation { side, index })
        })
    }

    /// Returns `true` if `node` is a track on `side`.
    pub fn is_on_side(&self, side: Side, node: RrNodeId) -> bool {
        self.side(side).chan.index_of(node).is_some()
    }

    /// Returns `true` if the track at `track` on `side` passes straight through the tile.
    ///
    /// A pass-through track also appears on another side of the same tile, so
    /// it is not driven by a multiplexer here.
    pub fn is_pass_through(&self, side: Side, track: usize) -> bool {
        let node = self.side(side).chan.node(track);
        Side::ALL
            .iter()
            .any(|&other| other != side && self.is_on_side(other, node))
    }

    /// Distinct segment types used by any side, ascending.
    pub fn segment_ids(&self) -> Vec<SegmentId> {
        let mut ids: Vec<_> = self
            .sides
            .iter()
            .flat_map(|s| s.chan.segment_ids())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Exchanges the channels (with their port directions) of two sides.
    pub(crate) fn swap_chan(&mut self, a: Side, b: Side) {
        self.swap_field(a, b, |s| &mut s.chan);
        self.swap_field(a, b, |s| &mut s.port_dirs);
    }

    /// Exchanges the OPIN lists of two sides.
    pub(crate) fn swap_opins(&mut self, a: Side, b: Side) {
        self.swap_field(a, b, |s| &mut s.opins);
    }

    fn swap_field<T>(&mut self, a: Side, b: Side, field: fn(&mut GsbSide) -> &mut T) {
        let (lo, hi) = (a.index().min(b.index()), a.index().max(b.index()));
        if lo == hi {
            return;
        }
        let (head, tail) = self.sides.split_at_mut(hi);
        std::mem::swap(field(&mut head[lo]), field(&mut tail[0]));
    }

    /// Rotates the `direction` tracks of `side`; see [`RrChan`] rotation rules.
    ///
    /// Returns the size of the permuted subset.
    pub(crate) fn rotate_side(
        &mut self,
        side: Side,
        direction: Direction,
        offset: usize,
        counter: bool,
    ) -> usize {
        self.sides[side.index()]
            .chan
            .rotate_subset(direction, offset, counter)
    }
}

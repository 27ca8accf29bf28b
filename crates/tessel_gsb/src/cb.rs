//! Connection blocks as views over switch blocks.
//!
//! A connection block shares its channel with a switch block, so it is not
//! stored separately. The X connection block at `(x, y)` is the left channel of
//! switch block `(x, y)` with the IPINs on its top and bottom sides; the Y
//! connection block at `(x, y)` is the top channel of switch block `(x, y - 1)`
//! with the IPINs on its left and right sides.

use crate::gsb::{BlockKind, ConfBits, PinRef, PortDirection, RrGsb};
use crate::rr_chan::RrChan;
use tessel_common::{Coord, GridRange};
use tessel_rrgraph::{RrNodeId, Side};

/// Returns every coordinate of tiles of `kind`, in mirror-scan order.
///
/// Switch blocks and Y connection blocks are scanned column by column, X
/// connection blocks row by row.
pub fn block_coords(kind: BlockKind, range: GridRange) -> Vec<Coord> {
    match kind {
        BlockKind::Sb => range.scan().collect(),
        BlockKind::CbX => (0..=range.ny)
            .flat_map(|y| (1..=range.nx).map(move |x| Coord::new(x, y)))
            .collect(),
        BlockKind::CbY => (0..=range.nx)
            .flat_map(|x| (1..=range.ny).map(move |y| Coord::new(x, y)))
            .collect(),
    }
}

/// Returns whether a tile of `kind` exists at `coord`.
pub fn block_exists(kind: BlockKind, range: GridRange, coord: Coord) -> bool {
    range.contains(coord)
        && match kind {
            BlockKind::Sb => true,
            BlockKind::CbX => coord.x >= 1,
            BlockKind::CbY => coord.y >= 1,
        }
}

/// Coordinate of the switch block holding the channel of the tile at `coord`.
///
/// The caller must have checked [`block_exists`].
pub fn host_gsb_coord(kind: BlockKind, coord: Coord) -> Coord {
    match kind {
        BlockKind::Sb | BlockKind::CbX => coord,
        BlockKind::CbY => Coord::new(coord.x, coord.y - 1),
    }
}

/// A read-only connection block view.
#[derive(Debug, Clone, Copy)]
pub struct CbView<'a> {
    kind: BlockKind,
    gsb: &'a RrGsb,
}

impl<'a> CbView<'a> {
    /// Views the X or Y connection block carried by `gsb`.
    ///
    /// Returns `None` for [`BlockKind::Sb`].
    pub fn new(kind: BlockKind, gsb: &'a RrGsb) -> Option<Self> {
        match kind {
            BlockKind::CbX | BlockKind::CbY => Some(Self { kind, gsb }),
            BlockKind::Sb => None,
        }
    }

    /// Connection block kind.
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// The switch block carrying this view.
    pub fn gsb(&self) -> &'a RrGsb {
        self.gsb
    }

    /// Grid coordinate of the connection block.
    pub fn coord(&self) -> Coord {
        let c = self.gsb.coord();
        match self.kind {
            BlockKind::CbY => Coord::new(c.x, c.y + 1),
            BlockKind::CbX | BlockKind::Sb => c,
        }
    }

    /// Switch-block side whose channel this block shares.
    pub fn chan_side(&self) -> Side {
        match self.kind {
            BlockKind::CbY => Side::Top,
            BlockKind::CbX | BlockKind::Sb => Side::Left,
        }
    }

    /// The two switch-block sides carrying this block's IPINs.
    pub fn ipin_sides(&self) -> [Side; 2] {
        match self.kind {
            BlockKind::CbY => [Side::Right, Side::Left],
            BlockKind::CbX | BlockKind::Sb => [Side::Top, Side::Bottom],
        }
    }

    /// The shared channel.
    pub fn chan(&self) -> &'a RrChan {
        self.gsb.side(self.chan_side()).chan()
    }

    /// Port directions of the shared channel, as seen by the switch block.
    pub fn port_dirs(&self) -> &'a [PortDirection] {
        self.gsb.side(self.chan_side()).port_dirs()
    }

    /// IPINs on one of the [`ipin_sides`](Self::ipin_sides).
    pub fn ipins(&self, side: Side) -> &'a [PinRef] {
        self.gsb.side(side).ipins()
    }

    /// Configuration-bit range of this block.
    pub fn conf_bits(&self) -> ConfBits {
        self.gsb.conf_bits(self.kind)
    }

    /// Position of `node` in the shared channel.
    pub fn locate(&self, node: RrNodeId) -> Option<usize> {
        self.chan().index_of(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_rr_gsb;
    use tessel_rrgraph::synth::UniformFabric;
    use tessel_rrgraph::RrNodeType;

    #[test]
    fn coordinate_ranges() {
        let range = GridRange::new(3, 2);
        let cbx = block_coords(BlockKind::CbX, range);
        assert_eq!(cbx.len(), 3 * 3);
        assert_eq!(cbx[0], Coord::new(1, 0));
        assert_eq!(cbx[1], Coord::new(2, 0));
        let cby = block_coords(BlockKind::CbY, range);
        assert_eq!(cby.len(), 4 * 2);
        assert_eq!(cby[0], Coord::new(0, 1));
        assert_eq!(cby[1], Coord::new(0, 2));
        assert_eq!(block_coords(BlockKind::Sb, range).len(), 12);
    }

    #[test]
    fn existence() {
        let range = GridRange::new(2, 2);
        assert!(!block_exists(BlockKind::CbX, range, Coord::new(0, 1)));
        assert!(block_exists(BlockKind::CbX, range, Coord::new(2, 0)));
        assert!(!block_exists(BlockKind::CbY, range, Coord::new(1, 0)));
        assert!(!block_exists(BlockKind::CbY, range, Coord::new(1, 3)));
        assert_eq!(host_gsb_coord(BlockKind::CbY, Coord::new(1, 2)), Coord::new(1, 1));
    }

    #[test]
    fn views_share_switch_block_channels() {
        let g = UniformFabric::new(3, 3, 4).build();
        let gsb = build_rr_gsb(&g, GridRange::new(3, 3), Coord::new(1, 1)).unwrap();

        let cbx = CbView::new(BlockKind::CbX, &gsb).unwrap();
        assert_eq!(cbx.coord(), Coord::new(1, 1));
        assert_eq!(cbx.chan().nodes(), g.chan_nodes(RrNodeType::ChanX, 1, 1));
        assert_eq!(cbx.ipins(Side::Top).len(), 2);

        let cby = CbView::new(BlockKind::CbY, &gsb).unwrap();
        assert_eq!(cby.coord(), Coord::new(1, 2));
        assert_eq!(cby.chan().nodes(), g.chan_nodes(RrNodeType::ChanY, 1, 2));
        let first = g.chan_nodes(RrNodeType::ChanY, 1, 2)[3];
        assert_eq!(cby.locate(first), Some(3));

        assert!(CbView::new(BlockKind::Sb, &gsb).is_none());
    }
}

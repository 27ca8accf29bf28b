//! Tile construction from the routing-resource graph.
//!
//! Each switch block `(x, y)` collects the channel on each of its sides, maps
//! every track's global direction to a tile-local port, and gathers the OPINs
//! of the two logic tiles adjacent to each side. A second pass collects the
//! IPINs of the connection blocks that share its left and top channels.

use crate::error::GsbError;
use crate::gsb::{BlockKind, GsbSide, PinRef, PortDirection, RrGsb};
use crate::rr_chan::build_rr_chan;
use rayon::prelude::*;
use tessel_common::{Coord, GridRange};
use tessel_rrgraph::{RrGraph, RrNodeType, Side};

/// Where the channel and OPINs of one switch-block side come from.
struct SideSource {
    axis: RrNodeType,
    chan: Coord,
    /// The two logic tiles feeding OPINs, with the side of each they sit on.
    opin_grids: [(Coord, Side); 2],
}

/// Returns the source table entry for `side` of switch block `(x, y)`, or
/// `None` when the side lies on the fabric border.
fn side_source(range: GridRange, x: usize, y: usize, side: Side) -> Option<SideSource> {
    let c = Coord::new;
    match side {
        Side::Top => (y < range.ny).then(|| SideSource {
            axis: RrNodeType::ChanY,
            chan: c(x, y + 1),
            opin_grids: [(c(x, y + 1), Side::Right), (c(x + 1, y + 1), Side::Left)],
        }),
        Side::Right => (x < range.nx).then(|| SideSource {
            axis: RrNodeType::ChanX,
            chan: c(x + 1, y),
            opin_grids: [(c(x + 1, y + 1), Side::Bottom), (c(x + 1, y), Side::Top)],
        }),
        Side::Bottom => (y > 0).then(|| SideSource {
            axis: RrNodeType::ChanY,
            chan: c(x, y),
            opin_grids: [(c(x + 1, y), Side::Left), (c(x, y), Side::Right)],
        }),
        Side::Left => (x > 0).then(|| SideSource {
            axis: RrNodeType::ChanX,
            chan: c(x, y),
            opin_grids: [(c(x, y + 1), Side::Bottom), (c(x, y), Side::Top)],
        }),
    }
}

/// Returns, for IPINs on `side` of switch block `(x, y)`, the side whose
/// channel gates their collection and the logic tile side they come from.
///
/// Top and bottom IPINs belong to the X connection block on the left channel;
/// left and right IPINs belong to the Y connection block on the top channel.
fn ipin_source(x: usize, y: usize, side: Side) -> (Side, Coord, Side) {
    match side {
        Side::Top => (Side::Left, Coord::new(x, y + 1), Side::Bottom),
        Side::Right => (Side::Top, Coord::new(x + 1, y + 1), Side::Left),
        Side::Bottom => (Side::Left, Coord::new(x, y), Side::Top),
        Side::Left => (Side::Top, Coord::new(x, y + 1), Side::Right),
    }
}

/// Builds the switch block at `coord`.
///
/// Fails without publishing a partial tile if the coordinate is outside the
/// grid, a track resolves to a bad segment, or a track has no direction.
pub fn build_rr_gsb(graph: &RrGraph, range: GridRange, coord: Coord) -> Result<RrGsb, GsbError> {
    if !range.contains(coord) {
        return Err(GsbError::OutOfRange {
            kind: BlockKind::Sb,
            x: coord.x,
            y: coord.y,
        });
    }
    let (x, y) = (coord.x, coord.y);
    let mut gsb = RrGsb::new(coord);

    for side in Side::ALL {
        let Some(source) = side_source(range, x, y, side) else {
            continue;
        };
        let chan = build_rr_chan(graph, source.axis, source.chan.x, source.chan.y)?;
        let port_dirs = (0..chan.width())
            .map(|t| {
                PortDirection::for_track(side, chan.direction(t)).ok_or(
                    GsbError::NonChannelDirection {
                        node: chan.node(t),
                        x,
                        y,
                        side,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let gsb_side = gsb.side_mut(side);
        *gsb_side = GsbSide::with_chan(chan, port_dirs);
        for (grid, grid_side) in source.opin_grids {
            for &node in graph.grid_side_pins(RrNodeType::Opin, grid.x, grid.y, grid_side) {
                gsb_side.push_opin(PinRef { node, grid_side });
            }
        }
    }

    for side in Side::ALL {
        let (chan_side, grid, grid_side) = ipin_source(x, y, side);
        if gsb.chan_width(chan_side) == 0 {
            continue;
        }
        let pins = graph.grid_side_pins(RrNodeType::Ipin, grid.x, grid.y, grid_side);
        let gsb_side = gsb.side_mut(side);
        for &node in pins {
            gsb_side.push_ipin(PinRef { node, grid_side });
        }
    }

    Ok(gsb)
}

/// Builds every switch block of the device in scan order.
///
/// With `parallel` set, tiles are built on the rayon pool; each tile only
/// reads the graph, and the result keeps scan order. The first failing tile in
/// scan order is reported.
pub fn build_gsb_grid(
    graph: &RrGraph,
    range: GridRange,
    parallel: bool,
) -> Result<Vec<RrGsb>, GsbError> {
    let coords: Vec<Coord> = range.scan().collect();
    if parallel {
        coords
            .into_par_iter()
            .map(|coord| build_rr_gsb(graph, range, coord))
            .collect()
    } else {
        coords
            .into_iter()
            .map(|coord| build_rr_gsb(graph, range, coord))
            .collect()
    }
}

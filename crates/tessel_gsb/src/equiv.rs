//! Structural equivalence of switch blocks and connection blocks.
//!
//! Two tiles are equivalent when their local wiring has the same shape. Every
//! driver is resolved to a position inside the tile being compared, so grid
//! position and global node identity never enter the comparison.

use crate::cb::CbView;
use crate::gsb::{BlockKind, PortDirection, RrGsb};
use tessel_rrgraph::{RrGraph, RrNodeId, RrNodeType, SegmentId, Side};

/// Returns `true` if two switch blocks generate the same circuit module.
///
/// Compares, side by side: channel width, per-track port direction and segment
/// type, the driver topology of every output track, the number of OPINs, and
/// finally the configuration-bit width. Stops at the first mismatch.
pub fn sb_equivalent(graph: &RrGraph, a: &RrGsb, b: &RrGsb) -> bool {
    if a.num_sides() != b.num_sides() {
        return false;
    }
    for side in Side::ALL {
        if !sb_side_equivalent(graph, a, b, side, None) {
            return false;
        }
    }
    for side in Side::ALL {
        if a.side(side).opins().len() != b.side(side).opins().len() {
            return false;
        }
    }
    a.conf_bits(BlockKind::Sb).width() == b.conf_bits(BlockKind::Sb).width()
}

/// Returns `true` if the `segment` tracks on `side` of two switch blocks match.
///
/// This is the per-side, per-segment submodule test: only tracks of the given
/// segment type on one side are compared, together with that side's OPIN count.
pub fn sb_side_segment_equivalent(
    graph: &RrGraph,
    a: &RrGsb,
    b: &RrGsb,
    side: Side,
    segment: SegmentId,
) -> bool {
    sb_side_equivalent(graph, a, b, side, Some(segment))
        && a.side(side).opins().len() == b.side(side).opins().len()
}

fn sb_side_equivalent(
    graph: &RrGraph,
    a: &RrGsb,
    b: &RrGsb,
    side: Side,
    segment: Option<SegmentId>,
) -> bool {
    let (sa, sb) = (a.side(side), b.side(side));
    let tracks_a: Vec<usize> = (0..sa.chan_width())
        .filter(|&t| segment.map_or(true, |s| sa.chan().segment(t) == s))
        .collect();
    let tracks_b: Vec<usize> = (0..sb.chan_width())
        .filter(|&t| segment.map_or(true, |s| sb.chan().segment(t) == s))
        .collect();
    if tracks_a.len() != tracks_b.len() {
        return false;
    }
    for (&ta, &tb) in tracks_a.iter().zip(&tracks_b) {
        if sa.port_dir(ta) != sb.port_dir(tb) || sa.chan().segment(ta) != sb.chan().segment(tb) {
            return false;
        }
        if sa.port_dir(ta) == PortDirection::Out && !out_track_equivalent(graph, a, b, side, ta, tb)
        {
            return false;
        }
    }
    true
}

/// Compares how output track `ta` of `a` and `tb` of `b` are driven.
fn out_track_equivalent(
    graph: &RrGraph,
    a: &RrGsb,
    b: &RrGsb,
    side: Side,
    ta: usize,
    tb: usize,
) -> bool {
    let pass_a = a.is_pass_through(side, ta);
    if pass_a != b.is_pass_through(side, tb) {
        return false;
    }
    if pass_a {
        // a straight-through track has no multiplexer in this tile
        let opposite = side.opposite();
        let na = a.side(side).chan().node(ta);
        let nb = b.side(side).chan().node(tb);
        return a.is_on_side(opposite, na) == b.is_on_side(opposite, nb);
    }
    let node_a = a.side(side).chan().node(ta);
    let node_b = b.side(side).chan().node(tb);
    drivers_equivalent(graph, node_a, node_b, |n, t| a.locate(n, t), |n, t| b.locate(n, t))
}

/// Compares the driver lists of two nodes, resolving each driver with `loc_a`
/// and `loc_b` respectively.
fn drivers_equivalent<L, A, B>(
    graph: &RrGraph,
    node_a: RrNodeId,
    node_b: RrNodeId,
    loc_a: A,
    loc_b: B,
) -> bool
where
    L: PartialEq,
    A: Fn(RrNodeId, RrNodeType) -> L,
    B: Fn(RrNodeId, RrNodeType) -> L,
{
    let da = &graph.node(node_a).drivers;
    let db = &graph.node(node_b).drivers;
    if da.len() != db.len() {
        return false;
    }
    da.iter().zip(db).all(|(x, y)| {
        let tx = graph.node(x.node).node_type;
        let ty = graph.node(y.node).node_type;
        tx == ty && x.switch == y.switch && loc_a(x.node, tx) == loc_b(y.node, ty)
    })
}

/// Returns `true` if two connection blocks of the same kind generate the same module.
///
/// Compares the shared channel's per-track port direction and segment type,
/// then, per IPIN side, the pin count and each pin's driver topology relative
/// to the channel, and finally the configuration-bit width.
pub fn cb_equivalent(graph: &RrGraph, a: &CbView<'_>, b: &CbView<'_>) -> bool {
    if a.kind() != b.kind() {
        return false;
    }
    let (ca, cb) = (a.chan(), b.chan());
    if ca.width() != cb.width() {
        return false;
    }
    for t in 0..ca.width() {
        if a.port_dirs()[t] != b.port_dirs()[t] || ca.segment(t) != cb.segment(t) {
            return false;
        }
    }
    for side in a.ipin_sides() {
        let (pa, pb) = (a.ipins(side), b.ipins(side));
        if pa.len() != pb.len() {
            return false;
        }
        for (x, y) in pa.iter().zip(pb) {
            if !drivers_equivalent(graph, x.node, y.node, |n, _| a.locate(n), |n, _| b.locate(n)) {
                return false;
            }
        }
    }
    a.conf_bits().width() == b.conf_bits().width()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_gsb_grid, build_rr_gsb};
    use crate::gsb::ConfBits;
    use tessel_common::{Coord, GridRange};
    use tessel_rrgraph::synth::UniformFabric;
    use tessel_rrgraph::SwitchId;

    fn tile(g: &RrGraph, range: GridRange, x: usize, y: usize) -> RrGsb {
        build_rr_gsb(g, range, Coord::new(x, y)).unwrap()
    }

    #[test]
    fn interior_tiles_match() {
        let g = UniformFabric::new(4, 4, 4).build();
        let range = GridRange::new(4, 4);
        let a = tile(&g, range, 1, 1);
        let b = tile(&g, range, 3, 2);
        assert!(sb_equivalent(&g, &a, &a));
        assert!(sb_equivalent(&g, &a, &b));
        assert!(sb_equivalent(&g, &b, &a));
    }

    #[test]
    fn border_differs_from_interior() {
        let g = UniformFabric::new(4, 4, 4).build();
        let range = GridRange::new(4, 4);
        let interior = tile(&g, range, 2, 2);
        let bottom = tile(&g, range, 2, 0);
        let bottom2 = tile(&g, range, 3, 0);
        assert!(!sb_equivalent(&g, &interior, &bottom));
        assert!(sb_equivalent(&g, &bottom, &bottom2));
        let corner = tile(&g, range, 0, 0);
        assert!(!sb_equivalent(&g, &corner, &bottom));
    }

    #[test]
    fn switch_type_breaks_equivalence() {
        let mut g = UniformFabric::new(3, 3, 4).build();
        let range = GridRange::new(3, 3);
        let before = tile(&g, range, 2, 2);
        let out = before.side(Side::Top).chan().node(0);
        g.node_mut(out).drivers[0].switch = SwitchId::from_raw(1);
        let a = tile(&g, range, 1, 1);
        let b = tile(&g, range, 2, 2);
        assert!(!sb_equivalent(&g, &a, &b));
        assert!(!sb_equivalent(&g, &b, &a));
        // the perturbed track enters SB(2, 3), which does not compare input drivers
        let above = tile(&g, range, 2, 3);
        assert!(sb_equivalent(&g, &tile(&g, range, 1, 3), &above));
    }

    #[test]
    fn driver_count_breaks_equivalence() {
        let mut g = UniformFabric::new(3, 3, 4).build();
        let range = GridRange::new(3, 3);
        let b = tile(&g, range, 2, 1);
        let out = b.side(Side::Right).chan().node(0);
        g.node_mut(out).drivers.pop();
        let a = tile(&g, range, 1, 1);
        assert!(!sb_equivalent(&g, &a, &tile(&g, range, 2, 1)));
    }

    #[test]
    fn conf_width_participates() {
        let g = UniformFabric::new(3, 3, 4).build();
        let range = GridRange::new(3, 3);
        let a = tile(&g, range, 1, 1);
        let mut b = tile(&g, range, 2, 2);
        b.set_conf_bits(BlockKind::Sb, ConfBits::new(0, 5));
        assert!(!sb_equivalent(&g, &a, &b));
        let mut a = a;
        a.set_conf_bits(BlockKind::Sb, ConfBits::new(10, 15));
        assert!(sb_equivalent(&g, &a, &b));
    }

    #[test]
    fn side_segment_submodules() {
        let mut g = UniformFabric::new(3, 3, 4).build();
        let range = GridRange::new(3, 3);
        let b = tile(&g, range, 2, 2);
        let out = b.side(Side::Top).chan().node(0);
        g.node_mut(out).drivers[0].switch = SwitchId::from_raw(1);
        let a = tile(&g, range, 1, 1);
        let b = tile(&g, range, 2, 2);
        let seg = SegmentId::from_raw(0);
        assert!(!sb_side_segment_equivalent(&g, &a, &b, Side::Top, seg));
        assert!(sb_side_segment_equivalent(&g, &a, &b, Side::Right, seg));
        // no tracks of an unused segment on either side
        assert!(sb_side_segment_equivalent(&g, &a, &b, Side::Top, SegmentId::from_raw(7)));
    }

    #[test]
    fn connection_blocks() {
        let g = UniformFabric::new(4, 4, 4).build();
        let gsbs = build_gsb_grid(&g, GridRange::new(4, 4), false).unwrap();
        let at = |x: usize, y: usize| &gsbs[GridRange::new(4, 4).index_of(Coord::new(x, y))];

        let cbx = |x, y| CbView::new(BlockKind::CbX, at(x, y)).unwrap();
        assert!(cb_equivalent(&g, &cbx(1, 1), &cbx(3, 2)));
        assert!(!cb_equivalent(&g, &cbx(1, 0), &cbx(1, 1)));
        assert!(!cb_equivalent(&g, &cbx(1, 4), &cbx(1, 1)));
        assert!(cb_equivalent(&g, &cbx(1, 4), &cbx(4, 4)));

        // CBY(x, 2) is the top channel of SB(x, 1)
        let cby = |x, y| CbView::new(BlockKind::CbY, at(x, y)).unwrap();
        assert!(cb_equivalent(&g, &cby(1, 1), &cby(2, 2)));
        assert!(!cb_equivalent(&g, &cby(0, 1), &cby(1, 1)));
        assert!(!cb_equivalent(&g, &cbx(1, 1), &cby(1, 1)));
    }

    #[test]
    fn ipin_driver_switch_breaks_cb_equivalence() {
        let mut g = UniformFabric::new(3, 3, 4).build();
        let ipin = g.grid_side_pins(RrNodeType::Ipin, 2, 2, Side::Bottom)[0];
        g.node_mut(ipin).drivers[1].switch = SwitchId::from_raw(0);
        let range = GridRange::new(3, 3);
        let a = tile(&g, range, 1, 1);
        let b = tile(&g, range, 2, 1);
        let va = CbView::new(BlockKind::CbX, &a).unwrap();
        let vb = CbView::new(BlockKind::CbX, &b).unwrap();
        assert!(!cb_equivalent(&g, &va, &vb));
    }
}

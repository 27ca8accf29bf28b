//! Structural signatures used to skip hopeless equivalence checks.
//!
//! A signature hashes exactly the fields the equivalence engine compares, so
//! equivalent tiles always share a signature. Different signatures prove two
//! tiles differ; equal signatures still go through the full comparison.

use crate::cb::CbView;
use crate::gsb::{BlockKind, NodeLocation, PortDirection, RrGsb};
use tessel_common::{ContentHash, ContentHasher};
use tessel_rrgraph::{RrGraph, RrNodeId, RrNodeType, SegmentId, Side};

fn write_port(h: &mut ContentHasher, port: PortDirection) {
    h.write_u64(match port {
        PortDirection::In => 0,
        PortDirection::Out => 1,
    });
}

fn write_location(h: &mut ContentHasher, loc: Option<NodeLocation>) {
    match loc {
        Some(loc) => {
            h.write_usize(loc.side.index());
            h.write_usize(loc.index);
        }
        None => h.write_u64(u64::MAX),
    }
}

fn write_drivers(
    h: &mut ContentHasher,
    graph: &RrGraph,
    node: RrNodeId,
    locate: impl Fn(RrNodeId, RrNodeType) -> Option<NodeLocation>,
) {
    let drivers = &graph.node(node).drivers;
    h.write_usize(drivers.len());
    for d in drivers {
        let node_type = graph.node(d.node).node_type;
        h.write_usize(node_type.code());
        h.write_u64(u64::from(d.switch.as_raw()));
        write_location(h, locate(d.node, node_type));
    }
}

/// Signature of a switch block.
pub fn sb_signature(graph: &RrGraph, gsb: &RrGsb) -> ContentHash {
    let mut h = ContentHasher::new();
    h.write_usize(gsb.num_sides());
    for side in Side::ALL {
        let s = gsb.side(side);
        h.write_usize(s.chan_width());
        for t in 0..s.chan_width() {
            write_port(&mut h, s.port_dir(t));
            h.write_u64(u64::from(s.chan().segment(t).as_raw()));
            if s.port_dir(t) != PortDirection::Out {
                continue;
            }
            let node = s.chan().node(t);
            if gsb.is_pass_through(side, t) {
                h.write_u64(1);
                h.write_u64(u64::from(gsb.is_on_side(side.opposite(), node)));
            } else {
                h.write_u64(0);
                write_drivers(&mut h, graph, node, |n, ty| gsb.locate(n, ty));
            }
        }
    }
    for side in Side::ALL {
        h.write_usize(gsb.side(side).opins().len());
    }
    h.write_usize(gsb.conf_bits(BlockKind::Sb).width());
    h.finish()
}

/// Coarse signature of the `segment` tracks on one side of a switch block.
///
/// Covers the track count, their port directions, and the side's OPIN count;
/// driver topology is left to the full comparison.
pub fn sb_side_segment_signature(gsb: &RrGsb, side: Side, segment: SegmentId) -> ContentHash {
    let mut h = ContentHasher::new();
    let s = gsb.side(side);
    for t in (0..s.chan_width()).filter(|&t| s.chan().segment(t) == segment) {
        write_port(&mut h, s.port_dir(t));
    }
    h.write_u64(u64::MAX);
    h.write_usize(s.opins().len());
    h.finish()
}

/// Signature of a connection block.
pub fn cb_signature(graph: &RrGraph, cb: &CbView<'_>) -> ContentHash {
    let mut h = ContentHasher::new();
    let chan = cb.chan();
    h.write_usize(chan.width());
    for t in 0..chan.width() {
        write_port(&mut h, cb.port_dirs()[t]);
        h.write_u64(u64::from(chan.segment(t).as_raw()));
    }
    for side in cb.ipin_sides() {
        let pins = cb.ipins(side);
        h.write_usize(pins.len());
        for pin in pins {
            // connection-block drivers resolve to a track index only
            write_drivers(&mut h, graph, pin.node, |n, _| {
                cb.locate(n).map(|index| NodeLocation {
                    side: cb.chan_side(),
                    index,
                })
            });
        }
    }
    h.write_usize(cb.conf_bits().width());
    h.finish()
}

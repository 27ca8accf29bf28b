//! End-to-end canonicalization scenarios on synthetic fabrics.
//!
//! These tests run the whole pass (channels → tiles → mirrors → rotation) and
//! check the properties of the resulting partition.

use tessel_common::{Coord, GridRange};
use tessel_diagnostics::DiagnosticSink;
use tessel_gsb::rotate::{apply_plan, invert_plan, rotation_plan};
use tessel_gsb::{
    build_device_rr_gsb, cb_equivalent, sb_equivalent, BlockKind, DeviceRrGsb, GsbError,
    GsbOptions, MirrorLink, RotationParams,
};
use tessel_rrgraph::synth::{UniformFabric, CB_SWITCH};
use tessel_rrgraph::{IndexedData, RrGraph, RrNodeType, Side};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn serial() -> GsbOptions {
    GsbOptions {
        parallel: false,
        rotation: Some(RotationParams::default()),
    }
}

fn run(graph: &RrGraph) -> DeviceRrGsb {
    build_device_rr_gsb(graph, &serial(), &DiagnosticSink::new()).unwrap()
}

fn uniform(nx: usize, ny: usize) -> RrGraph {
    UniformFabric::new(nx, ny, 4).build()
}

// ---------------------------------------------------------------------------
// Unique-module counts
// ---------------------------------------------------------------------------

#[test]
fn uniform_4x4_fabric() {
    let device = run(&uniform(4, 4));
    let sb = device.mirrors(BlockKind::Sb).stats();
    assert_eq!(sb.total, 25);
    assert_eq!(sb.unique, 9);
    let cbx = device.mirrors(BlockKind::CbX).stats();
    assert_eq!(cbx.total, 4 * 5);
    assert_eq!(cbx.unique, 3);
    let cby = device.mirrors(BlockKind::CbY).stats();
    assert_eq!(cby.total, 5 * 4);
    assert_eq!(cby.unique, 3);
}

#[test]
fn one_interior_class_per_kind() {
    for (nx, ny) in [(3, 3), (4, 6), (6, 4), (5, 5)] {
        let device = run(&uniform(nx, ny));
        let sb = device.mirrors(BlockKind::Sb);
        let base = sb.canonical_of(Coord::new(1, 1)).unwrap();
        for x in 1..nx {
            for y in 1..ny {
                assert_eq!(sb.canonical_of(Coord::new(x, y)).unwrap(), base, "SB ({x}, {y})");
            }
        }

        let cbx = device.mirrors(BlockKind::CbX);
        let base = cbx.canonical_of(Coord::new(1, 1)).unwrap();
        for x in 1..=nx {
            for y in 1..ny {
                assert_eq!(cbx.canonical_of(Coord::new(x, y)).unwrap(), base, "CBX ({x}, {y})");
            }
        }

        let cby = device.mirrors(BlockKind::CbY);
        let base = cby.canonical_of(Coord::new(1, 1)).unwrap();
        for x in 1..nx {
            for y in 1..=ny {
                assert_eq!(cby.canonical_of(Coord::new(x, y)).unwrap(), base, "CBY ({x}, {y})");
            }
        }

        assert_eq!(sb.stats().unique, 9, "{nx}x{ny}");
    }
}

#[test]
fn canonical_count_bounded_by_total() {
    for (nx, ny) in [(1, 1), (2, 3), (4, 4)] {
        let device = run(&uniform(nx, ny));
        for stats in device.mirror_stats() {
            assert!(stats.unique <= stats.total, "{stats:?}");
            assert!(stats.unique >= 1);
        }
    }
    // a 1x1 fabric has four corner switch blocks, all different
    let device = run(&uniform(1, 1));
    let sb = device.mirrors(BlockKind::Sb).stats();
    assert_eq!(sb.unique, sb.total);
}

// ---------------------------------------------------------------------------
// Equivalence and partition properties
// ---------------------------------------------------------------------------

#[test]
fn sb_equivalence_is_reflexive_and_symmetric() {
    let g = uniform(3, 3);
    let device = run(&g);
    let gsbs = device.gsbs();
    for a in gsbs {
        assert!(sb_equivalent(&g, a, a), "{}", a.coord());
        for b in gsbs {
            assert_eq!(
                sb_equivalent(&g, a, b),
                sb_equivalent(&g, b, a),
                "{} vs {}",
                a.coord(),
                b.coord()
            );
        }
    }
}

#[test]
fn partition_never_splits_a_class() {
    let g = uniform(4, 3);
    let device = run(&g);
    for kind in BlockKind::ALL {
        let table = device.mirrors(kind);
        for &a in table.coords() {
            for &b in table.coords() {
                let equivalent = match kind {
                    BlockKind::Sb => sb_equivalent(
                        &g,
                        device.gsb(a).unwrap(),
                        device.gsb(b).unwrap(),
                    ),
                    BlockKind::CbX | BlockKind::CbY => cb_equivalent(
                        &g,
                        &device.cb(kind, a).unwrap(),
                        &device.cb(kind, b).unwrap(),
                    ),
                };
                let same_class = table.canonical_of(a).unwrap() == table.canonical_of(b).unwrap();
                assert_eq!(equivalent, same_class, "{kind:?} {a} vs {b}");
            }
        }
    }
}

#[test]
fn mirrors_point_at_equivalent_canonical_tiles() {
    let g = uniform(4, 4);
    let device = run(&g);
    for kind in BlockKind::ALL {
        let table = device.mirrors(kind);
        assert!(table.validate().is_ok());
        for &coord in table.coords() {
            let MirrorLink::MirrorOf(target) = table.link(coord).unwrap() else {
                continue;
            };
            let target = table.coords()[target];
            assert_eq!(table.link(target).unwrap(), MirrorLink::Canonical);
            match kind {
                BlockKind::Sb => assert!(sb_equivalent(
                    &g,
                    device.gsb(coord).unwrap(),
                    device.gsb(target).unwrap()
                )),
                BlockKind::CbX | BlockKind::CbY => assert!(cb_equivalent(
                    &g,
                    &device.cb(kind, coord).unwrap(),
                    &device.cb(kind, target).unwrap()
                )),
            }
        }
    }
}

#[test]
fn representative_is_first_in_scan_order() {
    let device = run(&uniform(4, 4));
    let sb = device.mirrors(BlockKind::Sb);
    let reps: Vec<Coord> = sb.representatives().collect();
    // switch blocks are scanned column by column
    assert_eq!(reps[0], Coord::new(0, 0));
    assert_eq!(reps[1], Coord::new(0, 1));
    assert_eq!(reps[2], Coord::new(0, 4));
    assert_eq!(sb.canonical_of(Coord::new(3, 3)).unwrap(), Coord::new(1, 1));
}

// ---------------------------------------------------------------------------
// Perturbation
// ---------------------------------------------------------------------------

#[test]
fn one_changed_switch_adds_one_class() {
    let mut g = uniform(4, 4);
    let before = run(&g);

    let target = Coord::new(2, 2);
    let track = before.gsb(target).unwrap().side(Side::Top).chan().node(0);
    g.node_mut(track).drivers[0].switch = CB_SWITCH;
    let after = run(&g);

    let (sb_before, sb_after) = (before.mirrors(BlockKind::Sb), after.mirrors(BlockKind::Sb));
    assert_eq!(sb_after.stats().unique, sb_before.stats().unique + 1);
    assert!(sb_after.is_canonical(target).unwrap());
    for &coord in sb_before.coords() {
        if coord != target {
            assert_eq!(
                sb_after.canonical_of(coord).unwrap(),
                sb_before.canonical_of(coord).unwrap(),
                "{coord}"
            );
        }
    }
    // connection blocks do not look at track drivers
    for kind in [BlockKind::CbX, BlockKind::CbY] {
        assert_eq!(after.mirrors(kind).stats(), before.mirrors(kind).stats());
    }
}

// ---------------------------------------------------------------------------
// Borders and rotation
// ---------------------------------------------------------------------------

#[test]
fn border_sides_are_empty_not_errors() {
    let device = run(&uniform(3, 3));
    let corner = device.gsb(Coord::new(0, 0)).unwrap();
    assert_eq!(corner.chan_width(Side::Left), 0);
    assert_eq!(corner.chan_width(Side::Bottom), 0);
    // no X connection block shares the missing left channel
    assert!(corner.side(Side::Top).ipins().is_empty());
    assert!(corner.side(Side::Bottom).ipins().is_empty());
    assert!(device.cb(BlockKind::CbX, Coord::new(0, 0)).is_err());
    // the Y connection block above it has pins on its right only
    let cby = device.cb(BlockKind::CbY, Coord::new(0, 1)).unwrap();
    assert_eq!(cby.ipins(Side::Right).len(), 2);
    assert!(cby.ipins(Side::Left).is_empty());
}

#[test]
fn baseline_corner_rotation_is_identity() {
    let device = run(&uniform(4, 4));
    let origin = Coord::new(0, 0);
    let rotated = device.rotated(origin, RotationParams::default()).unwrap();
    assert_eq!(rotated.as_gsb(), device.gsb(origin).unwrap());
}

#[test]
fn rotation_round_trips_everywhere() {
    let g = UniformFabric::new(5, 4, 6).build();
    let device = run(&g);
    let range = device.range();
    for offset in 1..=3 {
        let params = RotationParams { fco_offset: offset };
        for gsb in device.gsbs() {
            let plan = rotation_plan(range, gsb.coord(), params);
            let rotated = apply_plan(gsb, &plan, offset);
            let back = apply_plan(rotated.as_gsb(), &invert_plan(&plan), offset);
            assert_eq!(back.as_gsb(), gsb, "{} offset {offset}", gsb.coord());
        }
    }
}

#[test]
fn rotation_preserves_tile_contents() {
    let device = run(&uniform(4, 4));
    for gsb in device.gsbs() {
        let rotated = device.rotated(gsb.coord(), RotationParams::default()).unwrap();
        let mut before: Vec<_> = Side::ALL
            .iter()
            .flat_map(|&s| gsb.side(s).chan().nodes().to_vec())
            .collect();
        let mut after: Vec<_> = Side::ALL
            .iter()
            .flat_map(|&s| rotated.as_gsb().side(s).chan().nodes().to_vec())
            .collect();
        before.sort();
        after.sort();
        assert_eq!(before, after, "{}", gsb.coord());
    }
}

// ---------------------------------------------------------------------------
// Input handling
// ---------------------------------------------------------------------------

#[test]
fn corrupt_segment_aborts_the_pass() {
    let mut g = uniform(2, 2);
    g.indexed_data[4] = IndexedData { seg_index: 5 };
    let sink = DiagnosticSink::new();
    let err = build_device_rr_gsb(&g, &serial(), &sink).unwrap_err();
    assert!(matches!(
        err,
        GsbError::SegmentOutOfRange {
            axis: RrNodeType::ChanX,
            seg_index: 5,
            num_segments: 1,
            ..
        }
    ));
    assert!(err.to_string().contains("CHANX track 0 at (1, 0)"));
}

#[test]
fn parallel_and_serial_agree() {
    let g = uniform(5, 3);
    let parallel = GsbOptions::default();
    let a = build_device_rr_gsb(&g, &parallel, &DiagnosticSink::new()).unwrap();
    let b = run(&g);
    assert_eq!(a.gsbs(), b.gsbs());
    assert_eq!(a.mirror_stats(), b.mirror_stats());
}

#[test]
fn json_graph_gives_same_partition() {
    let g = uniform(3, 4);
    let json = serde_json::to_string(&g).unwrap();
    let loaded = tessel_rrgraph::from_json_str(&json).unwrap();
    let a = run(&g);
    let b = run(&loaded);
    assert_eq!(a.mirror_stats(), b.mirror_stats());
    assert_eq!(GridRange::new(3, 4), b.range());
}

//! `tessel inspect`: print one switch block as JSON.

use tessel_common::{Coord, GridRange};
use tessel_gsb::{build_rr_gsb, rotate_for_mirror, GsbReport, RotationParams};
use tessel_rrgraph::RrGraph;

use crate::fabric::{load_fabric, load_settings};
use crate::{GlobalArgs, InspectArgs};

/// Runs the `tessel inspect` command.
///
/// Only the requested tile is built. With `--rotated`, the tile is rotated
/// with the configured offset before printing.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = load_settings(global)?;
    let graph = load_fabric(args.graph.as_deref(), args.synthetic.as_deref(), &settings)?;
    let params = RotationParams {
        fco_offset: settings.config.rotation.fco_offset,
    };
    let rotation = args.rotated.then_some(params);
    let report = tile_report(&graph, Coord::new(args.x, args.y), rotation)?;
    println!("{}", report.to_json()?);
    Ok(0)
}

/// Builds the report of the switch block at `coord`, rotated when `rotation` is set.
fn tile_report(
    graph: &RrGraph,
    coord: Coord,
    rotation: Option<RotationParams>,
) -> Result<GsbReport, Box<dyn std::error::Error>> {
    let range = GridRange::new(graph.nx, graph.ny);
    let gsb = build_rr_gsb(graph, range, coord)?;
    Ok(match rotation {
        Some(params) => GsbReport::new(graph, rotate_for_mirror(range, &gsb, params).as_gsb(), true),
        None => GsbReport::new(graph, &gsb, false),
    })
}

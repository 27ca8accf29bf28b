//! Routing-tile construction and canonicalization for island-style FPGA fabrics.
//!
//! This crate takes a routing-resource graph ([`RrGraph`]) for an `nx × ny`
//! fabric, builds the General Switch Block at every grid point, and finds which
//! switch blocks and connection blocks are structurally identical so that only
//! one circuit module per class needs to be generated.
//!
//! # Pipeline
//!
//! 1. **Channels**: collect every X and Y channel and count unique channel modules
//! 2. **Tiles**: build each [`RrGsb`] (in parallel when enabled)
//! 3. **Mirrors**: partition switch blocks and both connection-block kinds into
//!    canonical representatives and direct mirrors, then validate
//! 4. **Submodules**: per-side, per-segment switch-block statistics
//! 5. **Rotation**: rotate every switch block by its grid position and count
//!    the classes that remain
//!
//! # Usage
//!
//! ```ignore
//! use tessel_gsb::{build_device_rr_gsb, BlockKind, GsbOptions};
//!
//! let device = build_device_rr_gsb(&graph, &GsbOptions::default(), &sink)?;
//! let sb = device.mirrors(BlockKind::Sb).stats();
//! assert!(sb.unique <= sb.total);
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod cb;
pub mod device;
pub mod equiv;
pub mod error;
pub mod export;
pub mod gsb;
pub mod mirror;
pub mod report;
pub mod rotate;
pub mod rr_chan;
pub mod signature;

pub use builder::{build_gsb_grid, build_rr_gsb};
pub use cb::{block_coords, CbView};
pub use device::{DeviceRrGsb, RotationStats, SideSegmentStats};
pub use equiv::{cb_equivalent, sb_equivalent, sb_side_segment_equivalent};
pub use error::GsbError;
pub use export::{write_device_reports, GsbReport};
pub use gsb::{BlockKind, ConfBits, GsbSide, NodeLocation, PinRef, PortDirection, RrGsb};
pub use mirror::{MirrorLink, MirrorStats, MirrorTable};
pub use rotate::{rotate_for_mirror, RotatedGsb, RotationParams};
pub use rr_chan::{DeviceRrChan, RrChan};

use tessel_common::GridRange;
use tessel_config::FabricConfig;
use tessel_diagnostics::DiagnosticSink;
use tessel_rrgraph::RrGraph;

/// Pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GsbOptions {
    /// Build tiles on the rayon thread pool.
    pub parallel: bool,
    /// Rotation parameters; `None` skips rotation statistics.
    pub rotation: Option<RotationParams>,
}

impl Default for GsbOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            rotation: Some(RotationParams::default()),
        }
    }
}

impl GsbOptions {
    /// Derives options from a loaded configuration.
    pub fn from_config(config: &FabricConfig) -> Self {
        Self {
            parallel: config.build.parallel,
            rotation: config.rotation.enabled.then_some(RotationParams {
                fco_offset: config.rotation.fco_offset,
            }),
        }
    }
}

/// Runs the whole canonicalization pass over `graph`.
///
/// Statistics are reported to `sink` as notes; a rotation offset that wraps
/// whole track subsets is reported as a warning. Corrupt input or a broken
/// mirror invariant aborts the pass.
pub fn build_device_rr_gsb(
    graph: &RrGraph,
    options: &GsbOptions,
    sink: &DiagnosticSink,
) -> Result<DeviceRrGsb, GsbError> {
    let range = GridRange::new(graph.nx, graph.ny);

    // 1. Channels
    let chans = DeviceRrChan::build(graph, range)?;
    report::emit_channel_stats(sink, &chans);

    // 2. Tiles
    let gsbs = build_gsb_grid(graph, range, options.parallel)?;
    report::emit_build_stats(sink, gsbs.len());

    // 3. Mirrors
    let device = DeviceRrGsb::new(graph, range, gsbs)?;
    device.validate_mirrors()?;
    for stats in device.mirror_stats() {
        report::emit_mirror_stats(sink, stats);
    }

    // 4. Submodules
    let segments = device.segment_ids();
    report::emit_submodule_stats(sink, segments.len(), &device.side_segment_stats(graph));

    // 5. Rotation
    if let Some(params) = options.rotation {
        let stats = device.rotation_stats(graph, params);
        report::emit_rotation_stats(sink, &stats, params);
    }

    Ok(device)
}

//! Progress and statistics diagnostics emitted by the pipeline.

use crate::device::{RotationStats, SideSegmentStats};
use crate::gsb::BlockKind;
use crate::mirror::MirrorStats;
use crate::rotate::RotationParams;
use crate::rr_chan::DeviceRrChan;
use tessel_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use tessel_rrgraph::RrNodeType;

/// Unique routing-channel statistics.
pub const CHANNEL_STATS: DiagnosticCode = DiagnosticCode::new(Category::Note, 101);
/// Number of switch blocks built.
pub const SB_BUILT: DiagnosticCode = DiagnosticCode::new(Category::Note, 102);
/// Unique switch-block statistics.
pub const SB_UNIQUE: DiagnosticCode = DiagnosticCode::new(Category::Note, 103);
/// Unique connection-block statistics.
pub const CB_UNIQUE: DiagnosticCode = DiagnosticCode::new(Category::Note, 104);
/// Per-side, per-segment switch-block submodule statistics.
pub const SUBMODULE_STATS: DiagnosticCode = DiagnosticCode::new(Category::Note, 105);
/// Switch-block statistics after rotation.
pub const ROTATION_STATS: DiagnosticCode = DiagnosticCode::new(Category::Note, 106);
/// The rotation offset wraps a whole track subset.
pub const ROTATION_WRAP: DiagnosticCode = DiagnosticCode::new(Category::Warning, 201);

/// Reports unique X and Y routing channels.
pub fn emit_channel_stats(sink: &DiagnosticSink, chans: &DeviceRrChan) {
    for (node_type, axis) in [(RrNodeType::ChanX, "X"), (RrNodeType::ChanY, "Y")] {
        sink.emit(Diagnostic::note(
            CHANNEL_STATS,
            format!(
                "detected {} independent routing channels from {} {axis}-direction routing channels",
                chans.num_modules(node_type),
                chans.num_channels(node_type)
            ),
        ));
    }
}

/// Reports how many switch blocks were built.
pub fn emit_build_stats(sink: &DiagnosticSink, total: usize) {
    sink.emit(Diagnostic::note(
        SB_BUILT,
        format!("built {total} switch blocks"),
    ));
}

/// Reports unique modules of one tile kind.
pub fn emit_mirror_stats(sink: &DiagnosticSink, stats: MirrorStats) {
    let (code, from) = match stats.kind {
        BlockKind::Sb => (SB_UNIQUE, "switch blocks"),
        BlockKind::CbX => (CB_UNIQUE, "X-channel connection blocks"),
        BlockKind::CbY => (CB_UNIQUE, "Y-channel connection blocks"),
    };
    let unique = match stats.kind {
        BlockKind::Sb => "switch blocks",
        BlockKind::CbX | BlockKind::CbY => "connection blocks",
    };
    sink.emit(Diagnostic::note(
        code,
        format!(
            "detected {} independent {unique} from {} {from}",
            stats.unique, stats.total
        ),
    ));
}

/// Reports per-side, per-segment submodules as one diagnostic with a note per entry.
pub fn emit_submodule_stats(sink: &DiagnosticSink, num_segments: usize, stats: &[SideSegmentStats]) {
    let mut diag = Diagnostic::note(
        SUBMODULE_STATS,
        format!("detected {num_segments} routing segments used by switch blocks"),
    );
    for s in stats {
        diag = diag.with_note(format!(
            "side {}, segment {}: {} independent switch blocks from {}",
            s.side, s.segment, s.unique, s.total
        ));
    }
    sink.emit(diag);
}

/// Reports rotation statistics, warning once if the offset wraps track subsets.
pub fn emit_rotation_stats(sink: &DiagnosticSink, stats: &RotationStats, params: RotationParams) {
    sink.emit(Diagnostic::note(
        ROTATION_STATS,
        format!(
            "detected {} independent switch blocks from {} rotated switch blocks",
            stats.unique, stats.total
        ),
    ));
    if let Some(first) = stats.first_wrapped {
        sink.emit(
            Diagnostic::warning(
                ROTATION_WRAP,
                format!(
                    "rotation offset {} wraps a whole same-direction track subset",
                    params.fco_offset
                ),
            )
            .at(first)
            .with_note(format!("{} switch blocks affected", stats.wrapped_tiles))
            .with_help("set `rotation.fco_offset` to match the fan-out pattern of the architecture"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_common::Coord;
    use tessel_diagnostics::Severity;

    #[test]
    fn codes() {
        assert_eq!(CHANNEL_STATS.to_string(), "N101");
        assert_eq!(ROTATION_WRAP.to_string(), "W201");
    }

    #[test]
    fn mirror_messages() {
        let sink = DiagnosticSink::new();
        emit_mirror_stats(
            &sink,
            MirrorStats {
                kind: BlockKind::Sb,
                unique: 9,
                total: 25,
            },
        );
        emit_mirror_stats(
            &sink,
            MirrorStats {
                kind: BlockKind::CbY,
                unique: 3,
                total: 20,
            },
        );
        let diags = sink.take_all();
        assert_eq!(diags[0].code, SB_UNIQUE);
        assert_eq!(
            diags[0].message,
            "detected 9 independent switch blocks from 25 switch blocks"
        );
        assert_eq!(diags[1].code, CB_UNIQUE);
        assert_eq!(
            diags[1].message,
            "detected 3 independent connection blocks from 20 Y-channel connection blocks"
        );
    }

    #[test]
    fn wrap_warning_only_when_wrapped() {
        let sink = DiagnosticSink::new();
        let mut stats = RotationStats {
            unique: 4,
            total: 16,
            wrapped_tiles: 0,
            first_wrapped: None,
        };
        emit_rotation_stats(&sink, &stats, RotationParams::default());
        assert_eq!(sink.take_all().len(), 1);

        stats.wrapped_tiles = 3;
        stats.first_wrapped = Some(Coord::new(2, 2));
        emit_rotation_stats(&sink, &stats, RotationParams::default());
        let diags = sink.take_all();
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[1].severity, Severity::Warning);
        assert_eq!(diags[1].location, Some(Coord::new(2, 2)));
        assert_eq!(diags[1].notes, vec!["3 switch blocks affected".to_string()]);
        assert!(!sink.has_errors());
    }
}

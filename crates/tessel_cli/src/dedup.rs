//! `tessel dedup`: build and canonicalize every routing tile.
//!
//! The full pipeline:
//!
//! 1. Load `tessel.toml` (via `--config`, the current directory, or defaults)
//! 2. Load the routing-resource graph or generate a synthetic fabric
//! 3. Merge command-line overrides into the pipeline options
//! 4. Build channels, tiles, and mirror tables
//! 5. Optionally export one description per switch block
//! 6. Render diagnostics and the unique-module summary

use std::path::PathBuf;

use tessel_config::{ExportFormat, FabricConfig};
use tessel_diagnostics::DiagnosticSink;
use tessel_gsb::{build_device_rr_gsb, write_device_reports, BlockKind, GsbOptions, RotationParams};

use crate::fabric::{load_fabric, load_settings, render_diagnostics, Settings};
use crate::{DedupArgs, GlobalArgs, ReportFormat};

/// Where and how tile descriptions are exported.
#[derive(Debug, PartialEq, Eq)]
struct ExportPlan {
    dir: PathBuf,
    format: ExportFormat,
    rotated: bool,
}

/// Runs the `tessel dedup` command.
///
/// Returns exit code 0 when the pass completes without error diagnostics.
pub fn run(args: &DedupArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    // Step 1: Load config
    let settings = load_settings(global)?;

    // Step 2: Load or generate the fabric
    let graph = load_fabric(args.graph.as_deref(), args.synthetic.as_deref(), &settings)?;
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Building {}x{} fabric ({} routing nodes)",
            graph.nx,
            graph.ny,
            graph.node_count()
        );
    }

    // Step 3: Merge CLI overrides
    let options = merge_options(&settings.config, args)?;

    // Step 4: Canonicalize
    let sink = DiagnosticSink::new();
    let device = build_device_rr_gsb(&graph, &options, &sink)?;

    // Step 5: Export
    let exported = match export_plan(&settings, args) {
        Some(plan) => {
            let rotation = if plan.rotated {
                options.rotation
            } else {
                None
            };
            let written = write_device_reports(&plan.dir, &graph, &device, plan.format, rotation)?;
            Some((plan.dir, written))
        }
        None => None,
    };

    // Step 6: Report
    let stats = device.mirror_stats();
    match args.format {
        ReportFormat::Text => {
            render_diagnostics(&sink, global);
            if !global.quiet {
                for s in &stats {
                    eprintln!(
                        "   {:<24} {:>6} unique of {:>6}",
                        kind_label(s.kind),
                        s.unique,
                        s.total
                    );
                }
                if let Some((dir, written)) = &exported {
                    eprintln!("   Exported {written} files to {}", dir.display());
                }
                eprintln!(
                    "   Result: {} error(s), {} warning(s)",
                    sink.error_count(),
                    sink.warning_count()
                );
            }
        }
        ReportFormat::Json => {
            let summary = serde_json::json!({
                "nx": graph.nx,
                "ny": graph.ny,
                "mirrors": stats,
                "diagnostics": sink.diagnostics(),
                "exported": exported.as_ref().map(|(_, written)| *written),
            });
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{json}");
        }
    }

    if sink.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Applies `--serial`, `--no-rotation`, and `--fco-offset` on top of the config.
fn merge_options(
    config: &FabricConfig,
    args: &DedupArgs,
) -> Result<GsbOptions, Box<dyn std::error::Error>> {
    let mut options = GsbOptions::from_config(config);
    if args.serial {
        options.parallel = false;
    }
    if let Some(fco_offset) = args.fco_offset {
        if fco_offset == 0 {
            return Err("--fco-offset must be at least 1".into());
        }
        options.rotation = Some(RotationParams { fco_offset });
    }
    if args.no_rotation {
        options.rotation = None;
    }
    Ok(options)
}

/// Combines `--export`/`--export-format` with the `[export]` section.
fn export_plan(settings: &Settings, args: &DedupArgs) -> Option<ExportPlan> {
    let section = settings.config.export.as_ref();
    let dir = match (&args.export, section) {
        (Some(dir), _) => PathBuf::from(dir),
        (None, Some(section)) => settings.base_dir.join(&section.dir),
        (None, None) => return None,
    };
    let format = args
        .export_format
        .map(ExportFormat::from)
        .or(section.map(|s| s.format))
        .unwrap_or_default();
    Some(ExportPlan {
        dir,
        format,
        rotated: section.map_or(true, |s| s.rotated),
    })
}

fn kind_label(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Sb => "switch blocks",
        BlockKind::CbX => "X connection blocks",
        BlockKind::CbY => "Y connection blocks",
    }
}

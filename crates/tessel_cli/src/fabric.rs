//! Shared helpers for CLI commands.
//!
//! Configuration discovery, graph loading (from a file or the synthetic
//! generator), grid-size parsing, and diagnostic rendering.

use std::path::{Path, PathBuf};

use tessel_config::loader::CONFIG_FILE_NAME;
use tessel_config::FabricConfig;
use tessel_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use tessel_gsb::report::SUBMODULE_STATS;
use tessel_rrgraph::synth::UniformFabric;
use tessel_rrgraph::RrGraph;

use crate::GlobalArgs;

/// Channel width of generated fabrics.
pub const SYNTHETIC_CHAN_WIDTH: usize = 4;

/// A loaded configuration and the directory relative paths resolve against.
pub struct Settings {
    /// The parsed configuration; defaults when no file was found.
    pub config: FabricConfig,
    /// Directory containing the configuration file.
    pub base_dir: PathBuf,
}

/// Loads the configuration named by `--config`, or `tessel.toml` in the
/// current directory when present, or the defaults.
pub fn load_settings(global: &GlobalArgs) -> Result<Settings, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        let (file, base_dir) = if p.is_dir() {
            (p.join(CONFIG_FILE_NAME), p)
        } else {
            let base = p
                .parent()
                .map(|d| d.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            (p, base)
        };
        let config = tessel_config::load_config_file(&file)?;
        return Ok(Settings { config, base_dir });
    }

    let cwd = std::env::current_dir()?;
    let config = if cwd.join(CONFIG_FILE_NAME).is_file() {
        tessel_config::load_config(&cwd)?
    } else {
        FabricConfig::default()
    };
    Ok(Settings {
        config,
        base_dir: cwd,
    })
}

/// Parses a grid size of the form `NXxNY` (e.g. `4x4`).
pub fn parse_grid_size(s: &str) -> Result<(usize, usize), Box<dyn std::error::Error>> {
    let (nx, ny) = s
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid grid size '{s}': expected NXxNY"))?;
    let nx: usize = nx
        .parse()
        .map_err(|_| format!("invalid grid width in '{s}'"))?;
    let ny: usize = ny
        .parse()
        .map_err(|_| format!("invalid grid height in '{s}'"))?;
    if nx == 0 || ny == 0 {
        return Err(format!("grid size '{s}' must be at least 1x1").into());
    }
    Ok((nx, ny))
}

/// Produces the routing-resource graph for a command.
///
/// `--synthetic` wins over a graph path; an explicit graph path wins over
/// `fabric.graph` from the configuration, which resolves relative to the
/// configuration directory.
pub fn load_fabric(
    graph: Option<&str>,
    synthetic: Option<&str>,
    settings: &Settings,
) -> Result<RrGraph, Box<dyn std::error::Error>> {
    if let Some(size) = synthetic {
        let (nx, ny) = parse_grid_size(size)?;
        return Ok(UniformFabric::new(nx, ny, SYNTHETIC_CHAN_WIDTH).build());
    }
    let path = match (graph, &settings.config.fabric.graph) {
        (Some(path), _) => PathBuf::from(path),
        (None, Some(path)) => resolve(&settings.base_dir, path),
        (None, None) => {
            return Err(
                "no routing-resource graph given: pass a path, --synthetic, or set fabric.graph"
                    .into(),
            )
        }
    };
    Ok(tessel_rrgraph::load_graph(&path)?)
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

/// Renders all diagnostics from a sink to stderr using the terminal renderer.
///
/// Quiet mode keeps only errors; per-segment submodule statistics are shown
/// in verbose mode only. Returns the number of diagnostics rendered.
pub fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) -> usize {
    let renderer = TerminalRenderer::new(global.color, 80);
    let mut rendered = 0;
    for diag in sink.diagnostics() {
        if global.quiet && !diag.severity.is_error() {
            continue;
        }
        if !global.verbose && diag.code == SUBMODULE_STATS {
            continue;
        }
        eprintln!("{}", renderer.render(&diag));
        rendered += 1;
    }
    rendered
}

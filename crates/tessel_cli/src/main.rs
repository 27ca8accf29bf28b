//! Tessel CLI: routing-tile deduplication for island-style FPGA fabrics.
//!
//! Provides `tessel dedup` for building every switch block and connection
//! block of a fabric and reporting the unique modules, and `tessel inspect`
//! for dumping a single tile.

#![warn(missing_docs)]

mod dedup;
mod fabric;
mod inspect;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Tessel: routing-tile canonicalization for FPGA fabrics.
#[derive(Parser, Debug)]
#[command(name = "tessel", version, about = "Tessel FPGA routing-tile deduplication")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `tessel.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build every routing tile and report the unique modules.
    Dedup(DedupArgs),
    /// Print the description of one switch block.
    Inspect(InspectArgs),
}

/// Arguments for the `tessel dedup` subcommand.
#[derive(Parser, Debug)]
pub struct DedupArgs {
    /// Routing-resource graph (JSON). Defaults to `fabric.graph` from the config.
    pub graph: Option<String>,

    /// Use a generated uniform fabric instead of a graph file (e.g. `4x4`).
    #[arg(long, value_name = "NXxNY")]
    pub synthetic: Option<String>,

    /// Output format for diagnostics and the summary.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write one description file per switch block into this directory.
    #[arg(long, value_name = "DIR")]
    pub export: Option<String>,

    /// File format of exported descriptions.
    #[arg(long, value_enum)]
    pub export_format: Option<ExportFormatArg>,

    /// Skip rotation-aware statistics.
    #[arg(long)]
    pub no_rotation: bool,

    /// Track offset per grid step used by rotation.
    #[arg(long, value_name = "K")]
    pub fco_offset: Option<usize>,

    /// Build tiles on the current thread only.
    #[arg(long)]
    pub serial: bool,
}

/// Arguments for the `tessel inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Routing-resource graph (JSON). Defaults to `fabric.graph` from the config.
    pub graph: Option<String>,

    /// Use a generated uniform fabric instead of a graph file (e.g. `4x4`).
    #[arg(long, value_name = "NXxNY")]
    pub synthetic: Option<String>,

    /// Switch block column.
    #[arg(long)]
    pub x: usize,

    /// Switch block row.
    #[arg(long)]
    pub y: usize,

    /// Print the rotated switch block.
    #[arg(long)]
    pub rotated: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Export file format selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    /// Pretty-printed JSON.
    Json,
    /// XML text.
    Xml,
}

impl From<ExportFormatArg> for tessel_config::ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Json => tessel_config::ExportFormat::Json,
            ExportFormatArg::Xml => tessel_config::ExportFormat::Xml,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var("TERM").is_ok(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Dedup(ref args) => dedup::run(args, &global),
        Command::Inspect(ref args) => inspect::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_dedup_default() {
        let cli = Cli::parse_from(["tessel", "dedup", "fabric.json"]);
        match cli.command {
            Command::Dedup(ref args) => {
                assert_eq!(args.graph.as_deref(), Some("fabric.json"));
                assert!(args.synthetic.is_none());
                assert_eq!(args.format, ReportFormat::Text);
                assert!(args.export.is_none());
                assert!(args.export_format.is_none());
                assert!(!args.no_rotation);
                assert!(args.fco_offset.is_none());
                assert!(!args.serial);
            }
            _ => panic!("expected Dedup command"),
        }
    }

    #[test]
    fn parse_dedup_with_args() {
        let cli = Cli::parse_from([
            "tessel",
            "dedup",
            "--synthetic",
            "4x3",
            "--format",
            "json",
            "--export",
            "out",
            "--export-format",
            "xml",
            "--fco-offset",
            "2",
            "--serial",
        ]);
        match cli.command {
            Command::Dedup(ref args) => {
                assert!(args.graph.is_none());
                assert_eq!(args.synthetic.as_deref(), Some("4x3"));
                assert_eq!(args.format, ReportFormat::Json);
                assert_eq!(args.export.as_deref(), Some("out"));
                assert_eq!(args.export_format, Some(ExportFormatArg::Xml));
                assert_eq!(args.fco_offset, Some(2));
                assert!(args.serial);
            }
            _ => panic!("expected Dedup command"),
        }
    }

    #[test]
    fn parse_dedup_no_rotation() {
        let cli = Cli::parse_from(["tessel", "dedup", "--no-rotation"]);
        match cli.command {
            Command::Dedup(ref args) => assert!(args.no_rotation),
            _ => panic!("expected Dedup command"),
        }
    }

    #[test]
    fn parse_inspect() {
        let cli = Cli::parse_from([
            "tessel",
            "inspect",
            "--synthetic",
            "2x2",
            "--x",
            "1",
            "--y",
            "0",
            "--rotated",
        ]);
        match cli.command {
            Command::Inspect(ref args) => {
                assert_eq!(args.synthetic.as_deref(), Some("2x2"));
                assert_eq!((args.x, args.y), (1, 0));
                assert!(args.rotated);
            }
            _ => panic!("expected Inspect command"),
        }
    }

    #[test]
    fn inspect_requires_coordinates() {
        assert!(Cli::try_parse_from(["tessel", "inspect", "fabric.json"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["tessel", "--quiet", "--color", "never", "dedup"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["tessel", "--config", "/path/to/tessel.toml", "dedup"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/tessel.toml"));
    }

    #[test]
    fn export_format_conversion() {
        assert_eq!(
            tessel_config::ExportFormat::from(ExportFormatArg::Xml),
            tessel_config::ExportFormat::Xml
        );
        assert_eq!(
            tessel_config::ExportFormat::from(ExportFormatArg::Json),
            tessel_config::ExportFormat::Json
        );
    }
}

//! Configuration types deserialized from `tessel.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `tessel.toml`.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct FabricConfig {
    /// Input routing-resource graph.
    #[serde(default)]
    pub fabric: FabricSection,
    /// Tile construction settings.
    #[serde(default)]
    pub build: BuildConfig,
    /// Rotation canonicalization settings.
    #[serde(default)]
    pub rotation: RotationConfig,
    /// Optional per-tile export.
    #[serde(default)]
    pub export: Option<ExportConfig>,
}

/// Where the routing-resource graph comes from.
#[derive(Debug, Default, Deserialize)]
pub struct FabricSection {
    /// Path to a JSON routing-resource graph, relative to the config file.
    pub graph: Option<String>,
}

/// Tile construction settings.
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    /// Build tiles on worker threads.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Rotation canonicalization settings.
#[derive(Debug, Deserialize)]
pub struct RotationConfig {
    /// Whether rotation-aware statistics are computed.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Track offset per grid step of the fan-out pattern (`Fco_offset`).
    #[serde(default = "default_fco_offset")]
    pub fco_offset: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fco_offset: default_fco_offset(),
        }
    }
}

/// Per-tile export settings.
#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    /// Output directory.
    pub dir: String,
    /// File format.
    #[serde(default)]
    pub format: ExportFormat,
    /// Also export rotated switch blocks.
    #[serde(default = "default_true")]
    pub rotated: bool,
}

/// File format for exported tile descriptions.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON (default).
    #[default]
    Json,
    /// XML text.
    Xml,
}

impl ExportFormat {
    /// Returns the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_fco_offset() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FabricConfig::default();
        assert!(config.build.parallel);
        assert!(config.rotation.enabled);
        assert_eq!(config.rotation.fco_offset, 1);
        assert!(config.fabric.graph.is_none());
        assert!(config.export.is_none());
    }

    #[test]
    fn export_format_extension() {
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::Xml.extension(), "xml");
    }

    #[test]
    fn export_section_defaults() {
        let config: FabricConfig = toml::from_str("[export]\ndir = \"out\"\n").unwrap();
        let export = config.export.unwrap();
        assert_eq!(export.dir, "out");
        assert_eq!(export.format, ExportFormat::Json);
        assert!(export.rotated);
    }
}

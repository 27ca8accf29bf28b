//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::FabricConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "tessel.toml";

/// Loads and validates `<project_dir>/tessel.toml`.
pub fn load_config(project_dir: &Path) -> Result<FabricConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<FabricConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `tessel.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<FabricConfig, ConfigError> {
    let config: FabricConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are consistent.
fn validate_config(config: &FabricConfig) -> Result<(), ConfigError> {
    if config.rotation.fco_offset == 0 {
        return Err(ConfigError::ValidationError(
            "rotation.fco_offset must be at least 1".to_string(),
        ));
    }
    if let Some(graph) = &config.fabric.graph {
        if graph.is_empty() {
            return Err(ConfigError::MissingField("fabric.graph".to_string()));
        }
    }
    if let Some(export) = &config.export {
        if export.dir.is_empty() {
            return Err(ConfigError::MissingField("export.dir".to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExportFormat;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert!(config.build.parallel);
        assert_eq!(config.rotation.fco_offset, 1);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[fabric]
graph = "fabric.json"

[build]
parallel = false

[rotation]
enabled = false
fco_offset = 2

[export]
dir = "gsb_out"
format = "xml"
rotated = false
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.fabric.graph.as_deref(), Some("fabric.json"));
        assert!(!config.build.parallel);
        assert!(!config.rotation.enabled);
        assert_eq!(config.rotation.fco_offset, 2);
        let export = config.export.unwrap();
        assert_eq!(export.dir, "gsb_out");
        assert_eq!(export.format, ExportFormat::Xml);
        assert!(!export.rotated);
    }

    #[test]
    fn zero_offset_rejected() {
        let err = load_config_from_str("[rotation]\nfco_offset = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_export_dir_rejected() {
        let err = load_config_from_str("[export]\ndir = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn empty_graph_path_rejected() {
        let err = load_config_from_str("[fabric]\ngraph = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn unknown_format_rejected() {
        let err = load_config_from_str("[export]\ndir = \"x\"\nformat = \"yaml\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[rotation]\nfco_offset = 3\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.rotation.fco_offset, 3);
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}

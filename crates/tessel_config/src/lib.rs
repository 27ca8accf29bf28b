//! Parsing and validation of `tessel.toml` configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`FabricConfig`] controlling graph input, tile construction, rotation
//! canonicalization, and export.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str};
pub use types::*;

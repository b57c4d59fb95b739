//! Configuration for the design-file validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (designcheck.toml)
//! - Environment variables (DESIGNCHECK_*)
//!
//! Command-line flags override anything loaded here.
//!
//! ## Example config file (designcheck.toml):
//! ```toml
//! [schema]
//! file = "lwc.schema.json"
//!
//! [check]
//! paths = true
//!
//! [output]
//! verbose = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the validator
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DesignCheckConfig {
    /// Schema source settings
    #[serde(default)]
    pub schema: SchemaSection,

    /// Check toggles
    #[serde(default)]
    pub check: CheckSection,

    /// Console output settings
    #[serde(default)]
    pub output: OutputSection,
}

/// Schema source configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchemaSection {
    /// Path to the schema document; the embedded schema is used when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Check toggles
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CheckSection {
    /// Verify that every listed source path exists
    #[serde(default)]
    pub paths: bool,
}

/// Console output settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSection {
    /// Dump the defaulted document after validation
    #[serde(default)]
    pub verbose: bool,
}

impl DesignCheckConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, optionally from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["designcheck.toml", ".designcheck.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("org", "lwc", "designcheck") {
            let xdg_config = config_dir.config_dir().join("designcheck.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (DESIGNCHECK_*)
        builder = builder.add_source(
            Environment::with_prefix("DESIGNCHECK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

//! Configuration management for schema flattening
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-flatten.toml)
//! - Environment variables (SCHEMA_FLATTEN__*)
//!
//! ## Example config file (schema-flatten.toml):
//! ```toml
//! [flatten]
//! separator = "."
//! name_policy = "reject"
//! duplicates = "warn"
//! max_depth = 8
//! qualify_with_id = false
//!
//! [output]
//! format = "pretty"
//! include_checksum = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::flatten::{DuplicatePolicy, FlattenOptions, NamePolicy};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlattenConfig {
    /// Flattening settings
    #[serde(default)]
    pub flatten: FlattenSection,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Flattening configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlattenSection {
    /// Separator between path segments
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Policy for unnamed nodes
    #[serde(default)]
    pub name_policy: NamePolicy,

    /// Policy for repeated qualified names
    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    /// Maximum nesting depth (unbounded when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Prefix leaf names with the schema resource id
    #[serde(default)]
    pub qualify_with_id: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub format: OutputFormat,

    /// Attach a checksum to each flattened resource
    #[serde(default = "default_true")]
    pub include_checksum: bool,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

// Default value functions
fn default_separator() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for FlattenSection {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            name_policy: NamePolicy::default(),
            duplicates: DuplicatePolicy::default(),
            max_depth: None,
            qualify_with_id: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            include_checksum: true,
        }
    }
}

impl FlattenSection {
    /// Options for a [`crate::Flattener`]
    pub fn to_options(&self) -> FlattenOptions {
        FlattenOptions {
            separator: self.separator.clone(),
            name_policy: self.name_policy,
            duplicates: self.duplicates,
            max_depth: self.max_depth,
        }
    }
}

impl FlattenConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-flatten.toml",
            ".schema-flatten.toml",
            "config/schema-flatten.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "attribute-schemas", "schema-flatten") {
            let xdg_config = config_dir.config_dir().join("schema-flatten.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMA_FLATTEN__FLATTEN__SEPARATOR, SCHEMA_FLATTEN__OUTPUT__FORMAT, ...
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_FLATTEN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

//! Generator configuration.
//!
//! Configuration comes from defaults, from environment variables under a
//! prefix (`AUTOWIRE_` unless told otherwise), and with the `config` feature
//! from JSON.

use std::env;
use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct GeneratorConfig {
    /// Path generated code uses to reach this crate.
    pub runtime_crate: String,
    /// Appended to an input file's stem to name its artifact.
    pub artifact_suffix: String,
    /// Use parameter names to pick descriptive string placeholders.
    pub placeholder_heuristics: bool,
    /// Also write each artifact next to its input file, best effort.
    pub mirror_beside_inputs: bool,
    /// Where primary artifacts are written.
    pub cache_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_crate: "::ferrous_autowire".to_string(),
            artifact_suffix: ".autowire.rs".to_string(),
            placeholder_heuristics: true,
            mirror_beside_inputs: true,
            cache_dir: PathBuf::from("target/autowire"),
        }
    }
}

impl GeneratorConfig {
    /// Defaults overridden by `AUTOWIRE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_prefix("AUTOWIRE")
    }

    /// Defaults overridden by `{prefix}_*` environment variables.
    ///
    /// Recognized keys: `RUNTIME_CRATE`, `ARTIFACT_SUFFIX`, `PLACEHOLDERS`,
    /// `MIRROR`, `CACHE_DIR`.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let lookup = |key: &str| env::var(format!("{}_{}", prefix.to_uppercase(), key)).ok();
        let mut config = Self::default();

        if let Some(value) = lookup("RUNTIME_CRATE") {
            config.runtime_crate = value;
        }
        if let Some(value) = lookup("ARTIFACT_SUFFIX") {
            config.artifact_suffix = value;
        }
        if let Some(value) = lookup("PLACEHOLDERS") {
            config.placeholder_heuristics = parse_flag("PLACEHOLDERS", &value)?;
        }
        if let Some(value) = lookup("MIRROR") {
            config.mirror_beside_inputs = parse_flag("MIRROR", &value)?;
        }
        if let Some(value) = lookup("CACHE_DIR") {
            config.cache_dir = PathBuf::from(value);
        }
        Ok(config)
    }

    /// Parses a JSON object; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable held something other than a boolean flag.
    InvalidValue { key: &'static str, value: String },
    /// JSON input did not parse.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: {:?} is not a boolean", key, value)
            }
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

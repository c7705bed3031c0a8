// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::local::LocalHandlerFactory;
use crate::config::consts::{
    DEFAULT_HANDLERS, DEFAULT_INPUT, DEFAULT_OVERHEAT_PENALTY_MS, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_SEPARATOR,
};
use crate::errors::ConfigError;
use crate::observability::messages::validation::ConfigLoaded;
use crate::observability::messages::StructuredLog;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure for a conveyor run.
///
/// Every field is optional; a missing file section falls back to the
/// defaults in [`crate::config::consts`]. The pipeline built from it is
/// always `source -> handlers... -> combine`.
///
/// # Fields
/// * `input` - Numbers emitted by the source stage, in order
/// * `deduplicate` - Coalesce identical items in every fan-out stage
/// * `queue_capacity` - Capacity of each hand-off queue (must be at least 1)
/// * `separator` - Joiner used by the aggregation stage
/// * `handlers` - Fan-out handlers, by name, between source and aggregation
/// * `signer` - Latency settings for the SHA-256 signer
///
/// # Example
/// ```yaml
/// input: [0, 1, 1, 2, 3, 5, 8]
/// deduplicate: true
/// queue_capacity: 1
/// separator: "_"
/// handlers: [single_digest, multi_digest]
/// signer:
///   checksum_latency_ms: 0
///   fingerprint_latency_ms: 0
///   overheat_penalty_ms: 1000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: Vec<i64>,
    pub deduplicate: bool,
    pub queue_capacity: usize,
    pub separator: String,
    pub handlers: Vec<String>,
    pub signer: SignerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT.to_vec(),
            deduplicate: true,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            separator: DEFAULT_SEPARATOR.to_string(),
            handlers: DEFAULT_HANDLERS.iter().map(|name| name.to_string()).collect(),
            signer: SignerConfig::default(),
        }
    }
}

/// Artificial latency for the SHA-256 signer, in milliseconds.
///
/// Zero latencies make the signer as fast as the hash itself. The overheat
/// penalty only applies when a fingerprint is requested while another one is
/// still running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    pub checksum_latency_ms: u64,
    pub fingerprint_latency_ms: u64,
    pub overheat_penalty_ms: u64,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            checksum_latency_ms: 0,
            fingerprint_latency_ms: 0,
            overheat_penalty_ms: DEFAULT_OVERHEAT_PENALTY_MS,
        }
    }
}

/// Serialization formats accepted for configuration files, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    /// Parse `content` in this format.
    pub fn parse(&self, content: &str) -> Result<Config, ConfigError> {
        let cfg = match self {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(cfg)
    }
}

/// Load a config from a YAML, TOML or JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = format.parse(&content)?;

    ConfigLoaded {
        path: &path.display().to_string(),
        format: format.as_str(),
        input_count: cfg.input.len(),
    }
    .log();

    Ok(cfg)
}

/// Load and validate a config file
///
/// Rejects values the runtime cannot honour: a zero queue capacity and
/// handler names the local backend does not provide.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    validate_config(&cfg)?;
    Ok(cfg)
}

/// Check the values of an already parsed config.
pub fn validate_config(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.queue_capacity == 0 {
        return Err(ConfigError::InvalidValue {
            field: "queue_capacity",
            reason: "must be at least 1".to_string(),
        });
    }

    if let Some(unknown) = cfg
        .handlers
        .iter()
        .find(|name| !LocalHandlerFactory::is_handler_available(name))
    {
        return Err(ConfigError::InvalidValue {
            field: "handlers",
            reason: format!(
                "unknown handler '{}' (available: {})",
                unknown,
                LocalHandlerFactory::list_available_handlers().join(", ")
            ),
        });
    }

    Ok(())
}

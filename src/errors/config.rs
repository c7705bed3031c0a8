// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::engine::ItemKind;

/// Errors that can occur while wiring stages into a pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The first stage expects an input queue, but nothing feeds it
    MissingSource {
        /// The stage that expected input
        stage: String,
    },
    /// A generator (no input) was placed after the first position
    GeneratorNotFirst {
        /// The misplaced generator
        stage: String,
        /// Zero-based position in the pipeline
        position: usize,
    },
    /// A sink (no output) was placed before the last position
    SinkNotLast {
        /// The misplaced sink
        stage: String,
        /// Zero-based position in the pipeline
        position: usize,
    },
    /// Adjacent stages disagree on the item shape crossing their queue
    KindMismatch {
        /// The producing stage
        upstream: String,
        /// What the producer emits
        emits: ItemKind,
        /// The consuming stage
        downstream: String,
        /// What the consumer accepts
        accepts: ItemKind,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingSource { stage } => {
                write!(
                    f,
                    "Stage '{}' is first in the pipeline but expects an input queue",
                    stage
                )
            }
            ValidationError::GeneratorNotFirst { stage, position } => {
                write!(
                    f,
                    "Generator stage '{}' at position {} would never read its input queue",
                    stage, position
                )
            }
            ValidationError::SinkNotLast { stage, position } => {
                write!(
                    f,
                    "Sink stage '{}' at position {} emits nothing for the stage after it",
                    stage, position
                )
            }
            ValidationError::KindMismatch {
                upstream,
                emits,
                downstream,
                accepts,
            } => {
                write!(
                    f,
                    "Stage '{}' emits {} items but '{}' accepts {} items",
                    upstream, emits, downstream, accepts
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config extension for '{0}' (expected yaml, yml, toml or json)")]
    UnsupportedFormat(PathBuf),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("pipeline wiring rejected: {}", join_errors(.errors))]
    Wiring { errors: Vec<ValidationError> },
}

impl From<Vec<ValidationError>> for ConfigError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ConfigError::Wiring { errors }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|error| error.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

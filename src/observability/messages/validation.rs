// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading and pipeline wiring validation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A wiring rule was violated while building a pipeline.
///
/// # Log Level
/// `error!` - Pipeline will not run
///
/// # Example
/// ```
/// use the_conveyor::errors::ValidationError;
/// use the_conveyor::observability::messages::validation::WiringViolation;
///
/// let error = ValidationError::MissingSource { stage: "multi_digest".to_string() };
/// let msg = WiringViolation { error: &error };
///
/// tracing::error!("{}", msg);
/// ```
pub struct WiringViolation<'a> {
    pub error: &'a crate::errors::ValidationError,
}

impl Display for WiringViolation<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline wiring rejected: {}", self.error)
    }
}

impl StructuredLog for WiringViolation<'_> {
    fn log(&self) {
        tracing::error!(
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "wiring_violation",
            name = name,
            error = %self.error,
        )
    }
}

/// Configuration file parsed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_conveyor::observability::messages::validation::ConfigLoaded;
///
/// let msg = ConfigLoaded {
///     path: "conveyor.yaml",
///     format: "yaml",
///     input_count: 7,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ConfigLoaded<'a> {
    pub path: &'a str,
    pub format: &'a str,
    pub input_count: usize,
}

impl Display for ConfigLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} config '{}' with {} input items",
            self.format, self.path, self.input_count
        )
    }
}

impl StructuredLog for ConfigLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = self.path,
            format = self.format,
            input_count = self.input_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "config_loaded",
            name = name,
            path = self.path,
            format = self.format,
        )
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::engine::ItemKind;
use crate::errors::BrokerError;

/// Errors raised from inside a stage body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    /// A handler received an item of the wrong shape. This is a wiring bug.
    #[error("stage '{stage}' expected a {expected} item but received {found}")]
    UnexpectedItem {
        stage: &'static str,
        expected: ItemKind,
        found: ItemKind,
    },

    #[error("stage '{stage}' requires an input queue but was started without one")]
    MissingInput { stage: &'static str },

    /// The consumer of this stage's output queue has already gone away.
    #[error("stage '{stage}' could not forward an item: downstream queue is closed")]
    DownstreamClosed { stage: &'static str },

    #[error("a task spawned by stage '{stage}' panicked: {message}")]
    TaskPanicked { stage: &'static str, message: String },

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

impl StageError {
    /// True for errors that only echo a failure somewhere downstream.
    pub fn is_secondary(&self) -> bool {
        matches!(self, StageError::DownstreamClosed { .. })
    }
}

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("stage '{stage}' failed: {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: StageError,
    },

    #[error("stage '{stage}' panicked: {message}")]
    StagePanicked { stage: String, message: String },
}

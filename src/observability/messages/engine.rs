// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline executor lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Pipeline execution lifecycle (start, completion, failure)
//! * Per-stage task lifecycle
//! * Items left over at the tail of the pipeline

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Pipeline execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_conveyor::observability::messages::engine::PipelineStarted;
///
/// let msg = PipelineStarted {
///     stage_count: 4,
///     queue_capacity: 1,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineStarted {
    pub stage_count: usize,
    pub queue_capacity: usize,
}

impl Display for PipelineStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline: {} stages, queue_capacity={}",
            self.stage_count, self.queue_capacity
        )
    }
}

impl StructuredLog for PipelineStarted {
    fn log(&self) {
        tracing::info!(
            stage_count = self.stage_count,
            queue_capacity = self.queue_capacity,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline",
            span_name = name,
            stage_count = self.stage_count,
            queue_capacity = self.queue_capacity,
        )
    }
}

/// Pipeline execution completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_conveyor::observability::messages::engine::PipelineCompleted;
/// use std::time::Duration;
///
/// let msg = PipelineCompleted {
///     stage_count: 4,
///     tail_items: 1,
///     duration: Duration::from_millis(250),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineCompleted {
    pub stage_count: usize,
    pub tail_items: usize,
    pub duration: std::time::Duration,
}

impl Display for PipelineCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline completed: {} stages, {} tail items in {:?}",
            self.stage_count, self.tail_items, self.duration
        )
    }
}

impl StructuredLog for PipelineCompleted {
    fn log(&self) {
        tracing::info!(
            stage_count = self.stage_count,
            tail_items = self.tail_items,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_completed",
            span_name = name,
            stage_count = self.stage_count,
            tail_items = self.tail_items,
            duration = ?self.duration,
        )
    }
}

/// Pipeline execution aborted by a stage failure.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_conveyor::observability::messages::engine::PipelineFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = PipelineFailed {
///     stage: "multi_digest",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct PipelineFailed<'a> {
    pub stage: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for PipelineFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline aborted by stage '{}': {}",
            self.stage, self.error
        )
    }
}

impl StructuredLog for PipelineFailed<'_> {
    fn log(&self) {
        tracing::error!(
            stage = self.stage,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "pipeline_failed",
            span_name = name,
            stage = self.stage,
            error = %self.error,
        )
    }
}

/// A stage task was spawned.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct StageStarted<'a> {
    pub stage: &'a str,
    pub position: usize,
}

impl Display for StageStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' started at position {}", self.stage, self.position)
    }
}

impl StructuredLog for StageStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            position = self.position,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage",
            span_name = name,
            stage = self.stage,
            position = self.position,
        )
    }
}

/// A stage body returned and its output queue was finalized.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct StageFinished<'a> {
    pub stage: &'a str,
    pub position: usize,
    pub succeeded: bool,
    pub duration: std::time::Duration,
}

impl Display for StageFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let outcome = if self.succeeded { "finished" } else { "failed" };
        write!(
            f,
            "Stage '{}' at position {} {} after {:?}",
            self.stage, self.position, outcome, self.duration
        )
    }
}

impl StructuredLog for StageFinished<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            position = self.position,
            succeeded = self.succeeded,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage_finished",
            span_name = name,
            stage = self.stage,
            position = self.position,
            succeeded = self.succeeded,
        )
    }
}

/// The last stage emitted an item nobody consumes.
pub struct TailItemDiscarded<'a> {
    pub stage: &'a str,
    pub item: &'a crate::engine::Item,
}

impl Display for TailItemDiscarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Discarding item emitted by last stage '{}': {}", self.stage, self.item)
    }
}

impl StructuredLog for TailItemDiscarded<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            item = %self.item,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("tail_item_discarded", span_name = name, stage = self.stage)
    }
}

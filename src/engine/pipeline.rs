// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Linear pipeline executor.
//!
//! The executor runs an ordered list of [`Stage`]s concurrently, one tokio
//! task per stage, connected by bounded hand-off queues:
//!
//! ```text
//! stage 0 ──q0──▶ stage 1 ──q1──▶ ... ──▶ stage n-1 ──tail──▶ executor
//! ```
//!
//! # Lifecycle
//!
//! - Stage 0 gets no input queue; every other stage reads the queue written
//!   by its predecessor.
//! - A stage's output queue is finalized as soon as its task returns, which
//!   ends the read loop of the stage after it.
//! - The last stage's output is drained by the executor itself so that a
//!   stage emitting trailing items never blocks on a full queue: `execute`
//!   discards those items, `execute_collect` returns them.
//! - The executor joins every stage task before returning.
//!
//! # Failure
//!
//! There is no isolation between stages. When a stage body fails its queues
//! are dropped with it: upstream stages fail to send and stop, downstream
//! stages see their input end. The executor reports the root cause, ranking
//! echoes of the failure (`DownstreamClosed`) below it.
//!
//! # Wiring validation
//!
//! [`PipelineExecutor::new`] checks every adjacent pair of stages before
//! anything runs: only the first stage may be a generator, only the last may
//! be a sink, and the item kind emitted by one stage must be the kind the
//! next accepts.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::config::consts::DEFAULT_QUEUE_CAPACITY;
use crate::engine::queue::hand_off;
use crate::engine::{Item, StageInput, StageOutput};
use crate::errors::{panic_message, ExecutionError, StageError, ValidationError};
use crate::observability::messages::engine::{
    PipelineCompleted, PipelineFailed, PipelineStarted, StageFinished, StageStarted,
    TailItemDiscarded,
};
use crate::observability::messages::validation::WiringViolation;
use crate::observability::messages::StructuredLog;
use crate::traits::Stage;

/// An ordered, validated chain of stages.
pub struct PipelineExecutor {
    stages: Vec<Arc<dyn Stage>>,
    queue_capacity: usize,
}

impl std::fmt::Debug for PipelineExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineExecutor")
            .field("stages", &self.stage_names())
            .field("queue_capacity", &self.queue_capacity)
            .finish()
    }
}

impl PipelineExecutor {
    /// Validate the wiring of `stages` and build an executor for them.
    ///
    /// Returns every violation found, not just the first.
    pub fn new(stages: Vec<Arc<dyn Stage>>) -> Result<Self, Vec<ValidationError>> {
        let errors = validate_wiring(&stages);
        if !errors.is_empty() {
            for error in &errors {
                WiringViolation { error }.log();
            }
            return Err(errors);
        }
        Ok(Self {
            stages,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        })
    }

    /// Capacity of every hand-off queue; clamped to at least 1.
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity.max(1);
        self
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage to completion, discarding anything the last stage emits.
    pub async fn execute(&self) -> Result<(), ExecutionError> {
        self.run(false).await.map(|_| ())
    }

    /// Run every stage to completion and return what the last stage emitted.
    pub async fn execute_collect(&self) -> Result<Vec<Item>, ExecutionError> {
        self.run(true).await
    }

    async fn run(&self, keep_tail: bool) -> Result<Vec<Item>, ExecutionError> {
        let Some(last) = self.stages.last() else {
            return Ok(Vec::new());
        };

        let started = PipelineStarted {
            stage_count: self.stages.len(),
            queue_capacity: self.queue_capacity,
        };
        let span = started.span("pipeline_execution");
        started.log();

        self.run_stages(last.name(), keep_tail).instrument(span).await
    }

    async fn run_stages(
        &self,
        last: &'static str,
        keep_tail: bool,
    ) -> Result<Vec<Item>, ExecutionError> {
        let start_time = Instant::now();

        let mut tasks: Vec<(&'static str, JoinHandle<Result<(), StageError>>)> =
            Vec::with_capacity(self.stages.len());
        let mut input: Option<StageInput> = None;
        for (position, stage) in self.stages.iter().enumerate() {
            let (output, next_input) = hand_off(stage.name(), self.queue_capacity);
            let task = tokio::spawn(run_stage(stage.clone(), position, input.take(), output));
            tasks.push((stage.name(), task));
            input = Some(next_input);
        }

        let mut tail = Vec::new();
        if let Some(mut tail_input) = input {
            while let Some(item) = tail_input.recv().await {
                if keep_tail {
                    tail.push(item);
                } else {
                    TailItemDiscarded {
                        stage: last,
                        item: &item,
                    }
                    .log();
                }
            }
        }

        let mut root_cause: Option<ExecutionError> = None;
        let mut echo: Option<ExecutionError> = None;
        for (stage, task) in tasks {
            let failure = match task.await {
                Ok(Ok(())) => continue,
                Ok(Err(source)) if source.is_secondary() => {
                    if echo.is_none() {
                        echo = Some(ExecutionError::StageFailed {
                            stage: stage.to_string(),
                            source,
                        });
                    }
                    continue;
                }
                Ok(Err(source)) => ExecutionError::StageFailed {
                    stage: stage.to_string(),
                    source,
                },
                Err(error) => ExecutionError::StagePanicked {
                    stage: stage.to_string(),
                    message: panic_message(error),
                },
            };
            if root_cause.is_none() {
                root_cause = Some(failure);
            }
        }

        if let Some(error) = root_cause.or(echo) {
            let stage = match &error {
                ExecutionError::StageFailed { stage, .. } => stage.as_str(),
                ExecutionError::StagePanicked { stage, .. } => stage.as_str(),
            };
            PipelineFailed {
                stage,
                error: &error,
            }
            .log();
            return Err(error);
        }

        PipelineCompleted {
            stage_count: self.stages.len(),
            tail_items: tail.len(),
            duration: start_time.elapsed(),
        }
        .log();
        Ok(tail)
    }
}

/// Body of one stage task. `output` is moved into the stage and dropped with
/// it, which finalizes the queue for the next stage.
async fn run_stage(
    stage: Arc<dyn Stage>,
    position: usize,
    input: Option<StageInput>,
    output: StageOutput,
) -> Result<(), StageError> {
    StageStarted {
        stage: stage.name(),
        position,
    }
    .log();
    let start_time = Instant::now();

    let result = stage.run(input, output).await;

    StageFinished {
        stage: stage.name(),
        position,
        succeeded: result.is_ok(),
        duration: start_time.elapsed(),
    }
    .log();
    result
}

fn validate_wiring(stages: &[Arc<dyn Stage>]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let last_position = stages.len().saturating_sub(1);

    for (position, stage) in stages.iter().enumerate() {
        if position == 0 && stage.accepts().is_some() {
            errors.push(ValidationError::MissingSource {
                stage: stage.name().to_string(),
            });
        }
        if position > 0 && stage.accepts().is_none() {
            errors.push(ValidationError::GeneratorNotFirst {
                stage: stage.name().to_string(),
                position,
            });
        }
        if position < last_position && stage.emits().is_none() {
            errors.push(ValidationError::SinkNotLast {
                stage: stage.name().to_string(),
                position,
            });
        }
    }

    for pair in stages.windows(2) {
        let (upstream, downstream) = (&pair[0], &pair[1]);
        if let (Some(emits), Some(accepts)) = (upstream.emits(), downstream.accepts()) {
            if emits != accepts {
                errors.push(ValidationError::KindMismatch {
                    upstream: upstream.name().to_string(),
                    emits,
                    downstream: downstream.name().to_string(),
                    accepts,
                });
            }
        }
    }

    errors
}

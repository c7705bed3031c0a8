// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for fan-out and concrete stage events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A fan-out stage began reading its input.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_conveyor::observability::messages::stage::FanOutStarted;
///
/// let msg = FanOutStarted {
///     stage: "single_digest",
///     deduplicate: true,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct FanOutStarted<'a> {
    pub stage: &'a str,
    pub deduplicate: bool,
}

impl Display for FanOutStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Fan-out stage '{}' started: deduplicate={}",
            self.stage, self.deduplicate
        )
    }
}

impl StructuredLog for FanOutStarted<'_> {
    fn log(&self) {
        tracing::info!(
            stage = self.stage,
            deduplicate = self.deduplicate,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "fan_out",
            span_name = name,
            stage = self.stage,
            deduplicate = self.deduplicate,
        )
    }
}

/// A fan-out stage forwarded every result and is about to finalize its output.
///
/// `computed`, `coalesced` and `replayed` come from the stage's broker and
/// are all zero when deduplication is off.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_conveyor::observability::messages::stage::FanOutCompleted;
/// use std::time::Duration;
///
/// let msg = FanOutCompleted {
///     stage: "single_digest",
///     items: 7,
///     computed: 6,
///     coalesced: 1,
///     replayed: 0,
///     duration: Duration::from_millis(12),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct FanOutCompleted<'a> {
    pub stage: &'a str,
    pub items: usize,
    pub computed: usize,
    pub coalesced: usize,
    pub replayed: usize,
    pub duration: std::time::Duration,
}

impl Display for FanOutCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Fan-out stage '{}' completed: {} items (computed={}, coalesced={}, replayed={}) in {:?}",
            self.stage, self.items, self.computed, self.coalesced, self.replayed, self.duration
        )
    }
}

impl StructuredLog for FanOutCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            stage = self.stage,
            items = self.items,
            computed = self.computed,
            coalesced = self.coalesced,
            replayed = self.replayed,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "fan_out_completed",
            span_name = name,
            stage = self.stage,
            items = self.items,
        )
    }
}

/// The aggregation stage joined everything it received.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct ResultsCombined<'a> {
    pub stage: &'a str,
    pub count: usize,
    pub output_len: usize,
}

impl Display for ResultsCombined<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' combined {} results into {} bytes",
            self.stage, self.count, self.output_len
        )
    }
}

impl StructuredLog for ResultsCombined<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            count = self.count,
            output_len = self.output_len,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("results_combined", span_name = name, stage = self.stage)
    }
}

/// A signer's non-reentrant step was entered concurrently.
///
/// # Log Level
/// `warn!` - Indicates a missing serialization lock
pub struct SignerOverheated<'a> {
    pub signer: &'a str,
    pub penalty: std::time::Duration,
}

impl Display for SignerOverheated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Signer '{}' fingerprint entered concurrently, stalling {:?}",
            self.signer, self.penalty
        )
    }
}

impl StructuredLog for SignerOverheated<'_> {
    fn log(&self) {
        tracing::warn!(
            signer = self.signer,
            penalty_ms = self.penalty.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("signer_overheated", span_name = name, signer = self.signer)
    }
}

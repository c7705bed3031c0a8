// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit the same event with structured fields at the
//! level appropriate for it.
//!
//! # Organization
//!
//! * `engine` - pipeline executor lifecycle and stage events
//! * `stage` - fan-out and concrete stage events
//! * `broker` - single-flight broker events
//! * `validation` - configuration and wiring validation
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_conveyor::observability::messages::engine::PipelineStarted;
//!
//! let msg = PipelineStarted {
//!     stage_count: 4,
//!     queue_capacity: 1,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

use tracing::Span;

pub mod broker;
pub mod engine;
pub mod stage;
pub mod validation;

/// A log event that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the event.
    fn log(&self);

    /// Build a span carrying the event's fields.
    fn span(&self, name: &str) -> Span;
}

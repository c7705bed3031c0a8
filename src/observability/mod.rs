// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the conveyor. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between the human-readable line and structured fields
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::engine` - pipeline executor lifecycle and stage events
//! * `messages::stage` - fan-out stage and concrete stage events
//! * `messages::broker` - single-flight broker subscription and broadcast events
//! * `messages::validation` - configuration loading and wiring validation
//!
//! # Usage
//!
//! ```rust
//! use the_conveyor::observability::messages::StructuredLog;
//! use the_conveyor::observability::messages::engine::StageStarted;
//!
//! let msg = StageStarted {
//!     stage: "single_digest",
//!     position: 1,
//! };
//!
//! msg.log();
//! ```

pub mod messages;

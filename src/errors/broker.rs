// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for the single-flight message broker.
//!
//! All of these are recoverable: a failed store only means one item's result
//! was not cached, the computed value itself is still forwarded downstream.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// A result was published for a key nobody subscribed to first.
    #[error("unknown key {key}: no subscription exists for it")]
    UnknownKey { key: String },

    /// The record's waiter count disagrees with its registered delivery handles.
    #[error("waiter count mismatch for key {key}: counted {counted}, registered {registered}")]
    WaiterCountMismatch {
        key: String,
        counted: usize,
        registered: usize,
    },

    /// The key already holds a cached result; cached results are write-once.
    #[error("key {key} already holds a cached result")]
    AlreadyCached { key: String },

    /// The broker was dropped before the slot received its delivery.
    #[error("promise slot closed before a result was delivered")]
    SlotClosed,
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod broker;
mod config;
mod execution;

pub use broker::BrokerError;
pub use config::{ConfigError, ValidationError};
pub use execution::{ExecutionError, StageError};

/// Render a task panic payload for error messages.
pub(crate) fn panic_message(error: tokio::task::JoinError) -> String {
    if error.is_cancelled() {
        return "task was cancelled".to_string();
    }
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the single-flight message broker.
//!
//! Subscriptions and broadcasts are high-volume events and log at `trace!`
//! and `debug!`; only failed stores are surfaced at `warn!`.

use crate::observability::messages::StructuredLog;
use std::fmt::{Debug, Display, Formatter};
use tracing::Span;

/// A subscription was opened for a key.
///
/// `outcome` is one of `"compute"`, `"coalesce"` or `"replay"`.
///
/// # Log Level
/// `trace!` - One event per item
pub struct SubscriptionOpened<'a> {
    pub key: &'a dyn Debug,
    pub outcome: &'static str,
}

impl Display for SubscriptionOpened<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Subscription for {:?}: {}", self.key, self.outcome)
    }
}

impl StructuredLog for SubscriptionOpened<'_> {
    fn log(&self) {
        tracing::trace!(
            key = ?self.key,
            outcome = self.outcome,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "subscription",
            span_name = name,
            key = ?self.key,
            outcome = self.outcome,
        )
    }
}

/// A computed result was broadcast to its waiters and cached.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
///
/// # Example
/// ```
/// use the_conveyor::observability::messages::broker::ResultStored;
///
/// let key = 5_i64;
/// let msg = ResultStored {
///     key: &key,
///     delivered: 3,
///     undelivered: 0,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ResultStored<'a> {
    pub key: &'a dyn Debug,
    pub delivered: usize,
    pub undelivered: usize,
}

impl Display for ResultStored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Result for {:?} cached and broadcast to {} waiters ({} gone)",
            self.key, self.delivered, self.undelivered
        )
    }
}

impl StructuredLog for ResultStored<'_> {
    fn log(&self) {
        tracing::debug!(
            key = ?self.key,
            delivered = self.delivered,
            undelivered = self.undelivered,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "result_stored",
            span_name = name,
            key = ?self.key,
            delivered = self.delivered,
        )
    }
}

/// Storing a computed result in the broker failed; the result is still forwarded.
///
/// # Log Level
/// `warn!` - Degraded behavior, output unaffected
///
/// # Example
/// ```
/// use the_conveyor::errors::BrokerError;
/// use the_conveyor::observability::messages::broker::BrokerStoreFailed;
///
/// let error = BrokerError::UnknownKey { key: "Number(3)".to_string() };
/// let msg = BrokerStoreFailed {
///     stage: "single_digest",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct BrokerStoreFailed<'a> {
    pub stage: &'a str,
    pub error: &'a crate::errors::BrokerError,
}

impl Display for BrokerStoreFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' could not cache its result: {}",
            self.stage, self.error
        )
    }
}

impl StructuredLog for BrokerStoreFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            stage = self.stage,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "broker_store_failed",
            span_name = name,
            stage = self.stage,
            error = %self.error,
        )
    }
}

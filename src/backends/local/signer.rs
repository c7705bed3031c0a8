// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::config::consts::DEFAULT_OVERHEAT_PENALTY_MS;
use crate::config::SignerConfig;
use crate::observability::messages::stage::SignerOverheated;
use crate::observability::messages::StructuredLog;
use crate::traits::DigestProvider;

/// SHA-256 backed digest provider.
///
/// `checksum` is the big-endian `u32` prefix of the digest in decimal and may
/// be called from any number of tasks. `fingerprint` is the full lowercase hex
/// digest and models a non-reentrant signer: a call that overlaps another one
/// "overheats" and stalls for `overheat_penalty` before retrying. Callers are
/// expected to serialize it, and [`Sha256Signer::overheats`] lets tests prove
/// they did.
pub struct Sha256Signer {
    checksum_latency: Duration,
    fingerprint_latency: Duration,
    overheat_penalty: Duration,
    busy: AtomicBool,
    overheats: AtomicUsize,
}

impl Sha256Signer {
    /// A signer with no artificial latency.
    pub fn new() -> Self {
        Self {
            checksum_latency: Duration::ZERO,
            fingerprint_latency: Duration::ZERO,
            overheat_penalty: Duration::from_millis(DEFAULT_OVERHEAT_PENALTY_MS),
            busy: AtomicBool::new(false),
            overheats: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &SignerConfig) -> Self {
        Self {
            checksum_latency: Duration::from_millis(config.checksum_latency_ms),
            fingerprint_latency: Duration::from_millis(config.fingerprint_latency_ms),
            overheat_penalty: Duration::from_millis(config.overheat_penalty_ms),
            ..Self::new()
        }
    }

    pub fn with_latency(mut self, checksum: Duration, fingerprint: Duration) -> Self {
        self.checksum_latency = checksum;
        self.fingerprint_latency = fingerprint;
        self
    }

    pub fn with_overheat_penalty(mut self, penalty: Duration) -> Self {
        self.overheat_penalty = penalty;
        self
    }

    /// How many `fingerprint` calls found the signer already busy.
    pub fn overheats(&self) -> usize {
        self.overheats.load(Ordering::Relaxed)
    }

    async fn cool_down(&self) -> BusyGuard<'_> {
        while self.busy.swap(true, Ordering::AcqRel) {
            self.overheats.fetch_add(1, Ordering::Relaxed);
            SignerOverheated {
                signer: self.name(),
                penalty: self.overheat_penalty,
            }
            .log();
            if self.overheat_penalty.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.overheat_penalty).await;
            }
        }
        BusyGuard(&self.busy)
    }
}

impl Default for Sha256Signer {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks the fingerprint step idle again, also when the call is cancelled.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[async_trait]
impl DigestProvider for Sha256Signer {
    async fn checksum(&self, data: &str) -> String {
        simulate_latency(self.checksum_latency).await;
        let digest = Sha256::digest(data.as_bytes());
        let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
        prefix.to_string()
    }

    async fn fingerprint(&self, data: &str) -> String {
        let _busy = self.cool_down().await;
        simulate_latency(self.fingerprint_latency).await;
        format!("{:x}", Sha256::digest(data.as_bytes()))
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}

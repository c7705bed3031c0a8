// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::consts::MULTI_DIGEST_PHASES;
use crate::engine::{Item, ItemKind};
use crate::errors::StageError;
use crate::traits::{DigestProvider, ItemHandler};

/// Multi digest handler - concatenates `checksum(phase + text)` for every phase
///
/// Phases run concurrently and are joined in phase order. The serial lock is
/// never taken: checksums are safe to compute in parallel.
pub struct MultiDigest {
    signer: Arc<dyn DigestProvider>,
    phases: usize,
}

impl MultiDigest {
    pub fn new(signer: Arc<dyn DigestProvider>) -> Self {
        Self {
            signer,
            phases: MULTI_DIGEST_PHASES,
        }
    }

    pub fn with_phases(mut self, phases: usize) -> Self {
        self.phases = phases;
        self
    }
}

#[async_trait]
impl ItemHandler for MultiDigest {
    async fn handle(&self, item: Item, _serial: &Mutex<()>) -> Result<String, StageError> {
        let text = match item {
            Item::Text(text) => text,
            other => {
                return Err(StageError::UnexpectedItem {
                    stage: self.name(),
                    expected: ItemKind::Text,
                    found: other.kind(),
                })
            }
        };

        let inputs: Vec<String> = (0..self.phases)
            .map(|phase| format!("{}{}", phase, text))
            .collect();
        let checksums = join_all(inputs.iter().map(|input| self.signer.checksum(input))).await;

        Ok(checksums.concat())
    }

    fn name(&self) -> &'static str {
        "multi_digest"
    }

    fn accepts(&self) -> ItemKind {
        ItemKind::Text
    }
}

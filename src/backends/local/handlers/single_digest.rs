// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::consts::SINGLE_DIGEST_JOINER;
use crate::engine::{Item, ItemKind};
use crate::errors::StageError;
use crate::traits::{DigestProvider, ItemHandler};

/// Single digest handler - turns a number into `checksum(n)~checksum(fingerprint(n))`
///
/// The fingerprint is taken under the stage's serial lock; both checksums
/// then run concurrently without it.
pub struct SingleDigest {
    signer: Arc<dyn DigestProvider>,
}

impl SingleDigest {
    pub fn new(signer: Arc<dyn DigestProvider>) -> Self {
        Self { signer }
    }
}

#[async_trait]
impl ItemHandler for SingleDigest {
    async fn handle(&self, item: Item, serial: &Mutex<()>) -> Result<String, StageError> {
        let data = match item {
            Item::Number(n) => n.to_string(),
            other => {
                return Err(StageError::UnexpectedItem {
                    stage: self.name(),
                    expected: ItemKind::Number,
                    found: other.kind(),
                })
            }
        };

        let fingerprint = {
            let _serial = serial.lock().await;
            self.signer.fingerprint(&data).await
        };

        let (plain, fingerprinted) = tokio::join!(
            self.signer.checksum(&data),
            self.signer.checksum(&fingerprint)
        );

        Ok(format!("{}{}{}", plain, SINGLE_DIGEST_JOINER, fingerprinted))
    }

    fn name(&self) -> &'static str {
        "single_digest"
    }

    fn accepts(&self) -> ItemKind {
        ItemKind::Number
    }
}

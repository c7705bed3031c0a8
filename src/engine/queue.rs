// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded hand-off queues between adjacent stages.
//!
//! Each queue has exactly one producing stage and one consuming stage. The
//! producing stage owns the [`StageOutput`]; the queue is finalized when the
//! last clone of it is dropped, which ends the consumer's read loop.

use tokio::sync::mpsc;

use crate::engine::Item;
use crate::errors::StageError;

/// Create a bounded queue owned by the stage named `producer`.
pub fn hand_off(producer: &'static str, capacity: usize) -> (StageOutput, StageInput) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (StageOutput { producer, tx }, StageInput { rx })
}

/// Read side of a hand-off queue.
#[derive(Debug)]
pub struct StageInput {
    rx: mpsc::Receiver<Item>,
}

impl StageInput {
    /// Next item, or `None` once the producer has finalized the queue.
    pub async fn recv(&mut self) -> Option<Item> {
        self.rx.recv().await
    }

    /// Drain the queue to exhaustion.
    pub async fn collect(mut self) -> Vec<Item> {
        let mut items = Vec::new();
        while let Some(item) = self.rx.recv().await {
            items.push(item);
        }
        items
    }
}

/// Write side of a hand-off queue. Clones share the same queue.
#[derive(Debug, Clone)]
pub struct StageOutput {
    producer: &'static str,
    tx: mpsc::Sender<Item>,
}

impl StageOutput {
    /// Forward an item, waiting while the queue is full.
    pub async fn send(&self, item: Item) -> Result<(), StageError> {
        self.tx
            .send(item)
            .await
            .map_err(|_| StageError::DownstreamClosed {
                stage: self.producer,
            })
    }

    pub fn producer(&self) -> &'static str {
        self.producer
    }
}

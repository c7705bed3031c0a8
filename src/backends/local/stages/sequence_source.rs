// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::engine::{Item, ItemKind, StageInput, StageOutput};
use crate::errors::StageError;
use crate::traits::Stage;

/// Generator stage - emits a fixed list of numbers in order
pub struct SequenceSource {
    numbers: Vec<i64>,
}

impl SequenceSource {
    pub fn new(numbers: Vec<i64>) -> Self {
        Self { numbers }
    }

    pub fn numbers(&self) -> &[i64] {
        &self.numbers
    }
}

#[async_trait]
impl Stage for SequenceSource {
    async fn run(&self, _input: Option<StageInput>, output: StageOutput) -> Result<(), StageError> {
        for &number in &self.numbers {
            output.send(Item::Number(number)).await?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sequence_source"
    }

    fn accepts(&self) -> Option<ItemKind> {
        None
    }

    fn emits(&self) -> Option<ItemKind> {
        Some(ItemKind::Number)
    }
}

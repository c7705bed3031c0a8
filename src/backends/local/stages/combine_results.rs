// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::config::consts::DEFAULT_SEPARATOR;
use crate::engine::{Item, ItemKind, StageInput, StageOutput};
use crate::errors::StageError;
use crate::observability::messages::stage::ResultsCombined;
use crate::observability::messages::StructuredLog;
use crate::traits::Stage;

/// Aggregation stage - collects every text, sorts, joins and emits one text
///
/// Sorting makes the output independent of the order in which concurrent
/// fan-out tasks delivered their results.
pub struct CombineResults {
    separator: String,
}

impl CombineResults {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Sort `results` lexicographically and join them.
    pub fn combine(&self, mut results: Vec<String>) -> String {
        results.sort();
        results.join(&self.separator)
    }
}

impl Default for CombineResults {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

#[async_trait]
impl Stage for CombineResults {
    async fn run(&self, input: Option<StageInput>, output: StageOutput) -> Result<(), StageError> {
        let mut input = input.ok_or(StageError::MissingInput { stage: self.name() })?;

        let mut results = Vec::new();
        while let Some(item) = input.recv().await {
            match item {
                Item::Text(text) => results.push(text),
                other => {
                    return Err(StageError::UnexpectedItem {
                        stage: self.name(),
                        expected: ItemKind::Text,
                        found: other.kind(),
                    })
                }
            }
        }

        let count = results.len();
        let combined = self.combine(results);
        ResultsCombined {
            stage: self.name(),
            count,
            output_len: combined.len(),
        }
        .log();

        output.send(Item::Text(combined)).await
    }

    fn name(&self) -> &'static str {
        "combine_results"
    }

    fn accepts(&self) -> Option<ItemKind> {
        Some(ItemKind::Text)
    }

    fn emits(&self) -> Option<ItemKind> {
        Some(ItemKind::Text)
    }
}

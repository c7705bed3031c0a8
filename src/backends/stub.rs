// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::engine::{Item, ItemKind, StageInput, StageOutput};
use crate::errors::StageError;
use crate::traits::{DigestProvider, ItemHandler, Stage};

/// Deterministic digest provider: `checksum(x) = "c(x)"`, `fingerprint(x) = "f(x)"`
pub struct StubSigner;

#[async_trait]
impl DigestProvider for StubSigner {
    async fn checksum(&self, data: &str) -> String {
        format!("c({})", data)
    }

    async fn fingerprint(&self, data: &str) -> String {
        format!("f({})", data)
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Handler that records how often, and how concurrently, it was invoked
pub struct CountingHandler {
    invocations: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    active_serial: AtomicUsize,
    max_active_serial: AtomicUsize,
}

impl CountingHandler {
    pub fn new() -> Self {
        Self {
            invocations: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            active_serial: AtomicUsize::new(0),
            max_active_serial: AtomicUsize::new(0),
        }
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_total(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_serial(&self) -> usize {
        self.max_active_serial.load(Ordering::SeqCst)
    }
}

fn enter(active: &AtomicUsize, max_active: &AtomicUsize) {
    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
    max_active.fetch_max(now, Ordering::SeqCst);
}

#[async_trait]
impl ItemHandler for CountingHandler {
    async fn handle(&self, item: Item, serial: &Mutex<()>) -> Result<String, StageError> {
        let Item::Number(n) = item else {
            return Err(StageError::UnexpectedItem {
                stage: self.name(),
                expected: ItemKind::Number,
                found: item.kind(),
            });
        };
        self.invocations.fetch_add(1, Ordering::SeqCst);
        enter(&self.active, &self.max_active);

        {
            let _serial = serial.lock().await;
            enter(&self.active_serial, &self.max_active_serial);
            tokio::time::sleep(Duration::from_millis(2)).await;
            self.active_serial.fetch_sub(1, Ordering::SeqCst);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(format!("n{}", n))
    }

    fn name(&self) -> &'static str {
        "counting"
    }

    fn accepts(&self) -> ItemKind {
        ItemKind::Number
    }
}

/// Handler that accepts numbers but fails on anything else
pub struct RejectingHandler;

#[async_trait]
impl ItemHandler for RejectingHandler {
    async fn handle(&self, item: Item, _serial: &Mutex<()>) -> Result<String, StageError> {
        match item {
            Item::Number(n) => Ok(n.to_string()),
            other => Err(StageError::UnexpectedItem {
                stage: self.name(),
                expected: ItemKind::Number,
                found: other.kind(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn accepts(&self) -> ItemKind {
        ItemKind::Number
    }
}

/// Handler that panics on `7` and formats other numbers like `CountingHandler`
pub struct PanicOnSeven;

#[async_trait]
impl ItemHandler for PanicOnSeven {
    async fn handle(&self, item: Item, _serial: &Mutex<()>) -> Result<String, StageError> {
        match item {
            Item::Number(7) => panic!("handler cannot digest 7"),
            Item::Number(n) => Ok(format!("n{}", n)),
            other => Err(StageError::UnexpectedItem {
                stage: self.name(),
                expected: ItemKind::Number,
                found: other.kind(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "panic_on_seven"
    }

    fn accepts(&self) -> ItemKind {
        ItemKind::Number
    }
}

/// Sink that keeps everything it reads
pub struct CollectingSink {
    accepts: ItemKind,
    items: StdMutex<Vec<Item>>,
}

impl CollectingSink {
    pub fn new(accepts: ItemKind) -> Self {
        Self {
            accepts,
            items: StdMutex::new(Vec::new()),
        }
    }

    pub fn items(&self) -> Vec<Item> {
        self.items.lock().unwrap().clone()
    }

    pub fn numbers(&self) -> Vec<i64> {
        self.items().iter().filter_map(Item::as_number).collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.items().into_iter().filter_map(Item::into_text).collect()
    }
}

#[async_trait]
impl Stage for CollectingSink {
    async fn run(&self, input: Option<StageInput>, _output: StageOutput) -> Result<(), StageError> {
        let mut input = input.ok_or(StageError::MissingInput { stage: self.name() })?;
        while let Some(item) = input.recv().await {
            self.items.lock().unwrap().push(item);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "collecting_sink"
    }

    fn accepts(&self) -> Option<ItemKind> {
        Some(self.accepts)
    }

    fn emits(&self) -> Option<ItemKind> {
        None
    }
}

/// Multiplies every number, optionally sleeping before each one
pub struct ScaleStage {
    factor: i64,
    delay: Duration,
}

impl ScaleStage {
    pub fn new(factor: i64) -> Self {
        Self {
            factor,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Stage for ScaleStage {
    async fn run(&self, input: Option<StageInput>, output: StageOutput) -> Result<(), StageError> {
        let mut input = input.ok_or(StageError::MissingInput { stage: self.name() })?;
        while let Some(item) = input.recv().await {
            let Some(n) = item.as_number() else {
                return Err(StageError::UnexpectedItem {
                    stage: self.name(),
                    expected: ItemKind::Number,
                    found: item.kind(),
                });
            };
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            output.send(Item::Number(n * self.factor)).await?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "scale"
    }

    fn accepts(&self) -> Option<ItemKind> {
        Some(ItemKind::Number)
    }

    fn emits(&self) -> Option<ItemKind> {
        Some(ItemKind::Number)
    }
}

/// Forwards texts unchanged
pub struct TextEcho;

#[async_trait]
impl Stage for TextEcho {
    async fn run(&self, input: Option<StageInput>, output: StageOutput) -> Result<(), StageError> {
        let mut input = input.ok_or(StageError::MissingInput { stage: self.name() })?;
        while let Some(item) = input.recv().await {
            output.send(item).await?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "text_echo"
    }

    fn accepts(&self) -> Option<ItemKind> {
        Some(ItemKind::Text)
    }

    fn emits(&self) -> Option<ItemKind> {
        Some(ItemKind::Text)
    }
}

/// Forwards `limit` numbers as text, then fails on the next one
pub struct FailingStage {
    limit: usize,
}

impl FailingStage {
    pub fn after(limit: usize) -> Self {
        Self { limit }
    }
}

#[async_trait]
impl Stage for FailingStage {
    async fn run(&self, input: Option<StageInput>, output: StageOutput) -> Result<(), StageError> {
        let mut input = input.ok_or(StageError::MissingInput { stage: self.name() })?;
        let mut seen = 0;
        while let Some(item) = input.recv().await {
            if seen == self.limit {
                return Err(StageError::UnexpectedItem {
                    stage: self.name(),
                    expected: ItemKind::Text,
                    found: item.kind(),
                });
            }
            seen += 1;
            output.send(Item::Text(item.to_string())).await?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "failing"
    }

    fn accepts(&self) -> Option<ItemKind> {
        Some(ItemKind::Number)
    }

    fn emits(&self) -> Option<ItemKind> {
        Some(ItemKind::Text)
    }
}

/// Sink that panics on its first item
pub struct PanickingStage;

#[async_trait]
impl Stage for PanickingStage {
    async fn run(&self, input: Option<StageInput>, _output: StageOutput) -> Result<(), StageError> {
        let mut input = input.ok_or(StageError::MissingInput { stage: self.name() })?;
        if let Some(item) = input.recv().await {
            panic!("wiring bug: stage cannot handle {}", item);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "panicking"
    }

    fn accepts(&self) -> Option<ItemKind> {
        Some(ItemKind::Number)
    }

    fn emits(&self) -> Option<ItemKind> {
        None
    }
}

/// Generator that declares numbers but emits texts, to get past wiring checks
pub struct MislabeledSource {
    texts: Vec<&'static str>,
}

impl MislabeledSource {
    pub fn new(texts: Vec<&'static str>) -> Self {
        Self { texts }
    }
}

#[async_trait]
impl Stage for MislabeledSource {
    async fn run(&self, _input: Option<StageInput>, output: StageOutput) -> Result<(), StageError> {
        for text in &self.texts {
            output.send(Item::from(*text)).await?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mislabeled_source"
    }

    fn accepts(&self) -> Option<ItemKind> {
        None
    }

    fn emits(&self) -> Option<ItemKind> {
        Some(ItemKind::Number)
    }
}

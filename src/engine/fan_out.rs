// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fan-out stage: one concurrent task per input item.
//!
//! For every item read from its input queue the stage spawns a task that runs
//! the [`ItemHandler`] and forwards the resulting text downstream. With
//! deduplication on, a per-run [`MessageBroker`] keyed by the item makes sure
//! identical items are computed once: later duplicates spawn a waiter task
//! that forwards the broadcast (or cached) value instead of invoking the
//! handler again.
//!
//! The stage joins every spawned task before returning, so its output queue
//! is only finalized after every result, computed or coalesced, has been
//! forwarded. Finished tasks are joined while input is still being read, so
//! the first task failure surfaces as soon as that task ends: the remaining
//! tasks are aborted and the failure is returned as the stage's error.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinSet};

use crate::engine::{Item, ItemKind, MessageBroker, StageInput, StageOutput, Subscription};
use crate::errors::{panic_message, StageError};
use crate::observability::messages::broker::BrokerStoreFailed;
use crate::observability::messages::stage::{FanOutCompleted, FanOutStarted};
use crate::observability::messages::StructuredLog;
use crate::traits::{ItemHandler, Stage};

pub struct FanOutStage {
    handler: Arc<dyn ItemHandler>,
    deduplicate: bool,
}

impl FanOutStage {
    /// Fan out over `handler` without deduplication.
    pub fn new(handler: Arc<dyn ItemHandler>) -> Self {
        Self {
            handler,
            deduplicate: false,
        }
    }

    /// Enable or disable single-flight deduplication of identical items.
    pub fn deduplicated(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    pub fn is_deduplicated(&self) -> bool {
        self.deduplicate
    }

    fn settle(
        &self,
        joined: Result<Result<(), StageError>, JoinError>,
    ) -> Result<(), StageError> {
        joined.unwrap_or_else(|error| {
            Err(StageError::TaskPanicked {
                stage: self.name(),
                message: panic_message(error),
            })
        })
    }

    fn spawn_compute(
        &self,
        tasks: &mut JoinSet<Result<(), StageError>>,
        item: Item,
        serial: &Arc<Mutex<()>>,
        broker: Option<&Arc<MessageBroker<Item, String>>>,
        output: &StageOutput,
    ) {
        let stage = self.name();
        let handler = self.handler.clone();
        let serial = serial.clone();
        let broker = broker.cloned();
        let output = output.clone();

        tasks.spawn(async move {
            match broker {
                Some(broker) => {
                    let result = handler.handle(item.clone(), &serial).await?;
                    if let Err(error) = broker.store_result(&item, result.clone()) {
                        BrokerStoreFailed {
                            stage,
                            error: &error,
                        }
                        .log();
                    }
                    output.send(Item::Text(result)).await
                }
                None => {
                    let result = handler.handle(item, &serial).await?;
                    output.send(Item::Text(result)).await
                }
            }
        });
    }

    fn dispatch(
        &self,
        tasks: &mut JoinSet<Result<(), StageError>>,
        item: Item,
        serial: &Arc<Mutex<()>>,
        broker: &Arc<MessageBroker<Item, String>>,
        output: &StageOutput,
    ) {
        if !self.deduplicate {
            self.spawn_compute(tasks, item, serial, None, output);
            return;
        }

        match broker.try_subscribe(item.clone()) {
            Subscription::First => self.spawn_compute(tasks, item, serial, Some(broker), output),
            Subscription::Wait(slot) => {
                let output = output.clone();
                tasks.spawn(async move {
                    let result = slot.wait().await?;
                    output.send(Item::Text(result)).await
                });
            }
        }
    }

    async fn run_with_broker(
        &self,
        mut input: StageInput,
        output: StageOutput,
        broker: Arc<MessageBroker<Item, String>>,
    ) -> Result<(), StageError> {
        FanOutStarted {
            stage: self.name(),
            deduplicate: self.deduplicate,
        }
        .log();
        let start_time = Instant::now();

        // Serializes the handler's non-reentrant step across this run's tasks
        let serial = Arc::new(Mutex::new(()));
        let mut tasks: JoinSet<Result<(), StageError>> = JoinSet::new();
        let mut items = 0;

        loop {
            tokio::select! {
                biased;
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => self.settle(joined)?,
                next = input.recv() => {
                    let Some(item) = next else { break };
                    items += 1;
                    self.dispatch(&mut tasks, item, &serial, &broker, &output);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            self.settle(joined)?;
        }

        let stats = broker.stats();
        FanOutCompleted {
            stage: self.name(),
            items,
            computed: stats.computed,
            coalesced: stats.coalesced,
            replayed: stats.replayed,
            duration: start_time.elapsed(),
        }
        .log();
        Ok(())
    }
}

#[async_trait]
impl Stage for FanOutStage {
    async fn run(&self, input: Option<StageInput>, output: StageOutput) -> Result<(), StageError> {
        let input = input.ok_or(StageError::MissingInput { stage: self.name() })?;
        // One broker per run, its cache dies with the run
        self.run_with_broker(input, output, Arc::new(MessageBroker::new()))
            .await
    }

    fn name(&self) -> &'static str {
        self.handler.name()
    }

    fn accepts(&self) -> Option<ItemKind> {
        Some(self.handler.accepts())
    }

    fn emits(&self) -> Option<ItemKind> {
        Some(ItemKind::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{CountingHandler, PanicOnSeven, RejectingHandler};
    use crate::engine::queue::hand_off;
    use std::time::Duration;

    /// Stores its own value for the item first, so the stage's store is refused
    struct PreemptedHandler {
        broker: Arc<MessageBroker<Item, String>>,
    }

    #[async_trait]
    impl ItemHandler for PreemptedHandler {
        async fn handle(&self, item: Item, _serial: &Mutex<()>) -> Result<String, StageError> {
            self.broker.store_result(&item, "stale".to_string())?;
            Ok("fresh".to_string())
        }

        fn name(&self) -> &'static str {
            "preempted"
        }

        fn accepts(&self) -> ItemKind {
            ItemKind::Number
        }
    }

    async fn run_fan_out(stage: FanOutStage, items: Vec<Item>) -> Result<Vec<Item>, StageError> {
        let (feed, input) = hand_off("feed", 1);
        let (output, results) = hand_off(stage.name(), 1);

        let feeder = tokio::spawn(async move {
            for item in items {
                if feed.send(item).await.is_err() {
                    break;
                }
            }
        });
        let collector = tokio::spawn(results.collect());

        let outcome = stage.run(Some(input), output).await;
        feeder.await.unwrap();
        let collected = collector.await.unwrap();
        outcome.map(|_| collected)
    }

    fn sorted_texts(items: Vec<Item>) -> Vec<String> {
        let mut texts: Vec<String> = items.into_iter().filter_map(Item::into_text).collect();
        texts.sort();
        texts
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_one_result_per_item_without_dedup() {
        let handler = Arc::new(CountingHandler::new());
        let stage = FanOutStage::new(handler.clone());
        let items = vec![1, 1, 2, 2, 2, 3].into_iter().map(Item::Number).collect();

        let results = run_fan_out(stage, items).await.unwrap();

        assert_eq!(
            sorted_texts(results),
            vec!["n1", "n1", "n2", "n2", "n2", "n3"]
        );
        assert_eq!(handler.invocations(), 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_dedup_computes_each_distinct_item_once() {
        let handler = Arc::new(CountingHandler::new());
        let stage = FanOutStage::new(handler.clone()).deduplicated(true);
        assert!(stage.is_deduplicated());
        let items = vec![1, 1, 2, 2, 2, 3, 1].into_iter().map(Item::Number).collect();

        let results = run_fan_out(stage, items).await.unwrap();

        assert_eq!(
            sorted_texts(results),
            vec!["n1", "n1", "n1", "n2", "n2", "n2", "n3"]
        );
        assert_eq!(handler.invocations(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_serial_lock_is_shared_across_tasks() {
        let handler = Arc::new(CountingHandler::new());
        let stage = FanOutStage::new(handler.clone());
        let items = (0..16).map(Item::Number).collect();

        run_fan_out(stage, items).await.unwrap();

        assert_eq!(handler.max_concurrent_serial(), 1);
        assert!(handler.max_concurrent_total() > 1);
    }

    #[tokio::test]
    async fn test_wrong_item_shape_aborts_stage() {
        let stage = FanOutStage::new(Arc::new(RejectingHandler));
        let items = vec![Item::from("not a number")];

        let err = run_fan_out(stage, items).await.unwrap_err();
        assert_eq!(
            err,
            StageError::UnexpectedItem {
                stage: "rejecting",
                expected: ItemKind::Number,
                found: ItemKind::Text,
            }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_panicking_task_fails_stage_with_parked_waiters() {
        let stage = FanOutStage::new(Arc::new(PanicOnSeven)).deduplicated(true);
        let items = vec![7, 7, 7, 1].into_iter().map(Item::Number).collect();

        let outcome = tokio::time::timeout(Duration::from_secs(2), run_fan_out(stage, items))
            .await
            .expect("fan-out hung after a task panicked");

        match outcome {
            Err(StageError::TaskPanicked { stage, message }) => {
                assert_eq!(stage, "panic_on_seven");
                assert!(message.contains("cannot digest 7"), "got {:?}", message);
            }
            other => panic!("Expected TaskPanicked error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refused_store_still_forwards_result_once() {
        let broker: Arc<MessageBroker<Item, String>> = Arc::new(MessageBroker::new());
        let stage = FanOutStage::new(Arc::new(PreemptedHandler {
            broker: broker.clone(),
        }))
        .deduplicated(true);
        let (feed, input) = hand_off("feed", 1);
        let (output, results) = hand_off(stage.name(), 1);
        let collector = tokio::spawn(results.collect());

        feed.send(Item::Number(4)).await.unwrap();
        drop(feed);
        stage
            .run_with_broker(input, output, broker.clone())
            .await
            .unwrap();

        assert_eq!(collector.await.unwrap(), vec![Item::from("fresh")]);
        match broker.try_subscribe(Item::Number(4)) {
            Subscription::Wait(slot) => assert_eq!(slot.wait().await.unwrap(), "stale"),
            Subscription::First => panic!("Expected the first stored value to stay cached"),
        }
        assert_eq!(broker.stats().computed, 1);
    }

    #[tokio::test]
    async fn test_task_failure_surfaces_while_input_stays_open() {
        let stage = FanOutStage::new(Arc::new(RejectingHandler));
        let (feed, input) = hand_off("feed", 1);
        let (output, _results) = hand_off(stage.name(), 1);

        feed.send(Item::from("not a number")).await.unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(2), stage.run(Some(input), output))
            .await
            .expect("task failure went unnoticed while input was open");

        assert_eq!(
            outcome.unwrap_err(),
            StageError::UnexpectedItem {
                stage: "rejecting",
                expected: ItemKind::Number,
                found: ItemKind::Text,
            }
        );
        drop(feed);
    }

    #[tokio::test]
    async fn test_missing_input_queue() {
        let stage = FanOutStage::new(Arc::new(CountingHandler::new()));
        let (output, _results) = hand_off(stage.name(), 1);

        let err = stage.run(None, output).await.unwrap_err();
        assert_eq!(err, StageError::MissingInput { stage: "counting" });
    }

    #[tokio::test]
    async fn test_empty_input_finishes_immediately() {
        let stage = FanOutStage::new(Arc::new(CountingHandler::new())).deduplicated(true);
        let results = run_fan_out(stage, Vec::new()).await.unwrap();
        assert!(results.is_empty());
    }
}

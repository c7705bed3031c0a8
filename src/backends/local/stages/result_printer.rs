// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::engine::{ItemKind, StageInput, StageOutput};
use crate::errors::StageError;
use crate::traits::Stage;

/// Terminal stage - writes `CombineResults <value>` for every item it receives
pub struct ResultPrinter {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl ResultPrinter {
    /// Print to standard output.
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(writer),
        }
    }

    fn print(&self, line: &str) {
        // Keep printing after a writer panicked while holding the lock
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(sink, "CombineResults {}", line) {
            tracing::warn!(stage = self.name(), "Failed to print result: {}", e);
        }
    }
}

impl Default for ResultPrinter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Stage for ResultPrinter {
    async fn run(&self, input: Option<StageInput>, _output: StageOutput) -> Result<(), StageError> {
        let mut input = input.ok_or(StageError::MissingInput { stage: self.name() })?;

        while let Some(item) = input.recv().await {
            self.print(&item.to_string());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "result_printer"
    }

    fn accepts(&self) -> Option<ItemKind> {
        Some(ItemKind::Text)
    }

    fn emits(&self) -> Option<ItemKind> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{hand_off, Item};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_prints_every_item() {
        let buffer = SharedBuffer::default();
        let printer = ResultPrinter::with_writer(Box::new(buffer.clone()));
        let (feed, input) = hand_off("feed", 1);
        let (output, _tail) = hand_off(printer.name(), 1);

        let feeder = tokio::spawn(async move {
            feed.send(Item::from("a_b")).await.unwrap();
        });
        printer.run(Some(input), output).await.unwrap();
        feeder.await.unwrap();

        let printed = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(printed, "CombineResults a_b\n");
    }

    #[tokio::test]
    async fn test_prints_after_writer_lock_poisoned() {
        let buffer = SharedBuffer::default();
        let printer = ResultPrinter::with_writer(Box::new(buffer.clone()));

        std::thread::scope(|scope| {
            let poisoner = scope.spawn(|| {
                let _sink = printer.sink.lock().unwrap();
                panic!("writer failed mid-line");
            });
            assert!(poisoner.join().is_err());
        });
        assert!(printer.sink.is_poisoned());

        let (feed, input) = hand_off("feed", 1);
        let (output, _tail) = hand_off(printer.name(), 1);
        let feeder = tokio::spawn(async move {
            feed.send(Item::from("a_b")).await.unwrap();
        });
        printer.run(Some(input), output).await.unwrap();
        feeder.await.unwrap();

        let printed = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(printed, "CombineResults a_b\n");
    }
}

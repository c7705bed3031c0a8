use async_trait::async_trait;

use crate::engine::{ItemKind, StageInput, StageOutput};
use crate::errors::StageError;

/// One step of a pipeline.
///
/// A stage reads its input queue to exhaustion and writes to its output
/// queue. The output is finalized when `run` returns and every clone of
/// `output` has been dropped, so implementations must not leak clones into
/// tasks that outlive the call.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Run the stage body. `input` is `None` only for the first stage.
    async fn run(&self, input: Option<StageInput>, output: StageOutput) -> Result<(), StageError>;

    fn name(&self) -> &'static str;

    /// Item kind read from the input queue; `None` for generators.
    fn accepts(&self) -> Option<ItemKind>;

    /// Item kind written to the output queue; `None` for sinks.
    fn emits(&self) -> Option<ItemKind>;
}

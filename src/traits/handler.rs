use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::engine::{Item, ItemKind};
use crate::errors::StageError;

/// Per-item computation driven by a fan-out stage.
///
/// `serial` is shared by every invocation within one stage run. Handlers hold
/// it only around the one step that must not run concurrently and do
/// everything else lock-free.
#[async_trait]
pub trait ItemHandler: Send + Sync {
    async fn handle(&self, item: Item, serial: &Mutex<()>) -> Result<String, StageError>;

    fn name(&self) -> &'static str;

    fn accepts(&self) -> ItemKind;
}

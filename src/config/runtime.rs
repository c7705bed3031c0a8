// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::local::{CombineResults, LocalHandlerFactory, SequenceSource, Sha256Signer};
use crate::config::Config;
use crate::engine::{FanOutStage, PipelineExecutor};
use crate::errors::ConfigError;
use crate::traits::{DigestProvider, Stage};

/// Pipeline runtime builder - turns a [`Config`] into a ready-to-run executor.
///
/// The stage chain is always the same shape:
///
/// ```text
/// SequenceSource -> FanOutStage(handler) for each configured handler -> CombineResults
/// ```
///
/// Every fan-out stage shares one signer, so the signer's latency settings
/// apply across the whole run.
///
/// # Examples
///
/// ```
/// use the_conveyor::config::{Config, RuntimeBuilder};
///
/// let executor = RuntimeBuilder::from_config(&Config::default()).unwrap();
/// assert_eq!(
///     executor.stage_names(),
///     vec!["sequence_source", "single_digest", "multi_digest", "combine_results"]
/// );
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the executor with a [`Sha256Signer`] configured from `cfg.signer`.
    pub fn from_config(cfg: &Config) -> Result<PipelineExecutor, ConfigError> {
        Self::with_signer(cfg, Arc::new(Sha256Signer::from_config(&cfg.signer)))
    }

    /// Build the executor around a caller-supplied digest provider.
    pub fn with_signer(
        cfg: &Config,
        signer: Arc<dyn DigestProvider>,
    ) -> Result<PipelineExecutor, ConfigError> {
        let stages = Self::stages_from_config(cfg, signer)?;
        Self::from_stages(cfg, stages)
    }

    /// Build the configured stage chain without wiring it.
    ///
    /// Callers can append a terminal stage before handing the list to
    /// [`RuntimeBuilder::from_stages`].
    pub fn stages_from_config(
        cfg: &Config,
        signer: Arc<dyn DigestProvider>,
    ) -> Result<Vec<Arc<dyn Stage>>, ConfigError> {
        let mut stages: Vec<Arc<dyn Stage>> = Vec::with_capacity(cfg.handlers.len() + 2);
        stages.push(Arc::new(SequenceSource::new(cfg.input.clone())));

        for name in &cfg.handlers {
            let handler = LocalHandlerFactory::create_handler(name, signer.clone())?;
            stages.push(Arc::new(
                FanOutStage::new(handler).deduplicated(cfg.deduplicate),
            ));
        }

        stages.push(Arc::new(CombineResults::new(cfg.separator.clone())));
        Ok(stages)
    }

    /// Validate the wiring of `stages` and apply the configured queue capacity.
    pub fn from_stages(
        cfg: &Config,
        stages: Vec<Arc<dyn Stage>>,
    ) -> Result<PipelineExecutor, ConfigError> {
        let executor = PipelineExecutor::new(stages)?;
        Ok(executor.with_queue_capacity(cfg.queue_capacity))
    }
}

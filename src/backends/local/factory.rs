// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::handlers::*;
use crate::errors::ConfigError;
use crate::traits::{DigestProvider, ItemHandler};

/// Factory for creating local (in-process) fan-out handlers
pub struct LocalHandlerFactory;

impl LocalHandlerFactory {
    /// Create a handler by name, sharing `signer` between all handlers.
    ///
    /// - "single_digest" -> SingleDigest
    /// - "multi_digest" -> MultiDigest
    pub fn create_handler(
        name: &str,
        signer: Arc<dyn DigestProvider>,
    ) -> Result<Arc<dyn ItemHandler>, ConfigError> {
        match name {
            "single_digest" => Ok(Arc::new(SingleDigest::new(signer))),
            "multi_digest" => Ok(Arc::new(MultiDigest::new(signer))),
            _ => Err(ConfigError::InvalidValue {
                field: "handlers",
                reason: format!(
                    "unknown handler '{}' (available: {})",
                    name,
                    Self::list_available_handlers().join(", ")
                ),
            }),
        }
    }

    pub fn list_available_handlers() -> Vec<&'static str> {
        vec!["single_digest", "multi_digest"]
    }

    pub fn is_handler_available(name: &str) -> bool {
        Self::list_available_handlers().contains(&name)
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Concrete stages, fan-out handlers and digest providers.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process building blocks for the digest pipeline:
//! - **Stages**: `SequenceSource` (generator), `CombineResults` (aggregator),
//!   `ResultPrinter` (sink)
//! - **Handlers**: `SingleDigest`, `MultiDigest`, created by name through
//!   `LocalHandlerFactory`
//! - **Signer**: `Sha256Signer`, a `DigestProvider` whose fingerprint step
//!   must be serialized by the caller
//!
//! ## Stub Backend (Test-Only)
//! Deterministic fixtures for executor and fan-out tests (only available in
//! test builds): `StubSigner`, counting and rejecting handlers, and small
//! stages that scale, echo, collect, fail or panic.
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use the_conveyor::backends::local::{LocalHandlerFactory, Sha256Signer};
//! use the_conveyor::traits::ItemHandler;
//!
//! let signer = Arc::new(Sha256Signer::new());
//! let handler = LocalHandlerFactory::create_handler("single_digest", signer)?;
//! assert_eq!(handler.name(), "single_digest");
//! # Ok::<(), the_conveyor::errors::ConfigError>(())
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;

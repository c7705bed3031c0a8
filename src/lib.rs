// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // stages, handlers, signers
pub mod config;     // config loading + runtime builder
pub mod engine;     // pipeline executor, fan-out, broker
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // unified abstractions

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod handlers;
pub mod signer;
pub mod stages;

pub use factory::LocalHandlerFactory;
pub use handlers::*;
pub use signer::Sha256Signer;
pub use stages::*;

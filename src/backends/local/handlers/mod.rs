// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod multi_digest;
pub mod single_digest;

pub use multi_digest::*;
pub use single_digest::*;

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod combine_results;
pub mod result_printer;
pub mod sequence_source;

pub use combine_results::*;
pub use result_printer::*;
pub use sequence_source::*;

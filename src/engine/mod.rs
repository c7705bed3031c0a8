// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod broker;
pub mod fan_out;
pub mod item;
pub mod pipeline;
pub mod queue;

pub use broker::{BrokerStats, MessageBroker, PromiseSlot, Subscription};
pub use fan_out::FanOutStage;
pub use item::{Item, ItemKind};
pub use pipeline::PipelineExecutor;
pub use queue::{hand_off, StageInput, StageOutput};

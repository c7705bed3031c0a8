// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// A payload travelling through the pipeline's hand-off queues.
///
/// Generators emit `Number`s; digest stages turn them into `Text`. Each stage
/// declares which kind it accepts and emits so that the executor can reject a
/// mis-wired pipeline before anything runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Number(i64),
    Text(String),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Number(_) => ItemKind::Number,
            Item::Text(_) => ItemKind::Text,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Item::Text(text) => Some(text),
            Item::Number(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Item::Text(text) => Some(text),
            Item::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Item::Number(number) => Some(*number),
            Item::Text(_) => None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Number(number) => write!(f, "{}", number),
            Item::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for Item {
    fn from(number: i64) -> Self {
        Item::Number(number)
    }
}

impl From<String> for Item {
    fn from(text: String) -> Self {
        Item::Text(text)
    }
}

impl From<&str> for Item {
    fn from(text: &str) -> Self {
        Item::Text(text.to_string())
    }
}

/// The shape of an [`Item`], used for wiring-time validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Number,
    Text,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Number => f.write_str("number"),
            ItemKind::Text => f.write_str("text"),
        }
    }
}

//! The mutable record shared by the demo's screens and the dialogue engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::factions::FactionStandings;

/// Flag value types for story flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl FlagValue {
    /// Whether the flag counts as set: `true`, non-zero, or non-empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Int(i) => *i != 0,
            FlagValue::String(s) => !s.is_empty(),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Int(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::String(value.to_string())
    }
}

impl std::fmt::Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{}", b),
            FlagValue::Int(i) => write!(f, "{}", i),
            FlagValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// The complete state of a play session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameState {
    /// Item names carried by the player.
    pub inventory: Vec<String>,

    /// Story flags set by dialogue and scripted events.
    pub flags: HashMap<String, FlagValue>,

    /// Reputation with each faction.
    pub factions: FactionStandings,
}

impl GameState {
    /// A fresh session with every empire standing at zero.
    pub fn new() -> Self {
        Self {
            inventory: Vec::new(),
            flags: HashMap::new(),
            factions: FactionStandings::empires(),
        }
    }

    /// Set a story flag, returning the previous value.
    pub fn set_flag(
        &mut self,
        flag: impl Into<String>,
        value: impl Into<FlagValue>,
    ) -> Option<FlagValue> {
        self.flags.insert(flag.into(), value.into())
    }

    pub fn flag(&self, flag: &str) -> Option<&FlagValue> {
        self.flags.get(flag)
    }

    /// Check if a flag is present and truthy.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.get(flag).is_some_and(FlagValue::is_truthy)
    }

    /// Add an item to the inventory.
    pub fn add_item(&mut self, item: impl Into<String>) {
        self.inventory.push(item.into());
    }

    /// Remove one instance of an item. Returns false if the player has none.
    pub fn remove_item(&mut self, item: &str) -> bool {
        match self.inventory.iter().position(|held| held == item) {
            Some(index) => {
                self.inventory.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|held| held == item)
    }
}

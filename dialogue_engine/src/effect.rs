//! Side effects a choice applies to the game state when committed.

use game_state::{FlagValue, GameState};
use serde::{Deserialize, Serialize};

/// All effect kinds a dialogue choice can carry.
///
/// Source documents group effects by category (`faction`, `flag`); the loader
/// flattens each category payload into one variant per entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Additive change to a faction standing.
    FactionDelta { faction: String, amount: i32 },

    /// Set a story flag, overwriting any previous value.
    SetFlag { flag: String, value: FlagValue },
}

impl Effect {
    pub fn faction_delta(faction: impl Into<String>, amount: i32) -> Self {
        Effect::FactionDelta {
            faction: faction.into(),
            amount,
        }
    }

    pub fn set_flag(flag: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        Effect::SetFlag {
            flag: flag.into(),
            value: value.into(),
        }
    }

    /// Category key this effect is written under in source documents.
    pub fn category(&self) -> &'static str {
        match self {
            Effect::FactionDelta { .. } => "faction",
            Effect::SetFlag { .. } => "flag",
        }
    }

    /// Apply this effect to the game state.
    pub fn apply(&self, state: &mut GameState) {
        match self {
            Effect::FactionDelta { faction, amount } => {
                state.factions.adjust(faction, *amount);
            }
            Effect::SetFlag { flag, value } => {
                state.set_flag(flag.clone(), value.clone());
            }
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::FactionDelta { faction, amount } => write!(f, "{} {:+}", faction, amount),
            Effect::SetFlag { flag, value } => write!(f, "{} = {}", flag, value),
        }
    }
}

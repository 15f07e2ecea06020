//! The four empires of New Eden and the player's standing with them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

/// The major empire factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Caldari,
    Gallente,
    Amarr,
    Minmatar,
}

impl Faction {
    /// All factions, in the order they are presented to the player.
    pub const ALL: [Faction; 4] = [
        Faction::Caldari,
        Faction::Gallente,
        Faction::Amarr,
        Faction::Minmatar,
    ];

    /// Key used in faction standings and dialogue effects.
    pub fn key(&self) -> &'static str {
        match self {
            Faction::Caldari => "Caldari",
            Faction::Gallente => "Gallente",
            Faction::Amarr => "Amarr",
            Faction::Minmatar => "Minmatar",
        }
    }

    /// Full name of the empire.
    pub fn display_name(&self) -> &'static str {
        match self {
            Faction::Caldari => "Caldari State",
            Faction::Gallente => "Gallente Federation",
            Faction::Amarr => "Amarr Empire",
            Faction::Minmatar => "Minmatar Republic",
        }
    }

    /// Short lore blurb shown on the instructions screen.
    pub fn description(&self) -> &'static str {
        match self {
            Faction::Caldari => {
                "A corporate dictatorship where mega-corporations rule. \
                 Masters of shield technology and missiles."
            }
            Faction::Gallente => {
                "A liberal democracy valuing freedom and individual rights. \
                 Experts in armor tanking and drones."
            }
            Faction::Amarr => {
                "A theocratic empire believing in divine right to rule. \
                 Specialists in energy weapons."
            }
            Faction::Minmatar => {
                "A tribal society recently freed from Amarr slavery. \
                 Known for speed and projectile weapons."
            }
        }
    }

    pub fn philosophy(&self) -> &'static str {
        match self {
            Faction::Caldari => "Efficiency, discipline, and corporate loyalty above all.",
            Faction::Gallente => "Freedom, democracy, and individual rights for all citizens.",
            Faction::Amarr => "Divine mandate to bring order and enlightenment to the universe.",
            Faction::Minmatar => "Freedom, tribal honor, and revenge against oppressors.",
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown faction: {0}")]
pub struct UnknownFaction(pub String);

impl FromStr for Faction {
    type Err = UnknownFaction;

    /// Case-insensitive lookup by key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Faction::ALL
            .into_iter()
            .find(|faction| faction.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFaction(s.to_string()))
    }
}

/// Faction name -> reputation score.
///
/// Names are free-form so dialogue content can introduce minor factions;
/// the four empires are seeded by [`FactionStandings::empires`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FactionStandings {
    scores: BTreeMap<String, i32>,
}

impl FactionStandings {
    /// Create empty standings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standings with every empire at zero.
    pub fn empires() -> Self {
        let mut standings = Self::new();
        for faction in Faction::ALL {
            standings.scores.insert(faction.key().to_string(), 0);
        }
        standings
    }

    /// Add `delta` to a faction's standing, creating it at zero if absent.
    ///
    /// Returns the new standing.
    pub fn adjust(&mut self, faction: &str, delta: i32) -> i32 {
        let score = self.scores.entry(faction.to_string()).or_insert(0);
        *score = score.saturating_add(delta);
        *score
    }

    /// Overwrite a faction's standing.
    pub fn set(&mut self, faction: impl Into<String>, score: i32) {
        self.scores.insert(faction.into(), score);
    }

    /// Current standing, or `None` if the faction was never touched.
    pub fn get(&self, faction: &str) -> Option<i32> {
        self.scores.get(faction).copied()
    }

    /// Current standing, treating unknown factions as neutral.
    pub fn standing(&self, faction: &str) -> i32 {
        self.get(faction).unwrap_or(0)
    }

    /// The empires in roster order, then any other factions alphabetically.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        let empires = Faction::ALL.into_iter().filter_map(move |faction| {
            self.scores
                .get_key_value(faction.key())
                .map(|(name, score)| (name.as_str(), *score))
        });
        let others = self
            .scores
            .iter()
            .filter(|(name, _)| !is_empire(name))
            .map(|(name, score)| (name.as_str(), *score));
        empires.chain(others)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

fn is_empire(name: &str) -> bool {
    Faction::ALL.iter().any(|faction| faction.key() == name)
}

impl std::fmt::Display for FactionStandings {
    /// Renders as `Caldari: +5 | Gallente: +0 | ...`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (name, score)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}: {:+}", name, score)?;
        }
        Ok(())
    }
}

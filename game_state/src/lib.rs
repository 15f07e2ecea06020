//! # Game State
//!
//! The shared record every part of the demo reads and writes: the player's
//! inventory, story flags, and standings with the empire factions.
//! This crate holds data only; the dialogue engine mutates it through effects.

pub mod factions;
pub mod state;

pub use factions::*;
pub use state::*;

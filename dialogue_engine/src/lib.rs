//! # Dialogue Engine
//!
//! Branching conversations for EVE Chronicle. A conversation is a
//! [`DialogueGraph`] of nodes, each with spoken text and an ordered list of
//! player choices. A [`DialogueTree`] walks one graph for one conversation,
//! applying each committed choice's [`Effect`]s to the shared
//! [`game_state::GameState`].
//!
//! ## Core Components
//!
//! - **graph**: validated, immutable conversation model
//! - **loader**: JSON/TOML sources and their structural validation
//! - **effect**: closed set of side effects a choice can carry
//! - **tree**: traversal cursor and the finished/terminal state machine
//!
//! The engine never draws anything. A presentation layer polls
//! [`DialogueTree::current_node`] and [`DialogueTree::choices`], keeps its own
//! highlight cursor, and calls [`DialogueTree::advance`] with the committed index.

pub mod effect;
pub mod error;
pub mod graph;
pub mod handle;
pub mod loader;
pub mod tree;

pub use effect::*;
pub use error::*;
pub use graph::*;
pub use handle::*;
pub use tree::*;

//! Dialogue tree - walks one conversation and applies its effects.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DialogueError, DialogueResult};
use crate::graph::{Choice, DialogueGraph, DialogueNode, Next, NodeId};
use crate::handle::GameStateHandle;

/// Unique identifier for one conversation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The runtime state of one conversation.
///
/// States are the graph's node ids plus an absorbing finished state. The
/// cursor starts at the graph's start node; [`advance`](Self::advance) moves it
/// along the chosen edge, or finishes the conversation on a terminal choice.
/// Once finished, `advance` always fails.
///
/// Reaching a node without choices does not finish the conversation: the
/// node's text stays readable and [`at_dead_end`](Self::at_dead_end) reports it,
/// leaving the caller to close the dialogue.
pub struct DialogueTree<H: GameStateHandle> {
    id: ConversationId,
    graph: Arc<DialogueGraph>,
    state: H,
    current: NodeId,
    finished: bool,
}

impl<H: GameStateHandle> DialogueTree<H> {
    /// Start a conversation at the graph's start node.
    pub fn new(graph: Arc<DialogueGraph>, state: H) -> Self {
        let id = ConversationId::new();
        let current = graph.start().clone();
        info!("Conversation {} started at `{}`", id, current);

        Self {
            id,
            graph,
            state,
            current,
            finished: false,
        }
    }

    /// Load a graph from disk and start a conversation on it.
    pub fn load(path: impl AsRef<Path>, state: H) -> DialogueResult<Self> {
        let graph = DialogueGraph::load(path)?;
        Ok(Self::new(Arc::new(graph), state))
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    /// The node the cursor points at. Still meaningful after finishing:
    /// it is the node whose choice ended the conversation.
    pub fn current_node_id(&self) -> &NodeId {
        &self.current
    }

    /// The node being shown, or `None` once the conversation has finished.
    pub fn current_node(&self) -> Option<&DialogueNode> {
        if self.finished {
            return None;
        }
        self.graph.node(&self.current)
    }

    /// The current node's choices in display order. Empty once finished.
    pub fn choices(&self) -> &[Choice] {
        self.current_node()
            .map(|node| node.choices.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True when the conversation is still open but has nowhere to go.
    pub fn at_dead_end(&self) -> bool {
        self.current_node().is_some_and(DialogueNode::is_dead_end)
    }

    /// Commit the choice at `index`.
    ///
    /// Applies the choice's effects to the game state, then follows its
    /// `next`. An invalid index, or any call after the conversation finished,
    /// fails with [`DialogueError::OutOfRange`] and changes nothing.
    pub fn advance(&mut self, index: usize) -> DialogueResult<()> {
        let graph = Arc::clone(&self.graph);
        let available = self.choices().len();
        let node = if self.finished {
            None
        } else {
            graph.node(&self.current)
        };

        let choice = match node {
            Some(node) if index < node.choices.len() => &node.choices[index],
            _ => {
                warn!(
                    "Conversation {}: choice {} rejected at `{}` (finished: {}, {} available)",
                    self.id, index, self.current, self.finished, available
                );
                return Err(DialogueError::OutOfRange { index, available });
            }
        };

        if !choice.effects.is_empty() {
            self.state.with_state(|state| {
                for effect in &choice.effects {
                    effect.apply(state);
                }
            });
            for effect in &choice.effects {
                debug!(
                    "Conversation {}: applied {} effect {}",
                    self.id,
                    effect.category(),
                    effect
                );
            }
        }

        match &choice.next {
            Next::Terminal => {
                self.finished = true;
                info!("Conversation {} finished at `{}`", self.id, self.current);
            }
            Next::Node(target) => {
                debug!("Conversation {}: `{}` -> `{}`", self.id, self.current, target);
                self.current = target.clone();
            }
        }

        Ok(())
    }

    /// Return to the start node and reopen a finished conversation.
    /// Effects already applied stay applied.
    pub fn restart(&mut self) {
        self.current = self.graph.start().clone();
        self.finished = false;
        debug!("Conversation {} restarted at `{}`", self.id, self.current);
    }

    /// The game state capability this conversation was given.
    pub fn state(&self) -> &H {
        &self.state
    }

    /// End the conversation and hand back the game state capability.
    pub fn into_state(self) -> H {
        self.state
    }
}

impl<H: GameStateHandle> std::fmt::Debug for DialogueTree<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueTree")
            .field("id", &self.id)
            .field("current", &self.current)
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_state::GameState;
    use serde_json::json;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    fn graph(value: serde_json::Value) -> Arc<DialogueGraph> {
        Arc::new(DialogueGraph::from_json_value(value).unwrap())
    }

    fn single_node() -> Arc<DialogueGraph> {
        graph(json!({
            "start": "A",
            "nodes": { "A": { "text": "hi", "choices": [{ "text": "bye", "next": null }] } }
        }))
    }

    /// A -> B -> A, with a Gallente bonus on one of B's choices.
    fn cycle() -> Arc<DialogueGraph> {
        graph(json!({
            "start": "A",
            "nodes": {
                "A": { "text": "Welcome.", "choices": [
                    { "text": "Tell me more.", "next": "B" },
                    { "text": "Goodbye.", "next": null }
                ] },
                "B": { "text": "The Federation is free.", "choices": [
                    { "text": "Liberty!", "next": "A", "effect": { "faction": { "Gallente": 5 } } },
                    { "text": "Back.", "next": "A" }
                ] }
            }
        }))
    }

    #[test]
    fn test_starts_at_start_node() {
        let mut state = GameState::new();
        let tree = DialogueTree::new(cycle(), &mut state);

        assert_eq!(tree.current_node_id(), &NodeId::from("A"));
        assert_eq!(tree.current_node().unwrap().text, "Welcome.");
        assert!(!tree.is_finished());
    }

    #[test]
    fn test_single_node_scenario() {
        let mut state = GameState::new();
        let mut tree = DialogueTree::new(single_node(), &mut state);

        assert_eq!(tree.current_node().unwrap().text, "hi");
        assert_eq!(tree.choices().len(), 1);

        tree.advance(0).unwrap();
        assert!(tree.is_finished());
        assert!(tree.current_node().is_none());
        assert!(tree.choices().is_empty());
        assert_eq!(tree.current_node_id(), &NodeId::from("A"));
    }

    #[test]
    fn test_advance_after_finish_fails() {
        let mut state = GameState::new();
        let mut tree = DialogueTree::new(single_node(), &mut state);
        tree.advance(0).unwrap();

        let result = tree.advance(0);
        assert!(matches!(
            result,
            Err(DialogueError::OutOfRange { index: 0, available: 0 })
        ));
        assert!(tree.is_finished());
    }

    #[test]
    fn test_out_of_range_leaves_state_unchanged() {
        let mut state = GameState::new();
        {
            let mut tree = DialogueTree::new(cycle(), &mut state);
            tree.advance(0).unwrap();

            let result = tree.advance(2);
            assert!(matches!(
                result,
                Err(DialogueError::OutOfRange { index: 2, available: 2 })
            ));
            assert!(tree.advance(usize::MAX).is_err());
            assert_eq!(tree.current_node_id(), &NodeId::from("B"));
            assert!(!tree.is_finished());
        }
        assert_eq!(state.factions.standing("Gallente"), 0);
    }

    #[test]
    fn test_cycle_accumulates_effects() {
        let mut state = GameState::new();
        {
            let mut tree = DialogueTree::new(cycle(), &mut state);

            tree.advance(0).unwrap();
            assert_eq!(tree.current_node_id(), &NodeId::from("B"));
            tree.advance(0).unwrap();
            assert_eq!(tree.current_node_id(), &NodeId::from("A"));
            tree.advance(0).unwrap();
            assert_eq!(tree.current_node_id(), &NodeId::from("B"));
            tree.advance(0).unwrap();
            assert_eq!(tree.current_node_id(), &NodeId::from("A"));
        }
        assert_eq!(state.factions.standing("Gallente"), 10);
    }

    #[test]
    fn test_different_choices_accumulate() {
        let graph = graph(json!({
            "start": "a",
            "nodes": {
                "a": { "text": "First.", "choices": [
                    {
                        "text": "For the State.",
                        "next": "b",
                        "effect": { "faction": { "Caldari": 5 } }
                    }
                ] },
                "b": { "text": "Again?", "choices": [
                    { "text": "Always.", "next": null, "effect": { "faction": { "Caldari": 5 } } }
                ] }
            }
        }));

        let mut tree = DialogueTree::new(graph, GameState::new());
        tree.advance(0).unwrap();
        tree.advance(0).unwrap();

        let state = tree.into_state();
        assert_eq!(state.factions.standing("Caldari"), 10);
    }

    #[test]
    fn test_terminal_choice_still_applies_effects() {
        let graph = graph(json!({
            "start": "a",
            "nodes": { "a": { "text": "Leaving?", "choices": [
                {
                    "text": "Yes.",
                    "next": null,
                    "effect": { "faction": { "Amarr": -3 }, "flag": { "left_early": true } }
                }
            ] } }
        }));

        let mut tree = DialogueTree::new(graph, GameState::new());
        tree.advance(0).unwrap();

        let state = tree.into_state();
        assert_eq!(state.factions.standing("Amarr"), -3);
        assert!(state.has_flag("left_early"));
    }

    #[test]
    fn test_dead_end_node() {
        let graph = graph(json!({
            "start": "a",
            "nodes": {
                "a": { "text": "Job's done?", "choices": [{ "text": "Yes.", "next": "b" }] },
                "b": { "text": "Fly safe, capsuleer." }
            }
        }));

        let mut state = GameState::new();
        let mut tree = DialogueTree::new(graph, &mut state);
        assert!(!tree.at_dead_end());

        tree.advance(0).unwrap();
        assert!(tree.at_dead_end());
        assert!(!tree.is_finished());
        assert_eq!(tree.current_node().unwrap().text, "Fly safe, capsuleer.");
        assert!(tree.choices().is_empty());
        assert!(matches!(
            tree.advance(0),
            Err(DialogueError::OutOfRange { index: 0, available: 0 })
        ));
    }

    #[test]
    fn test_restart() {
        let mut state = GameState::new();
        let mut tree = DialogueTree::new(cycle(), &mut state);
        tree.advance(1).unwrap();
        assert!(tree.is_finished());

        tree.restart();
        assert!(!tree.is_finished());
        assert_eq!(tree.current_node_id(), &NodeId::from("A"));
        assert_eq!(tree.choices().len(), 2);
    }

    #[test]
    fn test_shared_state_visible_between_advances() {
        let shared = Rc::new(RefCell::new(GameState::new()));
        let mut tree = DialogueTree::new(cycle(), Rc::clone(&shared));

        tree.advance(0).unwrap();
        tree.advance(0).unwrap();
        assert_eq!(shared.borrow().factions.standing("Gallente"), 5);
        assert_eq!(tree.state().read_state(|s| s.factions.standing("Gallente")), 5);
    }

    #[test]
    fn test_load_starts_conversation_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            start = "dock"

            [nodes.dock]
            text = "Docking request granted."

            [[nodes.dock.choices]]
            text = "Undock."
            effect = {{ flag = {{ undocked = true }} }}
            "#
        )
        .unwrap();

        let mut tree = DialogueTree::load(file.path(), GameState::new()).unwrap();
        assert_eq!(tree.current_node_id(), &NodeId::from("dock"));
        assert_eq!(tree.current_node().unwrap().text, "Docking request granted.");

        tree.advance(0).unwrap();
        assert!(tree.is_finished());
        assert!(tree.into_state().has_flag("undocked"));
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"start": "gone", "nodes": {{"dock": {{"text": "hi"}}}}}}"#).unwrap();

        let result = DialogueTree::load(file.path(), GameState::new());
        assert!(matches!(result, Err(DialogueError::MalformedGraph(_))));
    }

    #[test]
    fn test_conversations_have_distinct_ids() {
        let a = DialogueTree::new(single_node(), GameState::new());
        let b = DialogueTree::new(single_node(), GameState::new());
        assert_ne!(a.id(), b.id());
    }
}

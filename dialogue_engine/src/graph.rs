//! Conversation graph - the immutable model a dialogue tree walks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::effect::Effect;
use crate::error::{DialogueError, DialogueResult};

/// Identifier of a node within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a choice leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// Continue at another node.
    Node(NodeId),
    /// End the conversation.
    Terminal,
}

impl Next {
    pub fn node(id: impl Into<String>) -> Self {
        Next::Node(NodeId::new(id))
    }
}

/// One selectable player response.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    /// Label shown to the player.
    pub text: String,
    pub next: Next,
    /// Applied in order when the choice is committed.
    pub effects: Vec<Effect>,
}

impl Choice {
    pub fn new(text: impl Into<String>, next: Next) -> Self {
        Self {
            text: text.into(),
            next,
            effects: Vec::new(),
        }
    }

    /// Add an effect to this choice.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn ends_conversation(&self) -> bool {
        self.next == Next::Terminal
    }
}

/// One dialogue state: a spoken line and the responses to it.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueNode {
    pub text: String,
    /// Display and selection order.
    pub choices: Vec<Choice>,
}

impl DialogueNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// Append a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// A node with no choices cannot be advanced past.
    pub fn is_dead_end(&self) -> bool {
        self.choices.is_empty()
    }
}

/// A validated conversation.
///
/// Every graph satisfies two invariants, checked once at construction:
/// `start` names an existing node, and every [`Next::Node`] target exists.
/// Traversal code can therefore resolve node ids without fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueGraph {
    start: NodeId,
    nodes: HashMap<NodeId, DialogueNode>,
}

impl DialogueGraph {
    /// Build a graph from parts, rejecting structural violations.
    pub fn new(
        start: impl Into<NodeId>,
        nodes: HashMap<NodeId, DialogueNode>,
    ) -> DialogueResult<Self> {
        let graph = Self {
            start: start.into(),
            nodes,
        };
        graph.validate()?;
        Ok(graph)
    }

    fn validate(&self) -> DialogueResult<()> {
        if self.start.as_str().is_empty() {
            return Err(DialogueError::malformed("`start` must be a non-empty node id"));
        }
        if self.nodes.is_empty() {
            return Err(DialogueError::malformed("`nodes` must not be empty"));
        }
        if !self.nodes.contains_key(&self.start) {
            return Err(DialogueError::malformed(format!(
                "start node `{}` is not defined",
                self.start
            )));
        }

        // Sorted so the first reported violation is stable.
        let mut ids: Vec<_> = self.nodes.keys().collect();
        ids.sort();
        for id in ids {
            for (index, choice) in self.nodes[id].choices.iter().enumerate() {
                if let Next::Node(target) = &choice.next {
                    if !self.nodes.contains_key(target) {
                        return Err(DialogueError::malformed(format!(
                            "choice {} of node `{}` leads to undefined node `{}`",
                            index, id, target
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Identifier of the entry node.
    pub fn start(&self) -> &NodeId {
        &self.start
    }

    /// Get node by ID.
    pub fn node(&self, id: &NodeId) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get the total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

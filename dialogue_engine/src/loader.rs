//! Loading conversation graphs from JSON and TOML sources.
//!
//! Documents are first read into loosely typed `Raw*` structures that mirror
//! the file format, then converted into a [`DialogueGraph`] with every
//! structural problem reported as [`DialogueError::MalformedGraph`].

use game_state::FlagValue;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

use crate::effect::Effect;
use crate::error::{DialogueError, DialogueResult};
use crate::graph::{Choice, DialogueGraph, DialogueNode, Next, NodeId};

/// A conversation document as it appears on disk.
#[derive(Debug, Clone, Deserialize)]
struct RawGraph {
    start: Option<String>,
    nodes: Option<BTreeMap<String, RawNode>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawNode {
    text: Option<String>,
    #[serde(default)]
    choices: Option<Vec<RawChoice>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawChoice {
    text: Option<String>,
    /// Absent or null ends the conversation.
    #[serde(default)]
    next: Option<String>,
    /// Effect category -> (key -> value).
    #[serde(default)]
    effect: Option<BTreeMap<String, BTreeMap<String, FlagValue>>>,
}

impl DialogueGraph {
    /// Parse a graph from a JSON document.
    pub fn from_json_str(source: &str) -> DialogueResult<Self> {
        let raw: RawGraph = serde_json::from_str(source)
            .map_err(|e| DialogueError::malformed(format!("invalid JSON: {}", e)))?;
        Self::from_raw(raw)
    }

    /// Convert an already-parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> DialogueResult<Self> {
        let raw: RawGraph = serde_json::from_value(value)
            .map_err(|e| DialogueError::malformed(format!("invalid JSON: {}", e)))?;
        Self::from_raw(raw)
    }

    /// Parse a graph from a TOML document. Omit `next` to end the conversation.
    pub fn from_toml_str(source: &str) -> DialogueResult<Self> {
        let raw: RawGraph = toml::from_str(source)
            .map_err(|e| DialogueError::malformed(format!("invalid TOML: {}", e)))?;
        Self::from_raw(raw)
    }

    /// Load a graph from a `.json` or `.toml` file.
    pub fn load(path: impl AsRef<Path>) -> DialogueResult<Self> {
        let path = path.as_ref();
        let parse: fn(&str) -> DialogueResult<Self> = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Self::from_json_str,
            Some("toml") => Self::from_toml_str,
            _ => return Err(DialogueError::UnsupportedFormat(path.to_path_buf())),
        };

        let content = std::fs::read_to_string(path).map_err(|source| DialogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let graph = parse(&content)?;

        debug!(
            "Loaded dialogue graph from {:?} ({} nodes, start `{}`)",
            path,
            graph.node_count(),
            graph.start()
        );
        Ok(graph)
    }

    fn from_raw(raw: RawGraph) -> DialogueResult<Self> {
        let start = raw
            .start
            .ok_or_else(|| DialogueError::malformed("missing `start`"))?;
        let raw_nodes = raw
            .nodes
            .ok_or_else(|| DialogueError::malformed("missing `nodes`"))?;

        let mut nodes = HashMap::with_capacity(raw_nodes.len());
        for (id, raw_node) in raw_nodes {
            let node = convert_node(&id, raw_node)?;
            nodes.insert(NodeId(id), node);
        }

        DialogueGraph::new(NodeId(start), nodes)
    }
}

fn convert_node(id: &str, raw: RawNode) -> DialogueResult<DialogueNode> {
    let text = raw
        .text
        .ok_or_else(|| DialogueError::malformed(format!("node `{}` has no `text`", id)))?;

    let choices = raw
        .choices
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, choice)| convert_choice(id, index, choice))
        .collect::<DialogueResult<Vec<_>>>()?;

    Ok(DialogueNode { text, choices })
}

fn convert_choice(node_id: &str, index: usize, raw: RawChoice) -> DialogueResult<Choice> {
    let text = raw.text.ok_or_else(|| {
        DialogueError::malformed(format!("choice {} of node `{}` has no `text`", index, node_id))
    })?;

    let next = match raw.next {
        Some(target) => Next::Node(NodeId(target)),
        None => Next::Terminal,
    };

    let mut effects = Vec::new();
    for (category, payload) in raw.effect.unwrap_or_default() {
        convert_effects(node_id, index, &category, payload, &mut effects)?;
    }

    Ok(Choice { text, next, effects })
}

fn convert_effects(
    node_id: &str,
    index: usize,
    category: &str,
    payload: BTreeMap<String, FlagValue>,
    effects: &mut Vec<Effect>,
) -> DialogueResult<()> {
    let context = || format!("choice {} of node `{}`", index, node_id);

    match category {
        "faction" => {
            for (faction, value) in payload {
                let amount = match value {
                    FlagValue::Int(amount) => i32::try_from(amount).map_err(|_| {
                        DialogueError::malformed(format!(
                            "{}: faction delta for `{}` does not fit in 32 bits",
                            context(),
                            faction
                        ))
                    })?,
                    other => {
                        return Err(DialogueError::malformed(format!(
                            "{}: faction delta for `{}` must be an integer, got `{}`",
                            context(),
                            faction,
                            other
                        )))
                    }
                };
                effects.push(Effect::FactionDelta { faction, amount });
            }
        }
        "flag" => {
            for (flag, value) in payload {
                effects.push(Effect::SetFlag { flag, value });
            }
        }
        unknown => {
            return Err(DialogueError::malformed(format!(
                "{}: unknown effect category `{}`",
                context(),
                unknown
            )))
        }
    }

    Ok(())
}

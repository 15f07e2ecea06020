//! Errors raised while loading or traversing a conversation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialogueError {
    /// The conversation source violates the graph's structure.
    #[error("malformed dialogue graph: {0}")]
    MalformedGraph(String),

    #[error("failed to read dialogue file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only `.json` and `.toml` sources are understood.
    #[error("unsupported dialogue file format: {0:?}")]
    UnsupportedFormat(PathBuf),

    /// `advance` was called with an index outside the current choices,
    /// or after the conversation finished (`available == 0`).
    #[error("choice index {index} out of range ({available} available)")]
    OutOfRange { index: usize, available: usize },
}

impl DialogueError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        DialogueError::MalformedGraph(reason.into())
    }
}

pub type DialogueResult<T> = Result<T, DialogueError>;

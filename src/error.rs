// Error taxonomy for the streamer
// None of these are fatal - each one degrades to "skip this track" or "ignore this command"

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    /// Query or URL could not be turned into a playable track
    #[error("could not resolve '{target}': {reason}")]
    Resolution { target: String, reason: String },

    /// The external audio process never started
    #[error("failed to start audio process: {0}")]
    Spawn(#[source] std::io::Error),

    /// Pause/resume/volume could not reach the running process
    #[error("process control failed: {0}")]
    Control(#[source] std::io::Error),

    /// Disk read/write for history or favorites failed
    #[error("persistence failure on {path}: {reason}")]
    Persistence { path: String, reason: String },

    /// A 1-based index from a user command that points outside the list
    #[error("invalid index {index} (list has {len} items)")]
    InvalidIndex { index: String, len: usize },

    /// Raw mode / key polling problems
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl StreamError {
    pub fn resolution(target: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        StreamError::Resolution {
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    pub fn persistence(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        StreamError::Persistence {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_index(index: impl Into<String>, len: usize) -> Self {
        StreamError::InvalidIndex {
            index: index.into(),
            len,
        }
    }
}

pub type StreamResult<T> = std::result::Result<T, StreamError>;

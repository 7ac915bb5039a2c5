//! Error types for collection.

use std::path::PathBuf;

/// Why a subsystem (or the whole collector) could not produce a value.
///
/// Only [`CollectError::MissingRoot`] is fatal; the orchestrator turns every
/// other variant into a diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// `/proc` or `/sys` is absent; nothing can be collected.
    #[error("{} is not available; this needs access to /proc and /sys to work", .path.display())]
    MissingRoot { path: PathBuf },

    /// A source file or directory is missing or unreadable.
    #[error("{} is not readable: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A source was read but its content has an unexpected shape.
    #[error("error parsing {}: {message}", .path.display())]
    Unparsable { path: PathBuf, message: String },
}

impl CollectError {
    pub fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CollectError::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn unparsable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        CollectError::Unparsable {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

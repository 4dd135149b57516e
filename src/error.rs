use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result of an editing operation
pub type EditResult<T = ()> = Result<T, EditError>;

/// Errors that can occur during editing.
///
/// All of these indicate that the host and the document disagree about the
/// current block layout; none of them leave the document modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("block index {index} out of range (document has {len} blocks)")]
    InvalidBlockIndex { index: usize, len: usize },
    #[error("block {0} is not a line")]
    NotALine(usize),
    #[error("block {0} is not a code or math block")]
    NotAFenceBlock(usize),
    #[error("block {0} is not a code block")]
    NotACodeBlock(usize),
    #[error("line {0} does not open a fence")]
    NotAFenceOpener(usize),
    #[error("line content must not contain a newline")]
    MultilineContent,
}

/// Errors reported by the note store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to save '{name}': {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to list notes in '{}': {}", .path.display(), .source)]
    List {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A key description such as `Ctrl+Shift+K` that could not be understood
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseKeyError {
    #[error("empty key description")]
    Empty,
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
}

//! Typed failure kinds that callers may want to tell apart.
//!
//! Everything else travels as `anyhow::Error` with context attached. Malformed history
//! records are not errors at all: the parsers recover them locally and count them in
//! [`crate::parsers::ParseReport`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnforgetError {
    /// The history file is missing or unreadable. The picker never starts.
    #[error("cannot read history file {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No history file was configured and none of the default locations exist.
    #[error("no history file found (tried {})", format_tried(.tried))]
    NoHistoryFile { tried: Vec<PathBuf> },

    /// Raw mode could not be entered. Reported before anything is drawn.
    #[error("cannot set up the terminal: {0}")]
    TerminalAcquisitionFailure(#[source] io::Error),

    /// The selected command could not be handed to the shell.
    #[error("failed to run `{command}`: {source}")]
    ExecutionFailure {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("clipboard error: {0}")]
    ClipboardFailure(String),
}

fn format_tried(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

use chrono::{DateTime, Utc};

/// A single command recovered from a shell history file.
///
/// `command` may contain embedded newlines when the source format supports
/// line continuation (zsh extended history, bash with `lithist`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub command: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), timestamp: None }
    }

    pub fn with_timestamp(command: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self { command: command.into(), timestamp: Some(timestamp) }
    }

    /// True when the command spans more than one line.
    pub fn is_multiline(&self) -> bool {
        self.command.contains('\n')
    }
}

//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for a throwaway home directory holding history files
pub struct HomeDirBuilder {
    temp_dir: TempDir,
}

impl HomeDirBuilder {
    /// Create a new builder with an empty home directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the home directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `name` (relative to home) with the given raw content
    pub fn with_file(self, name: &str, content: impl AsRef<[u8]>) -> Self {
        fs::write(self.temp_dir.path().join(name), content).expect("Failed to write history file");
        self
    }

    pub fn with_bash_history(self, history: &HistoryBuilder) -> Self {
        self.with_file(".bash_history", history.to_bash())
    }

    pub fn with_zsh_history(self, history: &HistoryBuilder) -> Self {
        self.with_file(".zsh_history", history.to_zsh())
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for HomeDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for history file content, oldest command first
pub struct HistoryBuilder {
    records: Vec<(i64, String)>,
    next_epoch: i64,
}

impl HistoryBuilder {
    pub fn new() -> Self {
        Self { records: Vec::new(), next_epoch: 1_700_000_000 }
    }

    /// Append a command one minute after the previous one
    pub fn command(mut self, command: &str) -> Self {
        self.next_epoch += 60;
        self.records.push((self.next_epoch, command.to_string()));
        self
    }

    /// Append a command at an explicit time
    pub fn command_at(mut self, epoch: i64, command: &str) -> Self {
        self.records.push((epoch, command.to_string()));
        self
    }

    pub fn to_plain(&self) -> String {
        self.records.iter().map(|(_, cmd)| format!("{cmd}\n")).collect()
    }

    /// `#<epoch>` marker lines, as written with `HISTTIMEFORMAT` set
    pub fn to_bash(&self) -> String {
        self.records.iter().map(|(epoch, cmd)| format!("#{epoch}\n{cmd}\n")).collect()
    }

    /// `EXTENDED_HISTORY` records, with embedded newlines escaped by a trailing `\`
    pub fn to_zsh(&self) -> String {
        self.records
            .iter()
            .map(|(epoch, cmd)| format!(": {epoch}:0;{}\n", cmd.replace('\n', "\\\n")))
            .collect()
    }
}

impl Default for HistoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `content` to a fresh file and keep its directory alive
pub fn history_file(content: impl AsRef<[u8]>) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("history");
    fs::write(&path, content).expect("Failed to write history file");
    (dir, path)
}

//! What happens to the picked command once the terminal has been restored.
//!
//! - [`Disposition::Execute`] hands the text to `$SHELL -c`. On unix the shell
//!   replaces this process, so its exit status becomes ours
//! - [`Disposition::Print`] writes the text to stdout for shell widgets
//! - [`Disposition::Copy`] puts the text on the system clipboard
//!
//! A cancelled picker does none of these.

pub mod clipboard;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
pub use clipboard::{ClipboardProvider, SystemClipboard, copy_with_provider};
use tracing::{debug, info};

use crate::error::UnforgetError;
use crate::tui::Outcome;

/// Used when `$SHELL` is unset or empty.
pub const FALLBACK_SHELL: &str = "/bin/sh";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    #[default]
    Execute,
    Print,
    Copy,
}

impl Disposition {
    /// `--print` wins over `--copy`; clap rejects both together anyway.
    pub fn from_flags(print: bool, copy: bool) -> Self {
        match (print, copy) {
            (true, _) => Disposition::Print,
            (false, true) => Disposition::Copy,
            (false, false) => Disposition::Execute,
        }
    }
}

/// Runs a command line through a shell.
pub trait CommandRunner {
    /// Only returns on failure when the runner replaces the process.
    fn run(&mut self, shell: &Path, command: &str) -> io::Result<()>;
}

/// `shell -c command` as a real process.
#[derive(Debug, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    #[cfg(unix)]
    fn run(&mut self, shell: &Path, command: &str) -> io::Result<()> {
        use std::os::unix::process::CommandExt;

        // exec only returns on error
        Err(Command::new(shell).arg("-c").arg(command).exec())
    }

    #[cfg(not(unix))]
    fn run(&mut self, shell: &Path, command: &str) -> io::Result<()> {
        let status = Command::new(shell).arg("-c").arg(command).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("exited with {status}")))
        }
    }
}

pub struct Executor<R: CommandRunner, C: ClipboardProvider> {
    shell: PathBuf,
    runner: R,
    clipboard: C,
}

impl Executor<ShellRunner, SystemClipboard> {
    pub fn system(shell: PathBuf) -> Self {
        Self::new(shell, ShellRunner, SystemClipboard)
    }
}

impl<R: CommandRunner, C: ClipboardProvider> Executor<R, C> {
    pub fn new(shell: PathBuf, runner: R, clipboard: C) -> Self {
        Self { shell, runner, clipboard }
    }

    /// Carry out `disposition` for a finished picker session.
    ///
    /// # Errors
    ///
    /// - [`UnforgetError::ExecutionFailure`] if the shell cannot be started
    /// - [`UnforgetError::ClipboardFailure`] if copying fails
    /// - an I/O error if stdout is closed while printing
    pub fn finish(
        &mut self,
        outcome: &Outcome,
        disposition: Disposition,
        out: &mut dyn Write,
    ) -> Result<()> {
        let Outcome::Selected(command) = outcome else {
            debug!("picker cancelled, nothing to do");
            return Ok(());
        };

        match disposition {
            Disposition::Execute => {
                info!(shell = %self.shell.display(), "executing selection");
                self.runner.run(&self.shell, command).map_err(|source| {
                    UnforgetError::ExecutionFailure { command: command.clone(), source }
                })?;
            }
            Disposition::Print => {
                writeln!(out, "{command}").context("failed to print selection")?;
                out.flush().context("failed to print selection")?;
            }
            Disposition::Copy => {
                copy_with_provider(command, &mut self.clipboard)
                    .map_err(|err| UnforgetError::ClipboardFailure(format!("{err:#}")))?;
                info!(bytes = command.len(), "copied selection to clipboard");
            }
        }

        Ok(())
    }
}

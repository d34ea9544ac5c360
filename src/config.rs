//! Runtime configuration resolved from the command line and the environment.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::UnforgetError;
use crate::executor::{Disposition, FALLBACK_SHELL};
use crate::parsers::HistoryFormat;
use crate::tui::KeyMap;
use crate::utils::environment::{Environment, LOG_FILE, SHELL};
use crate::utils::locate_history_file;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub history_path: PathBuf,
    pub format: HistoryFormat,
    /// QUERY words joined by single spaces
    pub query: String,
    pub height: u16,
    pub keymap: KeyMap,
    pub disposition: Disposition,
    /// Print ranked matches and exit instead of opening the picker
    pub filter: bool,
    pub shell: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Flags win over environment variables, which win over defaults.
    ///
    /// # Errors
    ///
    /// Returns [`UnforgetError::NoHistoryFile`] if no history file is configured and
    /// none exists in the default locations.
    pub fn resolve(cli: Cli, env: &dyn Environment) -> Result<Self, UnforgetError> {
        let history_path = locate_history_file(cli.history.as_deref(), env)?;

        let shell =
            env.var(SHELL).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(FALLBACK_SHELL));
        let log_file = cli.log_file.or_else(|| env.var(LOG_FILE).map(PathBuf::from));

        Ok(Self {
            history_path,
            format: cli.format,
            query: cli.query.join(" "),
            height: cli.height,
            keymap: if cli.vi { KeyMap::Vi } else { KeyMap::Standard },
            disposition: Disposition::from_flags(cli.print, cli.copy),
            filter: cli.filter,
            shell,
            log_file,
        })
    }
}

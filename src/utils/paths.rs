use std::path::{Path, PathBuf};

use super::environment::{Environment, HISTFILE};
use crate::error::UnforgetError;

/// Probed in order when neither `--history` nor `HISTFILE` is set
pub const DEFAULT_HISTORY_FILES: [&str; 2] = [".bash_history", ".zsh_history"];

/// Pick the history file to read.
///
/// Resolution order:
/// 1. `explicit` (from `--history`)
/// 2. `$HISTFILE`
/// 3. the first of [`DEFAULT_HISTORY_FILES`] that exists in the home directory
///
/// An explicit path or `HISTFILE` is returned even if it does not exist, so the
/// caller reports it as unreadable instead of silently reading another file.
///
/// # Errors
///
/// Returns [`UnforgetError::NoHistoryFile`] when every default location is missing.
pub fn locate_history_file(
    explicit: Option<&Path>,
    env: &dyn Environment,
) -> Result<PathBuf, UnforgetError> {
    if let Some(path) = explicit {
        return Ok(expand_tilde(path, env));
    }
    if let Some(histfile) = env.var(HISTFILE) {
        return Ok(expand_tilde(Path::new(&histfile), env));
    }

    let Some(home) = env.home_dir() else {
        return Err(UnforgetError::NoHistoryFile { tried: Vec::new() });
    };

    let tried: Vec<PathBuf> = DEFAULT_HISTORY_FILES.iter().map(|name| home.join(name)).collect();
    match tried.iter().find(|path| path.is_file()) {
        Some(path) => Ok(path.clone()),
        None => Err(UnforgetError::NoHistoryFile { tried }),
    }
}

/// Expand a leading `~/` the way the shell would have.
pub fn expand_tilde(path: &Path, env: &dyn Environment) -> PathBuf {
    match (path.strip_prefix("~"), env.home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

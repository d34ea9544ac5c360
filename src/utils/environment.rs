use std::env;
use std::path::PathBuf;

/// History file the shell writes to
pub const HISTFILE: &str = "HISTFILE";
/// Shell used to run the selected command
pub const SHELL: &str = "SHELL";
pub const HOME: &str = "HOME";
/// Log file, when `--log-file` is not given
pub const LOG_FILE: &str = "UNFORGET_LOG_FILE";

/// Read access to the process environment (allows injecting variables in tests)
pub trait Environment {
    /// Value of `name`, treating an empty value as unset.
    fn var(&self, name: &str) -> Option<String>;

    fn home_dir(&self) -> Option<PathBuf> {
        self.var(HOME).map(PathBuf::from)
    }
}

/// The real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        env::var_os(name).filter(|v| !v.is_empty()).map(|v| v.to_string_lossy().into_owned())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// Fixed set of variables
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct FakeEnvironment {
    vars: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl FakeEnvironment {
    pub(crate) fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.insert(name.to_string(), value.into());
        self
    }
}

#[cfg(test)]
impl Environment for FakeEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

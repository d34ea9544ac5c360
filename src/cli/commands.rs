use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::config::Config;
use crate::executor::{Disposition, Executor};
use crate::indexer::{CandidateList, load_candidates};
use crate::matching::MatchEngine;
use crate::parsers::HistoryFormat;
use crate::tui;
use crate::utils::{Environment, SystemEnvironment, init_logging, sanitize_for_display};

#[derive(Parser, Debug)]
#[command(name = "unforget")]
#[command(version)]
#[command(about = "Search your shell history and run the command you forgot", long_about = None)]
pub struct Cli {
    /// Initial search query
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,

    /// History file to read [default: $HISTFILE, ~/.bash_history, ~/.zsh_history]
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,

    /// History file format
    #[arg(long, value_enum, default_value_t = HistoryFormat::Auto)]
    pub format: HistoryFormat,

    /// Picker height in rows
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u16).range(2..))]
    pub height: u16,

    /// Bare j/k move the selection instead of typing
    #[arg(long)]
    pub vi: bool,

    /// Print the selected command instead of running it
    #[arg(long, conflicts_with = "copy")]
    pub print: bool,

    /// Copy the selected command to the clipboard instead of running it
    #[arg(long)]
    pub copy: bool,

    /// Print ranked matches for QUERY, one per line, without opening the picker
    #[arg(long, conflicts_with_all = ["print", "copy", "vi"])]
    pub filter: bool,

    /// Write logs to this file [env: UNFORGET_LOG_FILE]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    run_with(Cli::parse(), &SystemEnvironment)
}

pub fn run_with(cli: Cli, env: &dyn Environment) -> Result<()> {
    let config = Config::resolve(cli, env)?;
    let log_guard = init_logging(config.log_file.as_deref())?;

    let loaded = load_candidates(&config.history_path, config.format)?;

    if config.filter {
        let mut stdout = io::stdout().lock();
        return print_matches(&loaded.candidates, &config.query, &mut stdout);
    }

    let outcome = tui::pick(&loaded.candidates, &config.query, config.height, config.keymap)?;

    if config.disposition == Disposition::Execute {
        info!("handing over to {}", config.shell.display());
        // exec replaces the process; flush logs first
        drop(log_guard);
    }

    let mut stdout = io::stdout().lock();
    Executor::system(config.shell).finish(&outcome, config.disposition, &mut stdout)
}

/// Non-interactive search: one ranked match per line, best first.
pub fn print_matches(candidates: &CandidateList, query: &str, out: &mut dyn Write) -> Result<()> {
    let matches = MatchEngine::new().match_query(query, candidates);
    for m in matches.iter() {
        writeln!(out, "{}", sanitize_for_display(&candidates[m.index].command))
            .context("failed to write matches")?;
    }
    out.flush().context("failed to write matches")?;
    Ok(())
}

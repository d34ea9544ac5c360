//! unforget - Search your shell history and run the command you forgot
//!
//! This library reads a bash or zsh history file, reduces it to distinct commands in
//! most-recent-first order, and lets the user narrow them down with a fuzzy query in
//! a small inline picker. It supports:
//!
//! - Parsing plain, timestamped bash and extended zsh history, repairing damaged
//!   records instead of failing
//! - Ranking candidates by subsequence match quality, length and recency
//! - A raw-mode terminal session that is always restored, including on panic and
//!   termination signals
//! - Running, printing or copying the picked command
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use unforget::{HistoryFormat, MatchEngine, load_candidates};
//!
//! let loaded = load_candidates(Path::new("/home/alice/.zsh_history"), HistoryFormat::Auto)?;
//! let matches = MatchEngine::new().match_query("gst", &loaded.candidates);
//! for m in matches.iter() {
//!     println!("{}", loaded.candidates[m.index].command);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod indexer;
pub mod matching;
pub mod models;
pub mod parsers;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use error::UnforgetError;
pub use indexer::{CandidateList, load_candidates};
pub use matching::{MatchEngine, MatchResult};
pub use models::HistoryEntry;
pub use parsers::{HistoryFormat, parse_history};

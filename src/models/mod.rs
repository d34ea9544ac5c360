//! Data models shared across the crate.
//!
//! - [`HistoryEntry`] - one command recovered from a history file, with an optional
//!   timestamp when the shell recorded one

pub mod history;

pub use history::HistoryEntry;

//! The candidate store: deduplicated, most-recent-first history
//!
//! - [`CandidateList`] holds the commands and is immutable after construction
//! - [`load_candidates`] reads a history file and builds the list, mapping I/O failures
//!   to [`crate::error::UnforgetError::SourceUnavailable`]

pub mod builder;
pub mod candidates;

pub use builder::{LoadedHistory, build_candidates, load_candidates};
pub use candidates::CandidateList;

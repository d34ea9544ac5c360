//! Query matching and ranking over the candidate store.
//!
//! A candidate matches when every query character appears in it, in order and ignoring
//! case. Scoring comes from `nucleo`'s optimal alignment (contiguous runs, word
//! boundaries and gaps), with shorter commands and then more recent ones winning ties.

pub mod engine;

pub use engine::{Match, MatchEngine, MatchResult};

pub mod commands;

pub use commands::{Cli, print_matches, run, run_with};

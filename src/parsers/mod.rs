//! Parsers for shell history files
//!
//! # Formats
//!
//! - [`HistoryFormat::Plain`]: one command per line (bash without `HISTTIMEFORMAT`, zsh
//!   without `EXTENDED_HISTORY`)
//! - [`HistoryFormat::BashTimestamped`]: `#<epoch>` marker lines, each followed by the
//!   line(s) of one command
//! - [`HistoryFormat::ZshExtended`]: `: <epoch>:<elapsed>;<command>` records where a
//!   trailing `\` continues the command on the next line
//!
//! [`HistoryFormat::Auto`] scans the whole file. Shells switch encodings in place when
//! `HISTTIMEFORMAT` or `EXTENDED_HISTORY` is turned on, so a timestamped file often
//! starts with plain lines; those are kept as orphans by the timestamped parsers.
//!
//! # Error Handling Strategy
//!
//! Parsing never fails. History files are append-only logs written by shells that get
//! killed mid-write, so damage is expected:
//!
//! - **Unterminated continuation** at end of input: the text accumulated so far becomes a
//!   command
//! - **Orphan lines** (a command line with no marker in a timestamped file): kept as a
//!   command without a timestamp
//! - **Empty records** (a marker with no command): dropped
//! - **Invalid UTF-8**: decoded lossily, never rejected
//!
//! Every recovery is counted in [`ParseReport`] so the caller can log it.

pub mod bash;
pub mod epoch;
pub mod plain;
pub mod zsh;

use clap::ValueEnum;

use crate::models::HistoryEntry;

/// The closed set of on-disk encodings understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HistoryFormat {
    /// Detect from the file contents
    #[default]
    Auto,
    /// One command per line
    Plain,
    /// bash with `HISTTIMEFORMAT` (`#<epoch>` marker lines)
    #[value(name = "bash")]
    BashTimestamped,
    /// zsh `EXTENDED_HISTORY` (`: <epoch>:<elapsed>;<command>`)
    #[value(name = "zsh")]
    ZshExtended,
}

impl HistoryFormat {
    /// Resolve `Auto` against the actual bytes. Concrete formats are returned unchanged.
    pub fn resolve(self, bytes: &[u8]) -> HistoryFormat {
        match self {
            HistoryFormat::Auto => detect_format(bytes),
            other => other,
        }
    }
}

/// Counters for records the parser had to repair or drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Format actually used (never `Auto`)
    pub format: HistoryFormat,
    /// Lines outside any marker record in a timestamped file
    pub orphan_lines: usize,
    /// Markers not followed by a command
    pub empty_records: usize,
    /// Continuations still open at end of input
    pub unterminated: usize,
}

impl ParseReport {
    fn new(format: HistoryFormat) -> Self {
        Self { format, ..Self::default() }
    }

    pub fn anomalies(&self) -> usize {
        self.orphan_lines + self.empty_records + self.unterminated
    }
}

/// Parse raw history bytes into entries in file order (most recent last).
pub fn parse_history(bytes: &[u8], format: HistoryFormat) -> Vec<HistoryEntry> {
    parse_history_with_report(bytes, format).0
}

/// Like [`parse_history`], also returning what had to be repaired along the way.
pub fn parse_history_with_report(
    bytes: &[u8],
    format: HistoryFormat,
) -> (Vec<HistoryEntry>, ParseReport) {
    let format = format.resolve(bytes);
    let mut report = ParseReport::new(format);

    let entries = match format {
        HistoryFormat::Plain | HistoryFormat::Auto => plain::parse(bytes),
        HistoryFormat::BashTimestamped => bash::parse(bytes, &mut report),
        HistoryFormat::ZshExtended => zsh::parse(bytes, &mut report),
    };

    (entries, report)
}

/// Guess the format from every line: whichever marker kind occurs more often wins,
/// zsh on a tie. A file with no markers at all is plain.
pub fn detect_format(bytes: &[u8]) -> HistoryFormat {
    let (mut zsh_records, mut bash_markers) = (0usize, 0usize);
    for line in split_lines(bytes) {
        if zsh::parse_record(line).is_some() {
            zsh_records += 1;
        } else if bash::parse_marker(line).is_some() {
            bash_markers += 1;
        }
    }

    match (zsh_records, bash_markers) {
        (0, 0) => HistoryFormat::Plain,
        (zsh, bash) if zsh >= bash => HistoryFormat::ZshExtended,
        _ => HistoryFormat::BashTimestamped,
    }
}

/// Split on `\n`, dropping a trailing `\r` from each line.
pub(crate) fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes.split(|&b| b == b'\n').map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

pub(crate) fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

pub(crate) fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

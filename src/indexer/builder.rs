//! Candidate list builder for shell history files.
//!
//! # Error Handling Strategy
//!
//! - **File-level errors**: an unreadable history file is fatal and surfaces as
//!   [`UnforgetError::SourceUnavailable`], before any terminal setup happens
//! - **Record-level damage**: repaired by the parsers and only logged here, see
//!   [`crate::parsers`]

use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use super::candidates::CandidateList;
use crate::error::UnforgetError;
use crate::parsers::{HistoryFormat, ParseReport, parse_history_with_report};

/// Candidates plus what the parser found along the way.
#[derive(Debug)]
pub struct LoadedHistory {
    pub candidates: CandidateList,
    pub report: ParseReport,
    /// Entries read before deduplication
    pub raw_count: usize,
}

/// Read, parse and deduplicate a history file.
///
/// # Errors
///
/// Returns [`UnforgetError::SourceUnavailable`] if the file cannot be read. Malformed
/// records never fail the load.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use unforget::indexer::load_candidates;
/// use unforget::parsers::HistoryFormat;
///
/// let loaded = load_candidates(Path::new("/home/alice/.zsh_history"), HistoryFormat::Auto)?;
/// println!("{} distinct commands", loaded.candidates.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_candidates(path: &Path, format: HistoryFormat) -> Result<LoadedHistory> {
    let bytes = fs::read(path).map_err(|source| UnforgetError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let loaded = build_candidates(&bytes, format);
    info!(
        path = %path.display(),
        format = ?loaded.report.format,
        entries = loaded.raw_count,
        distinct = loaded.candidates.len(),
        "loaded history"
    );

    Ok(loaded)
}

/// Parse and deduplicate bytes that are already in memory.
pub fn build_candidates(bytes: &[u8], format: HistoryFormat) -> LoadedHistory {
    let (entries, report) = parse_history_with_report(bytes, format);
    if report.anomalies() > 0 {
        debug!(
            orphan_lines = report.orphan_lines,
            empty_records = report.empty_records,
            unterminated = report.unterminated,
            "repaired malformed history records"
        );
    }

    let raw_count = entries.len();
    let candidates = CandidateList::build(entries);

    LoadedHistory { candidates, report, raw_count }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn create_test_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_load_plain_history() {
        let file = create_test_file(b"git status\ngit status\nls -la\n");
        let loaded = load_candidates(file.path(), HistoryFormat::Auto).unwrap();

        assert_eq!(loaded.raw_count, 3);
        assert_eq!(loaded.candidates.len(), 2);
        assert_eq!(loaded.candidates[0].command, "ls -la");
        assert_eq!(loaded.report.format, HistoryFormat::Plain);
    }

    #[test]
    fn test_load_zsh_history() {
        let file = create_test_file(b": 1700000000:0;make\n: 1700000100:0;make test\n");
        let loaded = load_candidates(file.path(), HistoryFormat::Auto).unwrap();

        assert_eq!(loaded.report.format, HistoryFormat::ZshExtended);
        assert_eq!(loaded.candidates[0].command, "make test");
    }

    #[test]
    fn test_load_missing_file_is_source_unavailable() {
        let result = load_candidates(Path::new("/nonexistent/.zsh_history"), HistoryFormat::Auto);

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UnforgetError>(),
            Some(UnforgetError::SourceUnavailable { .. })
        ));
        assert!(err.to_string().contains("/nonexistent/.zsh_history"));
    }

    #[test]
    fn test_build_candidates_counts_anomalies() {
        let loaded = build_candidates(b": 1700000000:0;echo a\\", HistoryFormat::ZshExtended);
        assert_eq!(loaded.report.unterminated, 1);
        assert_eq!(loaded.candidates.len(), 1);
    }

    #[test]
    fn test_empty_file_loads() {
        let file = create_test_file(b"");
        let loaded = load_candidates(file.path(), HistoryFormat::Auto).unwrap();
        assert!(loaded.candidates.is_empty());
    }
}

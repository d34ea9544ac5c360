use std::collections::HashSet;

use crate::models::HistoryEntry;

/// Deduplicated history, most recent first.
///
/// Built once from parser output and never mutated afterwards. Indices handed out by
/// the match engine stay valid for the lifetime of the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    entries: Vec<HistoryEntry>,
}

impl CandidateList {
    /// Build from entries in file order (most recent last).
    ///
    /// When every entry has a timestamp they are first stably sorted by time, so files
    /// merged out of order by `share_history` still rank correctly. Otherwise file order
    /// is the recency order. A repeated command keeps only its most recent occurrence.
    pub fn build(mut entries: Vec<HistoryEntry>) -> Self {
        if !entries.is_empty() && entries.iter().all(|e| e.timestamp.is_some()) {
            entries.sort_by_key(|e| e.timestamp);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        let mut deduped = Vec::with_capacity(entries.len());
        for entry in entries.into_iter().rev() {
            if seen.insert(entry.command.clone()) {
                deduped.push(entry);
            }
        }

        Self { entries: deduped }
    }

    /// Convenience for callers that only have command strings (file order).
    pub fn from_commands<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(commands.into_iter().map(HistoryEntry::new).collect())
    }

    /// Whether an age column is worth drawing.
    pub fn any_timestamped(&self) -> bool {
        self.entries.iter().any(|e| e.timestamp.is_some())
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::ops::Index<usize> for CandidateList {
    type Output = HistoryEntry;

    fn index(&self, index: usize) -> &HistoryEntry {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

use nucleo::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo::{Config, Matcher, Utf32Str};

use crate::indexer::CandidateList;

/// One ranked hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Position in the [`CandidateList`]
    pub index: usize,
    /// Higher is better. Alignment quality in the high 16 bits, brevity in the low 16.
    pub score: u32,
    /// Matched character (not byte) offsets, ascending
    pub positions: Vec<u32>,
}

/// Ranked matches for one query, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    matches: Vec<Match>,
}

impl MatchResult {
    /// Every candidate, in store order, with equal scores.
    pub fn all(count: usize) -> Self {
        let matches =
            (0..count).map(|index| Match { index, score: 0, positions: Vec::new() }).collect();
        Self { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn get(&self, rank: usize) -> Option<&Match> {
        self.matches.get(rank)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    /// Candidate indices in rank order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches.iter().map(|m| m.index)
    }
}

/// Fold alignment quality and command length into one sortable score.
fn pack_score(quality: u16, char_len: usize) -> u32 {
    let brevity = u16::MAX - char_len.min(usize::from(u16::MAX)) as u16;
    (u32::from(quality) << 16) | u32::from(brevity)
}

/// One matcher unit per `char`, so positions index `str::chars`. `Utf32Str::new`
/// folds graphemes instead, and yields byte offsets for decomposed text whose
/// graphemes all start with ASCII.
fn char_haystack<'a>(text: &'a str, buf: &'a mut Vec<char>) -> Utf32Str<'a> {
    if text.is_ascii() {
        return Utf32Str::Ascii(text.as_bytes());
    }
    buf.clear();
    buf.extend(text.chars());
    Utf32Str::Unicode(buf)
}

/// Stateless ranking over a [`CandidateList`].
///
/// The engine only keeps scratch buffers between calls; every call recomputes its
/// result from the query and the candidates alone.
pub struct MatchEngine {
    matcher: Matcher,
    haystack_buf: Vec<char>,
    indices_buf: Vec<u32>,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            haystack_buf: Vec::new(),
            indices_buf: Vec::new(),
        }
    }

    /// Rank `candidates` against `query`.
    ///
    /// Results are sorted by score descending, then by candidate index ascending (more
    /// recent first). An empty query returns every candidate in store order.
    pub fn match_query(&mut self, query: &str, candidates: &CandidateList) -> MatchResult {
        if query.is_empty() {
            return MatchResult::all(candidates.len());
        }

        // Whitespace stays literal: "git s" must not match "gits".
        let atom =
            Atom::new(query, CaseMatching::Ignore, Normalization::Never, AtomKind::Fuzzy, false);

        let mut matches = Vec::new();
        for (index, entry) in candidates.iter().enumerate() {
            let haystack = char_haystack(&entry.command, &mut self.haystack_buf);
            let char_len = haystack.len();

            self.indices_buf.clear();
            let Some(quality) = atom.indices(haystack, &mut self.matcher, &mut self.indices_buf)
            else {
                continue;
            };

            self.indices_buf.sort_unstable();
            self.indices_buf.dedup();
            matches.push(Match {
                index,
                score: pack_score(quality, char_len),
                positions: self.indices_buf.clone(),
            });
        }

        matches.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));

        MatchResult { matches }
    }
}

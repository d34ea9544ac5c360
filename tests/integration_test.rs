/// End-to-end tests: history file on disk -> candidates -> ranked matches
mod common;

use std::collections::HashSet;

use common::{HistoryBuilder, history_file};
use unforget::indexer::{CandidateList, build_candidates, load_candidates};
use unforget::matching::MatchEngine;
use unforget::parsers::HistoryFormat;

fn commands(candidates: &CandidateList) -> Vec<&str> {
    candidates.iter().map(|e| e.command.as_str()).collect()
}

fn ranked<'a>(query: &str, candidates: &'a CandidateList) -> Vec<&'a str> {
    let result = MatchEngine::new().match_query(query, candidates);
    result.indices().map(|i| candidates[i].command.as_str()).collect()
}

#[test]
fn test_duplicates_collapse_to_most_recent() {
    let history =
        HistoryBuilder::new().command("git status").command("git status").command("ls -la");

    for content in [history.to_plain(), history.to_bash(), history.to_zsh()] {
        let (_dir, path) = history_file(&content);
        let loaded = load_candidates(&path, HistoryFormat::Auto).unwrap();

        assert_eq!(commands(&loaded.candidates), vec!["ls -la", "git status"], "{content:?}");
        assert_eq!(ranked("", &loaded.candidates), vec!["ls -la", "git status"]);
    }
}

#[test]
fn test_gst_finds_both_git_commands() {
    let history =
        HistoryBuilder::new().command("git status").command("ls -la").command("git stash");
    let (_dir, path) = history_file(history.to_zsh());
    let loaded = load_candidates(&path, HistoryFormat::Auto).unwrap();

    let result = ranked("gst", &loaded.candidates);
    assert_eq!(result, vec!["git stash", "git status"]);
}

#[test]
fn test_format_detection_per_shell() {
    let history = HistoryBuilder::new().command("make").command("make test");

    let cases = [
        (history.to_plain(), HistoryFormat::Plain),
        (history.to_bash(), HistoryFormat::BashTimestamped),
        (history.to_zsh(), HistoryFormat::ZshExtended),
    ];
    for (content, expected) in cases {
        let loaded = build_candidates(content.as_bytes(), HistoryFormat::Auto);
        assert_eq!(loaded.report.format, expected);
        assert_eq!(commands(&loaded.candidates), vec!["make test", "make"]);
    }
}

#[test]
fn test_forced_format_overrides_detection() {
    // A plain file whose first command happens to look like a bash marker
    let content = "#1700000000\n";
    let loaded = build_candidates(content.as_bytes(), HistoryFormat::Plain);

    assert_eq!(loaded.report.format, HistoryFormat::Plain);
    assert_eq!(commands(&loaded.candidates), vec!["#1700000000"]);
}

#[test]
fn test_multiline_commands_survive_both_formats() {
    let script = "for f in *.log; do\n  gzip \"$f\"\ndone";
    let history = HistoryBuilder::new().command("ls").command(script);

    for content in [history.to_bash(), history.to_zsh()] {
        let loaded = build_candidates(content.as_bytes(), HistoryFormat::Auto);
        assert_eq!(loaded.candidates[0].command, script);
        assert!(loaded.candidates[0].is_multiline());
        assert_eq!(ranked("gzip", &loaded.candidates), vec![script]);
    }
}

#[test]
fn test_timestamps_reorder_merged_history() {
    // share_history can append records slightly out of order
    let history = HistoryBuilder::new()
        .command_at(1_700_000_300, "newest")
        .command_at(1_700_000_100, "oldest")
        .command_at(1_700_000_200, "middle");
    let loaded = build_candidates(history.to_zsh().as_bytes(), HistoryFormat::Auto);

    assert_eq!(commands(&loaded.candidates), vec!["newest", "middle", "oldest"]);
}

#[test]
fn test_results_are_subsequence_matches_only() {
    let mut history = HistoryBuilder::new();
    let programs = ["git", "cargo", "docker", "kubectl", "ssh", "make"];
    let args = ["status", "build --release", "ps", "get pods", "prod-1", "install"];
    for i in 0..300 {
        history = history.command(&format!("{} {} {}", programs[i % 6], args[(i / 6) % 6], i));
    }
    let loaded = build_candidates(history.to_bash().as_bytes(), HistoryFormat::Auto);
    let candidates = &loaded.candidates;

    let mut engine = MatchEngine::new();
    for query in ["g", "crgo", "k get", "ssh p", "zz", "1 2"] {
        let result = engine.match_query(query, candidates);
        let again = engine.match_query(query, candidates);
        assert_eq!(result, again);

        let mut seen = HashSet::new();
        for m in result.iter() {
            assert!(seen.insert(m.index), "duplicate index for {query:?}");
            let text = candidates[m.index].command.to_lowercase();
            let mut chars = text.chars();
            assert!(query.chars().all(|q| chars.any(|c| c == q)), "{text:?} vs {query:?}");
        }
    }
}

#[test]
fn test_no_duplicates_in_candidates() {
    let mut history = HistoryBuilder::new();
    for i in 0..500 {
        history = history.command(&format!("cmd {}", i % 37));
    }
    let loaded = build_candidates(history.to_plain().as_bytes(), HistoryFormat::Auto);

    let distinct: HashSet<&str> = loaded.candidates.iter().map(|e| e.command.as_str()).collect();
    assert_eq!(distinct.len(), loaded.candidates.len());
    assert_eq!(loaded.candidates.len(), 37);
    assert_eq!(loaded.raw_count, 500);
    // 499 % 37 == 18 was the last command run
    assert_eq!(loaded.candidates[0].command, "cmd 18");
}

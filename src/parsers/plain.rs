use super::{decode, is_blank, split_lines};
use crate::models::HistoryEntry;

/// One command per non-blank line, kept byte-for-byte.
pub fn parse(bytes: &[u8]) -> Vec<HistoryEntry> {
    split_lines(bytes)
        .filter(|line| !is_blank(line))
        .map(|line| HistoryEntry::new(decode(line)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_command_per_line() {
        let entries = parse(b"git status\nls -la\ngit status\n");
        let commands: Vec<&str> = entries.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["git status", "ls -la", "git status"]);
        assert!(entries.iter().all(|e| e.timestamp.is_none()));
    }

    #[test]
    fn test_skips_blank_lines() {
        let entries = parse(b"\n\nls\n   \n\t\npwd");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].command, "pwd");
    }

    #[test]
    fn test_trailing_backslash_is_not_a_continuation() {
        let entries = parse(b"echo a \\\necho b\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, "echo a \\");
    }

    #[test]
    fn test_preserves_inner_whitespace() {
        let entries = parse(b"  indented   command  \n");
        assert_eq!(entries[0].command, "  indented   command  ");
    }
}

use chrono::{DateTime, Utc};

use super::epoch::{parse_epoch, split_digits};
use super::{ParseReport, decode, is_blank, split_lines};
use crate::models::HistoryEntry;

/// zsh's metafication marker: the following byte has been XORed with 0x20.
const META: u8 = 0x83;

/// Parse a `: <epoch>:<elapsed>;<command>` record, returning the timestamp and the
/// command bytes.
pub fn parse_record(line: &[u8]) -> Option<(Option<DateTime<Utc>>, &[u8])> {
    let rest = line.strip_prefix(b":")?;
    let rest = trim_start(rest);
    let (epoch, rest) = split_digits(rest);
    if epoch.is_empty() {
        return None;
    }
    let rest = rest.strip_prefix(b":")?;
    let (_elapsed, rest) = split_digits(rest);
    let command = rest.strip_prefix(b";")?;
    Some((parse_epoch(epoch), command))
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != b' ').unwrap_or(bytes.len());
    &bytes[start..]
}

/// Strip a trailing continuation backslash. The flag is true when one was present.
fn split_continuation(line: &[u8]) -> (&[u8], bool) {
    match line.strip_suffix(b"\\") {
        Some(body) => (body, true),
        None => (line, false),
    }
}

/// Undo zsh's metafication of bytes in the 0x83..=0xa2 range.
pub fn unmetafy(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter();
    while let Some(&b) = iter.next() {
        if b == META {
            match iter.next() {
                Some(&next) => out.push(next ^ 0x20),
                None => out.push(b),
            }
        } else {
            out.push(b);
        }
    }
    out
}

struct Pending {
    timestamp: Option<DateTime<Utc>>,
    buf: Vec<u8>,
}

/// zsh `EXTENDED_HISTORY`. Records can span lines: a line ending in `\` continues on the
/// next line, and the reassembled command keeps a `\n` at each join.
pub fn parse(bytes: &[u8], report: &mut ParseReport) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();
    let mut pending: Option<Pending> = None;

    for line in split_lines(bytes) {
        if let Some(mut open) = pending.take() {
            let (body, more) = split_continuation(line);
            open.buf.push(b'\n');
            open.buf.extend_from_slice(body);
            if more {
                pending = Some(open);
            } else {
                finish(open, &mut entries, report);
            }
            continue;
        }

        if is_blank(line) {
            continue;
        }

        let (timestamp, body) = match parse_record(line) {
            Some(record) => record,
            None => {
                report.orphan_lines += 1;
                (None, line)
            }
        };
        let (body, more) = split_continuation(body);
        let open = Pending { timestamp, buf: body.to_vec() };
        if more {
            pending = Some(open);
        } else {
            finish(open, &mut entries, report);
        }
    }

    if let Some(open) = pending {
        report.unterminated += 1;
        finish(open, &mut entries, report);
    }

    entries
}

fn finish(pending: Pending, entries: &mut Vec<HistoryEntry>, report: &mut ParseReport) {
    let text = decode(&unmetafy(&pending.buf));
    let command = text.trim_end_matches('\n');
    if command.trim().is_empty() {
        report.empty_records += 1;
        return;
    }
    entries.push(HistoryEntry { command: command.to_string(), timestamp: pending.timestamp });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::HistoryFormat;

    fn run(bytes: &[u8]) -> (Vec<HistoryEntry>, ParseReport) {
        let mut report = ParseReport::new(HistoryFormat::ZshExtended);
        let entries = parse(bytes, &mut report);
        (entries, report)
    }

    #[test]
    fn test_parse_record() {
        let (ts, cmd) = parse_record(b": 1700000000:12;git push").unwrap();
        assert_eq!(ts.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(cmd, b"git push");
    }

    #[test]
    fn test_parse_record_rejects_non_records() {
        assert!(parse_record(b"git push").is_none());
        assert!(parse_record(b": not a record").is_none());
        assert!(parse_record(b": 1700000000;missing elapsed").is_none());
        assert!(parse_record(b": 1700000000:0 no semicolon").is_none());
    }

    #[test]
    fn test_record_with_semicolons_in_command() {
        let (entries, _) = run(b": 1700000000:0;cd /tmp; ls; cd -\n");
        assert_eq!(entries[0].command, "cd /tmp; ls; cd -");
    }

    #[test]
    fn test_continuation_lines_are_joined() {
        let data = b": 1700000000:0;for f in *; do\\\n  echo $f\\\ndone\n: 1700000010:0;pwd\n";
        let (entries, report) = run(data);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, "for f in *; do\n  echo $f\ndone");
        assert_eq!(entries[0].timestamp.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(entries[1].command, "pwd");
        assert_eq!(report.anomalies(), 0);
    }

    #[test]
    fn test_continuation_line_that_looks_like_a_record() {
        let data = b": 1700000000:0;echo \\\n: 1700000001:0;not a record\n";
        let (entries, _) = run(data);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].command, "echo \n: 1700000001:0;not a record");
    }

    #[test]
    fn test_unterminated_continuation_at_eof() {
        let (entries, report) = run(b": 1700000000:0;ls\n: 1700000001:0;echo one\\\ntwo\\");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].command, "echo one\ntwo");
        assert_eq!(report.unterminated, 1);
    }

    #[test]
    fn test_unterminated_continuation_without_newline() {
        let (entries, report) = run(b": 1700000000:0;echo start\\");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].command, "echo start");
        assert_eq!(report.unterminated, 1);
    }

    #[test]
    fn test_orphan_plain_lines_in_mixed_file() {
        let (entries, report) = run(b"old plain command\n: 1700000000:0;new\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, "old plain command");
        assert!(entries[0].timestamp.is_none());
        assert_eq!(report.orphan_lines, 1);
    }

    #[test]
    fn test_empty_record_is_dropped() {
        let (entries, report) = run(b": 1700000000:0;\n: 1700000001:0;ls\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(report.empty_records, 1);
    }

    #[test]
    fn test_unmetafy() {
        // "é" is 0xc3 0xa9; zsh stores 0xa9 as META, 0x89
        assert_eq!(unmetafy(&[b'a', META, 0x89, b'b']), vec![b'a', 0xa9, b'b']);
        assert_eq!(unmetafy(&[b'a', META]), vec![b'a', META]);
    }

    #[test]
    fn test_metafied_command_decodes() {
        let mut data = b": 1700000000:0;echo caf\xc3".to_vec();
        data.extend_from_slice(&[META, 0x89, b'\n']);
        let (entries, _) = run(&data);
        assert_eq!(entries[0].command, "echo café");
    }
}

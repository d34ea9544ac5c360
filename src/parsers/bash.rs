use chrono::{DateTime, Utc};

use super::epoch::{parse_epoch, split_digits};
use super::{ParseReport, decode, is_blank, split_lines};
use crate::models::HistoryEntry;

/// Parse a `#<epoch>` marker line. The timestamp is `None` when the digits do not fit.
pub fn parse_marker(line: &[u8]) -> Option<Option<DateTime<Utc>>> {
    let rest = line.strip_prefix(b"#")?;
    let (digits, tail) = split_digits(rest);
    if digits.is_empty() || !is_blank(tail) {
        return None;
    }
    Some(parse_epoch(digits))
}

struct Record<'a> {
    timestamp: Option<DateTime<Utc>>,
    lines: Vec<&'a [u8]>,
}

/// bash with `HISTTIMEFORMAT`: every command is preceded by a `#<epoch>` line. With
/// `cmdhist` + `lithist` a multi-line command keeps its newlines, so every line up to
/// the next marker belongs to the same command.
pub fn parse(bytes: &[u8], report: &mut ParseReport) -> Vec<HistoryEntry> {
    let mut entries = Vec::new();
    let mut current: Option<Record> = None;

    for line in split_lines(bytes) {
        if let Some(timestamp) = parse_marker(line) {
            if let Some(record) = current.take() {
                finish(record, &mut entries, report);
            }
            current = Some(Record { timestamp, lines: Vec::new() });
            continue;
        }
        if is_blank(line) {
            continue;
        }
        match current.as_mut() {
            Some(record) => record.lines.push(line),
            None => {
                report.orphan_lines += 1;
                entries.push(HistoryEntry::new(decode(line)));
            }
        }
    }

    if let Some(record) = current {
        finish(record, &mut entries, report);
    }

    entries
}

fn finish(record: Record, entries: &mut Vec<HistoryEntry>, report: &mut ParseReport) {
    if record.lines.is_empty() {
        report.empty_records += 1;
        return;
    }
    let command = decode(&record.lines.join(&b'\n'));
    entries.push(HistoryEntry { command, timestamp: record.timestamp });
}

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};

use super::layout::PickerLayout;
use super::timestamps::format_age;
use crate::indexer::CandidateList;
use crate::matching::MatchResult;
use crate::utils::terminal::{display_chars, sanitize_for_display};

const PROMPT: &str = "> ";
/// Wide enough for "Dec 13, 2024"
const AGE_WIDTH: usize = 12;

const ACCENT: Color = Color::Rgb(16, 185, 129); // Emerald
const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const SELECTED_BG: Color = Color::Rgb(39, 39, 42);

/// Everything one frame needs. Rendering reads this and nothing else.
pub struct RenderState<'a> {
    pub query: &'a str,
    pub candidates: &'a CandidateList,
    pub matches: &'a MatchResult,
    /// Rank of the highlighted row, `None` when nothing matches
    pub selected: Option<usize>,
    pub show_age: bool,
    pub now: DateTime<Utc>,
}

/// Render the whole picker
pub fn render_picker(frame: &mut Frame, state: &RenderState) {
    let counter = format!(" {}/{}", state.matches.len(), state.candidates.len());
    let layout = PickerLayout::new(frame.area(), counter.chars().count() as u16);

    render_query_line(frame, layout.query_area, state.query);
    frame.render_widget(
        Paragraph::new(counter).style(Style::default().fg(MUTED)),
        layout.counter_area,
    );
    render_results(frame, layout.list_area, state);
}

fn render_query_line(frame: &mut Frame, area: Rect, query: &str) {
    let line = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(sanitize_for_display(query), Style::default().fg(BRIGHT)),
    ]);

    let cursor_x = area.x.saturating_add(line.width() as u16).min(area.right().saturating_sub(1));
    frame.render_widget(Paragraph::new(line), area);
    frame.set_cursor_position((cursor_x, area.y));
}

fn render_results(frame: &mut Frame, area: Rect, state: &RenderState) {
    if state.matches.is_empty() {
        frame.render_widget(
            Paragraph::new(" No matches").style(Style::default().fg(MUTED)),
            area,
        );
        return;
    }

    let rows = usize::from(area.height);
    let offset = window_offset(state.selected.unwrap_or(0), rows);

    let items: Vec<ListItem> = state
        .matches
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(rank, m)| {
            let entry = &state.candidates[m.index];
            let mut spans = Vec::new();

            if state.show_age {
                let age = entry.timestamp.map(|ts| format_age(&ts, &state.now)).unwrap_or_default();
                spans.push(Span::styled(
                    format!("{age:>AGE_WIDTH$} "),
                    Style::default().fg(MUTED),
                ));
            }
            spans.extend(command_spans(&entry.command, &m.positions));

            let item = ListItem::new(Line::from(spans));
            if state.selected == Some(rank) {
                item.style(Style::default().fg(BRIGHT).bg(SELECTED_BG))
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items), area);
}

/// First visible rank so that `selected` stays on screen.
fn window_offset(selected: usize, rows: usize) -> usize {
    if rows > 0 && selected >= rows { selected + 1 - rows } else { 0 }
}

/// Split a sanitized command into runs of matched and unmatched characters.
///
/// `positions` are source character offsets, ascending.
fn command_spans(command: &str, positions: &[u32]) -> Vec<Span<'static>> {
    let highlight = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_matched = false;

    for (idx, ch) in display_chars(command) {
        let matched = u32::try_from(idx).is_ok_and(|idx| positions.binary_search(&idx).is_ok());
        if matched != run_matched && !run.is_empty() {
            let text = std::mem::take(&mut run);
            spans.push(if run_matched { Span::styled(text, highlight) } else { Span::raw(text) });
        }
        run_matched = matched;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(if run_matched { Span::styled(run, highlight) } else { Span::raw(run) });
    }

    spans
}

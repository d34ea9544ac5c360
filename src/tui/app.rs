//! Picker state and event handling.
//!
//! The picker is an explicit state machine:
//!
//! - [`EditorState`] is an immutable snapshot of the query and the highlighted row
//! - [`EditorState::next`] is a pure transition that also reports the [`Effect`] the
//!   caller must carry out (re-run the match engine, finish with a selection, cancel)
//! - [`App`] owns the candidates, the match engine and the current snapshot, and runs
//!   the render / read / step loop until an [`Outcome`] is reached
//!
//! # Example
//!
//! ```rust,ignore
//! let mut app = App::new(&candidates, "git");
//! let outcome = app.run(&mut session, &mut CrosstermInput::new(KeyMap::Standard))?;
//! ```

use anyhow::Result;
use chrono::Utc;
use ratatui::backend::Backend;
use tracing::debug;

use super::events::{Input, InputSource};
use super::rendering::{RenderState, render_picker};
use super::terminal::{TerminalMode, TerminalSession};
use crate::indexer::CandidateList;
use crate::matching::{MatchEngine, MatchResult};

/// Limit query to 256 characters
pub const MAX_QUERY_LEN: usize = 256;

/// Highlighted row, as a rank into the current match result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Nothing matches
    Empty,
    At(usize),
}

impl Selection {
    /// First row of a result with `match_count` entries.
    pub fn first(match_count: usize) -> Self {
        if match_count == 0 { Selection::Empty } else { Selection::At(0) }
    }

    pub fn rank(self) -> Option<usize> {
        match self {
            Selection::Empty => None,
            Selection::At(rank) => Some(rank),
        }
    }

    /// Pull the selection back inside `[0, match_count - 1]`.
    fn clamp(self, match_count: usize) -> Self {
        match self {
            _ if match_count == 0 => Selection::Empty,
            Selection::Empty => Selection::At(0),
            Selection::At(rank) => Selection::At(rank.min(match_count - 1)),
        }
    }
}

/// What the caller has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The query changed: re-run the match engine, then [`EditorState::settle`]
    Requery,
    /// Finish with the candidate at this rank
    Select(usize),
    Cancel,
}

/// How a picker session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Selected(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    query: String,
    selection: Selection,
}

impl EditorState {
    /// Initial state for `query` (truncated to [`MAX_QUERY_LEN`] characters).
    pub fn new(query: &str, match_count: usize) -> Self {
        Self {
            query: query.chars().take(MAX_QUERY_LEN).collect(),
            selection: Selection::first(match_count),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Step the state machine. `match_count` is the size of the result the user is
    /// currently looking at.
    pub fn next(&self, input: Input, match_count: usize) -> (EditorState, Effect) {
        match input {
            Input::Char(c) => {
                if self.query.chars().count() >= MAX_QUERY_LEN {
                    return (self.clone(), Effect::None);
                }
                let mut query = self.query.clone();
                query.push(c);
                (EditorState { query, selection: Selection::Empty }, Effect::Requery)
            }
            Input::Backspace => {
                let mut query = self.query.clone();
                if query.pop().is_none() {
                    return (self.clone(), Effect::None);
                }
                (EditorState { query, selection: Selection::Empty }, Effect::Requery)
            }
            Input::Up => {
                let next = match self.selection.clamp(match_count) {
                    Selection::At(rank) => Selection::At(rank.saturating_sub(1)),
                    Selection::Empty => Selection::Empty,
                };
                (self.with_selection(next), Effect::None)
            }
            Input::Down => {
                let next = match self.selection.clamp(match_count) {
                    Selection::At(rank) => Selection::At(rank + 1).clamp(match_count),
                    Selection::Empty => Selection::Empty,
                };
                (self.with_selection(next), Effect::None)
            }
            Input::Enter => match self.selection.clamp(match_count) {
                Selection::At(rank) => (self.clone(), Effect::Select(rank)),
                // Nothing to pick yet, keep editing
                Selection::Empty => (self.clone(), Effect::None),
            },
            Input::Cancel => (self.clone(), Effect::Cancel),
            Input::Ignored => (self.clone(), Effect::None),
        }
    }

    /// Reset the selection to the first row of a fresh result.
    pub fn settle(self, match_count: usize) -> Self {
        Self { selection: Selection::first(match_count), ..self }
    }

    fn with_selection(&self, selection: Selection) -> Self {
        Self { query: self.query.clone(), selection }
    }
}

pub struct App<'a> {
    candidates: &'a CandidateList,
    engine: MatchEngine,
    state: EditorState,
    matches: MatchResult,
    show_age: bool,
    outcome: Option<Outcome>,
}

impl<'a> App<'a> {
    pub fn new(candidates: &'a CandidateList, initial_query: &str) -> Self {
        let mut engine = MatchEngine::new();
        let query: String = initial_query.chars().take(MAX_QUERY_LEN).collect();
        let matches = engine.match_query(&query, candidates);
        let state = EditorState::new(&query, matches.len());

        Self {
            candidates,
            engine,
            state,
            matches,
            show_age: candidates.any_timestamped(),
            outcome: None,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn matches(&self) -> &MatchResult {
        &self.matches
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Command under the highlight, if any.
    pub fn selected_command(&self) -> Option<&str> {
        let rank = self.state.selection().rank()?;
        let m = self.matches.get(rank)?;
        Some(self.candidates[m.index].command.as_str())
    }

    /// Apply one input and carry out its effect.
    pub fn handle_input(&mut self, input: Input) {
        let (state, effect) = self.state.next(input, self.matches.len());
        self.state = state;

        match effect {
            Effect::None => {}
            Effect::Requery => {
                self.matches = self.engine.match_query(self.state.query(), self.candidates);
                self.state = self.state.clone().settle(self.matches.len());
                debug!(
                    query_len = self.state.query().len(),
                    matched = self.matches.len(),
                    "requery"
                );
            }
            Effect::Select(rank) => {
                if let Some(m) = self.matches.get(rank) {
                    let command = self.candidates[m.index].command.clone();
                    self.outcome = Some(Outcome::Selected(command));
                }
            }
            Effect::Cancel => self.outcome = Some(Outcome::Cancelled),
        }
    }

    /// Render, block on input, step; until selected or cancelled.
    ///
    /// Errors from drawing or reading input end the loop immediately. Releasing the
    /// terminal is the caller's job (see [`super::terminal::scoped`]).
    pub fn run<B, M, I>(
        &mut self,
        session: &mut TerminalSession<B, M>,
        input: &mut I,
    ) -> Result<Outcome>
    where
        B: Backend,
        M: TerminalMode,
        I: InputSource + ?Sized,
    {
        loop {
            if let Some(outcome) = self.outcome.take() {
                return Ok(outcome);
            }

            let state = RenderState {
                query: self.state.query(),
                candidates: self.candidates,
                matches: &self.matches,
                selected: self.state.selection().rank(),
                show_age: self.show_age,
                now: Utc::now(),
            };
            session.draw(|f| render_picker(f, &state))?;

            let input = input.next_input()?;
            self.handle_input(input);
        }
    }
}

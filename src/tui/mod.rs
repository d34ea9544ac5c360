//! Interactive picker: raw-mode session, key decoding, state machine and rendering
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use anyhow::Result;
pub use app::{App, Effect, EditorState, MAX_QUERY_LEN, Outcome, Selection};
pub use events::{
    CrosstermInput, Input, InputSource, KeyMap, ScriptedInput, event_to_input, key_to_input,
};
use ratatui::backend::Backend;
pub use rendering::{RenderState, render_picker};
pub use terminal::{
    CrosstermMode, ReleaseLatch, TerminalMode, TerminalSession, TtyWriter, install_restore_hooks,
    scoped,
};
pub use timestamps::format_age;
use tracing::info;

use crate::indexer::CandidateList;

/// Run the picker on an acquired session and release it afterwards.
///
/// The session is released before this returns, on success and on error alike.
pub fn run_picker<B, M, I>(
    session: TerminalSession<B, M>,
    input: &mut I,
    candidates: &CandidateList,
    initial_query: &str,
) -> Result<Outcome>
where
    B: Backend,
    M: TerminalMode,
    I: InputSource + ?Sized,
{
    scoped(session, |session| App::new(candidates, initial_query).run(session, input))
}

/// Run the interactive picker on the controlling terminal.
pub fn pick(
    candidates: &CandidateList,
    initial_query: &str,
    height: u16,
    keymap: KeyMap,
) -> Result<Outcome> {
    let session = TerminalSession::acquire(height)?;
    install_restore_hooks(&session.latch());

    let outcome = run_picker(session, &mut CrosstermInput::new(keymap), candidates, initial_query)?;
    info!(selected = matches!(outcome, Outcome::Selected(_)), "picker finished");
    Ok(outcome)
}

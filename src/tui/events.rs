use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Picker inputs decoded from terminal events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Backspace,
    Up,
    Down,
    Enter,
    Cancel,
    /// Unbound keys, key releases and resizes. Only triggers a redraw.
    Ignored,
}

/// How bare letters are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyMap {
    /// Every printable key edits the query
    #[default]
    Standard,
    /// Bare `k`/`j` move the selection instead of typing
    Vi,
}

/// Blocking source of picker inputs.
pub trait InputSource {
    fn next_input(&mut self) -> Result<Input>;
}

/// Reads key events from the terminal via crossterm.
#[derive(Debug, Default)]
pub struct CrosstermInput {
    keymap: KeyMap,
}

impl CrosstermInput {
    pub fn new(keymap: KeyMap) -> Self {
        Self { keymap }
    }
}

impl InputSource for CrosstermInput {
    fn next_input(&mut self) -> Result<Input> {
        Ok(event_to_input(event::read()?, self.keymap))
    }
}

pub fn event_to_input(event: Event, keymap: KeyMap) -> Input {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => key_to_input(key, keymap),
        _ => Input::Ignored,
    }
}

pub fn key_to_input(key: KeyEvent, keymap: KeyMap) -> Input {
    match (key.code, key.modifiers) {
        // Cancel
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Input::Cancel,
        (KeyCode::Esc, _) => Input::Cancel,

        // Navigation (arrows, Emacs and vi-insert style)
        (KeyCode::Up, _) => Input::Up,
        (KeyCode::Down, _) => Input::Down,
        (KeyCode::Char('p' | 'k'), KeyModifiers::CONTROL) => Input::Up,
        (KeyCode::Char('n' | 'j'), KeyModifiers::CONTROL) => Input::Down,

        (KeyCode::Enter, _) => Input::Enter,
        (KeyCode::Backspace, _) => Input::Backspace,

        // Query input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            match (keymap, c) {
                (KeyMap::Vi, 'k') => Input::Up,
                (KeyMap::Vi, 'j') => Input::Down,
                _ => Input::Char(c),
            }
        }

        _ => Input::Ignored,
    }
}

/// Replays a fixed list of inputs, then fails like a broken terminal would.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    inputs: std::collections::VecDeque<Input>,
}

impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = Input>) -> Self {
        Self { inputs: inputs.into_iter().collect() }
    }

    /// Type `text` one character at a time.
    pub fn typing(text: &str) -> Self {
        Self::new(text.chars().map(Input::Char))
    }

    pub fn then(mut self, input: Input) -> Self {
        self.inputs.push_back(input);
        self
    }
}

impl InputSource for ScriptedInput {
    fn next_input(&mut self) -> Result<Input> {
        self.inputs.pop_front().ok_or_else(|| anyhow::anyhow!("input stream closed"))
    }
}

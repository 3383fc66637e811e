/// Keyboard and pointer bindings.
///
/// Held keys are tracked by the frame they were last seen in, rather than
/// acted on per event, so movement and shooting can be held together.
/// Terminals with keyboard enhancement send real Release events; classic
/// terminals only repeat Press, so keys also expire after `HOLD_WINDOW`
/// frames of silence.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::compute::Session;
use crate::entities::{overlay_button_rect, InputState};

/// A key counts as held if it was seen within this many frames. At 60 fps
/// this is ≈130 ms, shorter than any OS key-repeat interval.
pub const HOLD_WINDOW: u64 = 8;

/// Discrete commands that do not depend on held state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Restart,
    AdvanceLevel,
    Quit,
}

#[derive(Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key event seen during `frame`. Returns a command for one-shot
    /// keys (quit, confirm).
    pub fn handle_key(&mut self, event: KeyEvent, frame: u64, session: &Session) -> Option<Command> {
        let code = normalize(event.code);
        match event.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(code, frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
                    KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(Command::Quit)
                    }
                    KeyCode::Enter => overlay_command(session),
                    _ => None,
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
                None
            }
        }
    }

    fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// The held-key commands for `frame`.
    pub fn input_state(&self, frame: u64) -> InputState {
        InputState {
            left: self.is_held(KeyCode::Left, frame) || self.is_held(KeyCode::Char('a'), frame),
            right: self.is_held(KeyCode::Right, frame) || self.is_held(KeyCode::Char('d'), frame),
            shoot: self.is_held(KeyCode::Char('s'), frame) || self.is_held(KeyCode::Char(' '), frame),
        }
    }

    /// Forget every held key, e.g. when a new wave starts.
    pub fn clear(&mut self) {
        self.key_frame.clear();
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// The command for whichever overlay button is currently shown.
fn overlay_command(session: &Session) -> Option<Command> {
    if session.show_restart_button() {
        Some(Command::Restart)
    } else if session.show_next_level_button() {
        Some(Command::AdvanceLevel)
    } else {
        None
    }
}

/// Map a click at logical field coordinates to a button command.
pub fn pointer_command(session: &Session, x: f32, y: f32) -> Option<Command> {
    if !overlay_button_rect().contains_point(x, y) {
        return None;
    }
    overlay_command(session)
}

/// Apply a button command to the session. `Quit` is left to the caller.
pub fn apply_command(session: &mut Session, command: Command) {
    match command {
        Command::Restart => session.restart(),
        Command::AdvanceLevel => session.advance_level(),
        Command::Quit => {}
    }
}

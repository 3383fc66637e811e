use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use hotdog_game::entities::*;
use hotdog_game::input::*;

mod common;
use common::seeded_session;

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

fn button_centre() -> (f32, f32) {
    let r = overlay_button_rect();
    (r.x + r.width / 2.0, r.y + r.height / 2.0)
}

// ── held keys ─────────────────────────────────────────────────────────────────

#[test]
fn pressed_key_is_held_within_window() {
    let session = seeded_session();
    let mut keys = KeyTracker::new();
    keys.handle_key(press(KeyCode::Left), 1, &session);
    assert!(keys.input_state(1).left);
    assert!(keys.input_state(1 + HOLD_WINDOW).left);
    assert!(!keys.input_state(2 + HOLD_WINDOW).left);
}

#[test]
fn release_drops_key_immediately() {
    let session = seeded_session();
    let mut keys = KeyTracker::new();
    keys.handle_key(press(KeyCode::Right), 1, &session);
    keys.handle_key(release(KeyCode::Right), 1, &session);
    assert!(!keys.input_state(1).right);
}

#[test]
fn letter_bindings_ignore_case() {
    let session = seeded_session();
    let mut keys = KeyTracker::new();
    keys.handle_key(press(KeyCode::Char('A')), 1, &session);
    keys.handle_key(press(KeyCode::Char('S')), 1, &session);
    assert_eq!(
        keys.input_state(1),
        InputState { left: true, right: false, shoot: true }
    );
}

#[test]
fn move_and_shoot_can_be_held_together() {
    let session = seeded_session();
    let mut keys = KeyTracker::new();
    keys.handle_key(press(KeyCode::Char('d')), 3, &session);
    keys.handle_key(press(KeyCode::Char(' ')), 3, &session);
    assert_eq!(
        keys.input_state(4),
        InputState { left: false, right: true, shoot: true }
    );
}

#[test]
fn clear_forgets_held_keys() {
    let session = seeded_session();
    let mut keys = KeyTracker::new();
    keys.handle_key(press(KeyCode::Left), 1, &session);
    keys.clear();
    assert_eq!(keys.input_state(1), InputState::default());
}

#[test]
fn quit_keys() {
    let session = seeded_session();
    let mut keys = KeyTracker::new();
    assert_eq!(keys.handle_key(press(KeyCode::Char('q')), 1, &session), Some(Command::Quit));
    assert_eq!(keys.handle_key(press(KeyCode::Esc), 1, &session), Some(Command::Quit));
    assert_eq!(
        keys.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), 1, &session),
        Some(Command::Quit)
    );
    assert_eq!(keys.handle_key(press(KeyCode::Char('c')), 1, &session), None);
}

#[test]
fn enter_activates_the_shown_button() {
    let mut session = seeded_session();
    let mut keys = KeyTracker::new();
    assert_eq!(keys.handle_key(press(KeyCode::Enter), 1, &session), None);

    session.status = GameStatus::GameOver;
    assert_eq!(keys.handle_key(press(KeyCode::Enter), 1, &session), Some(Command::Restart));

    session.status = GameStatus::WaveCleared;
    assert_eq!(keys.handle_key(press(KeyCode::Enter), 1, &session), Some(Command::AdvanceLevel));
}

// ── pointer ───────────────────────────────────────────────────────────────────

#[test]
fn click_on_restart_button() {
    let mut session = seeded_session();
    session.status = GameStatus::GameOver;
    let (x, y) = button_centre();
    assert_eq!(pointer_command(&session, x, y), Some(Command::Restart));
}

#[test]
fn click_on_next_level_button() {
    let mut session = seeded_session();
    session.status = GameStatus::WaveCleared;
    let r = overlay_button_rect();
    // Edges are inside.
    assert_eq!(pointer_command(&session, r.x, r.y), Some(Command::AdvanceLevel));
    assert_eq!(
        pointer_command(&session, r.x + r.width, r.y + r.height),
        Some(Command::AdvanceLevel)
    );
}

#[test]
fn click_outside_button_does_nothing() {
    let mut session = seeded_session();
    session.status = GameStatus::GameOver;
    let r = overlay_button_rect();
    assert_eq!(pointer_command(&session, r.x - 1.0, r.y), None);
    assert_eq!(pointer_command(&session, r.x, r.y + r.height + 1.0), None);
}

#[test]
fn click_while_playing_does_nothing() {
    let session = seeded_session();
    let (x, y) = button_centre();
    assert_eq!(pointer_command(&session, x, y), None);
}

#[test]
fn apply_restart_command() {
    let mut session = seeded_session();
    session.score = 90;
    session.status = GameStatus::GameOver;
    apply_command(&mut session, Command::Restart);
    assert_eq!(session.score, 0);
    assert_eq!(session.status, GameStatus::Playing);
}

//! Key mapping from terminal events to camera-relative input events.
//!
//! Nothing here knows where the camera points; [`crate::camera`] resolves the
//! result into grid-space [`GameAction`](crate::types::GameAction)s.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Screen-relative movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDir {
    Forward,
    Back,
    Left,
    Right,
}

/// One of the three rotation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateKey {
    One,
    Two,
    Three,
}

/// Input before camera resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Move(MoveDir),
    Rotate { key: RotateKey, reverse: bool },
    SoftDrop,
    Hold,
    Pause,
    Restart,
    /// Q: camera yaw +1.
    OrbitLeft,
    /// E: camera yaw -1.
    OrbitRight,
}

/// Movement direction for a key, if it is a movement key.
pub fn move_dir(code: KeyCode) -> Option<MoveDir> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(MoveDir::Forward),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(MoveDir::Back),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(MoveDir::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(MoveDir::Right),
        _ => None,
    }
}

fn rotate_key(code: KeyCode, modifiers: KeyModifiers) -> Option<(RotateKey, bool)> {
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    match code {
        KeyCode::Char('1') => Some((RotateKey::One, shift)),
        KeyCode::Char('2') => Some((RotateKey::Two, shift)),
        KeyCode::Char('3') => Some((RotateKey::Three, shift)),
        // Shifted digits on a US layout, for terminals that report the glyph.
        KeyCode::Char('!') => Some((RotateKey::One, true)),
        KeyCode::Char('@') => Some((RotateKey::Two, true)),
        KeyCode::Char('#') => Some((RotateKey::Three, true)),
        _ => None,
    }
}

/// Map keyboard input to an input event.
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    if let Some(dir) = move_dir(key.code) {
        return Some(InputEvent::Move(dir));
    }
    if let Some((key, reverse)) = rotate_key(key.code, key.modifiers) {
        return Some(InputEvent::Rotate { key, reverse });
    }

    match key.code {
        KeyCode::Char(' ') => Some(InputEvent::SoftDrop),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(InputEvent::Hold),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(InputEvent::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputEvent::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::OrbitLeft),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(InputEvent::OrbitRight),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('x') | KeyCode::Char('X'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

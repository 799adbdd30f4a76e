//! Key bindings.

use crate::game::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Game(Command),
    Start,
    Restart,
    /// Answer "no" to the game-over prompt; quits there, ignored elsewhere.
    Decline,
    Quit,
    None,
}

/// Map key event to an action. Letter keys ignore case.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    let code = match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    match code {
        KeyCode::Left => Action::Game(Command::MoveLeft),
        KeyCode::Right => Action::Game(Command::MoveRight),
        KeyCode::Up => Action::Game(Command::Rotate),
        KeyCode::Down => Action::Game(Command::SoftDrop),
        KeyCode::Char(' ') => Action::Game(Command::HardDrop),
        KeyCode::Char('z') => Action::Game(Command::Hold),
        KeyCode::Char('x') => Action::Game(Command::SwapHold),
        KeyCode::Enter => Action::Start,
        KeyCode::Char('y') => Action::Restart,
        KeyCode::Char('n') => Action::Decline,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

//! Key bindings for the form.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    MoveUp,
    MoveDown,
    Choose(usize),
    Submit,
    Dismiss,
    Yes,
    No,
    InputChar(char),
    Backspace,
    ClearInput,
    Noop,
}

pub fn map_key(key: KeyEvent, input_mode_active: bool) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    if input_mode_active {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('u') {
            return KeyAction::ClearInput;
        }
        return match key.code {
            KeyCode::Enter => KeyAction::Submit,
            KeyCode::Esc => KeyAction::Dismiss,
            KeyCode::Backspace => KeyAction::Backspace,
            KeyCode::Char(c) if !c.is_control() => KeyAction::InputChar(c),
            _ => KeyAction::Noop,
        };
    }
    match key.code {
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('k') | KeyCode::Up => KeyAction::MoveUp,
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => KeyAction::MoveDown,
        KeyCode::Char('1') => KeyAction::Choose(0),
        KeyCode::Char('2') => KeyAction::Choose(1),
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Yes,
        KeyCode::Char('n') | KeyCode::Char('N') => KeyAction::No,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Esc => KeyAction::Dismiss,
        _ => KeyAction::Noop,
    }
}

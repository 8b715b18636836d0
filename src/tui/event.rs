//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::BreatheError;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Exit the exercise.
    Quit,
    /// Pause or resume.
    TogglePause,
    /// Start the exercise over.
    Restart,
    /// The terminal was resized; draw again.
    Redraw,
}

/// Map a key press to an action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ' | 'p') => Some(Action::TogglePause),
        KeyCode::Char('r') => Some(Action::Restart),
        _ => None,
    }
}

/// Wait up to `timeout` for a terminal event.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn next_action(timeout: Duration) -> Result<Option<Action>, BreatheError> {
    if !event::poll(timeout)
        .map_err(|e| BreatheError::Terminal(format!("Event poll failed: {e}")))?
    {
        return Ok(None);
    }

    let action = match event::read()
        .map_err(|e| BreatheError::Terminal(format!("Event read failed: {e}")))?
    {
        Event::Key(key) => map_key(key),
        Event::Resize(_, _) => Some(Action::Redraw),
        _ => None,
    };
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(Action::TogglePause));
        assert_eq!(map_key(press(KeyCode::Char('p'))), Some(Action::TogglePause));
        assert_eq!(map_key(press(KeyCode::Char('r'))), Some(Action::Restart));
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Quit));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key), None);
    }
}

//! Terminal events to host actions.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostInput {
    /// Flap; starts a new session first if none is running.
    Primary,
    Start,
    Restart,
    ToggleAudio,
    VolumeUp,
    VolumeDown,
    DifficultyUp,
    DifficultyDown,
    Quit,
}

pub fn map_event(event: &Event) -> Option<HostInput> {
    match event {
        Event::Key(key) => map_key(*key),
        Event::Mouse(mouse) => map_mouse(*mouse),
        _ => None,
    }
}

pub fn map_key(key: KeyEvent) -> Option<HostInput> {
    // Some terminals report releases and repeats too
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(HostInput::Quit);
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Up => Some(HostInput::Primary),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(HostInput::Start),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(HostInput::Restart),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(HostInput::ToggleAudio),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(HostInput::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(HostInput::VolumeDown),
        KeyCode::Char(']') => Some(HostInput::DifficultyUp),
        KeyCode::Char('[') => Some(HostInput::DifficultyDown),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(HostInput::Quit),
        _ => None,
    }
}

pub fn map_mouse(mouse: MouseEvent) -> Option<HostInput> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(HostInput::Primary),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_primary_keys() {
        for code in [KeyCode::Char(' '), KeyCode::Enter, KeyCode::Up] {
            assert_eq!(map_key(press(code)), Some(HostInput::Primary));
        }
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(map_key(press(KeyCode::Char('s'))), Some(HostInput::Start));
        assert_eq!(map_key(press(KeyCode::Char('r'))), Some(HostInput::Restart));
        assert_eq!(map_key(press(KeyCode::Char('m'))), Some(HostInput::ToggleAudio));
        assert_eq!(map_key(press(KeyCode::Char('+'))), Some(HostInput::VolumeUp));
        assert_eq!(map_key(press(KeyCode::Char('-'))), Some(HostInput::VolumeDown));
        assert_eq!(map_key(press(KeyCode::Char(']'))), Some(HostInput::DifficultyUp));
        assert_eq!(map_key(press(KeyCode::Char('['))), Some(HostInput::DifficultyDown));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(HostInput::Quit));
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(HostInput::Quit));
    }

    #[test]
    fn test_key_release_ignored() {
        let key = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(key), None);
    }

    #[test]
    fn test_mouse_down_is_primary() {
        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(map_event(&Event::Mouse(down)), Some(HostInput::Primary));

        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            ..down
        };
        assert_eq!(map_mouse(moved), None);
        assert_eq!(map_event(&Event::Resize(80, 24)), None);
    }
}

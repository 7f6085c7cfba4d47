//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system with the mouse and keyboard modules.
//!
//! # API
//!
//! - `convert_mouse_event` - crossterm MouseEvent to our MouseEvent
//! - `convert_key_event` - crossterm KeyEvent to our KeyboardEvent
//! - `poll_event` - Event check with timeout
//! - `route_event` - Dispatch an event to the matching module

use std::time::Duration;

use crossterm::event::{
    poll, read, Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};

use super::keyboard::{KeyState, KeyboardEvent, Modifiers};
use super::mouse::{MouseAction, MouseButton, MouseEvent};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Mouse(MouseEvent),
    Key(KeyboardEvent),
    /// Terminal resize (new width, height)
    Resize(u16, u16),
    /// Focus changes, paste and other events the page ignores
    None,
}

// =============================================================================
// CONVERSION
// =============================================================================

pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let (action, button) = match event.kind {
        MouseEventKind::Down(btn) => (MouseAction::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MouseAction::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MouseAction::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MouseAction::Move, MouseButton::None),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => (MouseAction::Scroll, MouseButton::None),
    };

    MouseEvent::new(action, button, event.column, event.row)
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers: Modifiers {
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            alt: event.modifiers.contains(KeyModifiers::ALT),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
        },
        state,
    }
}

fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Mouse(mouse) => InputEvent::Mouse(convert_mouse_event(mouse)),
        CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout. `None` if nothing arrived in time.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(convert_event(read()?)))
    } else {
        Ok(None)
    }
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Route an event to the matching handler module.
/// Returns true if any handler consumed the event.
pub fn route_event(event: InputEvent) -> bool {
    match event {
        InputEvent::Mouse(mouse) => super::mouse::dispatch(mouse),
        InputEvent::Key(key) => super::keyboard::dispatch(key),
        InputEvent::Resize(w, h) => {
            crate::pipeline::terminal::set_terminal_size(w, h);
            false
        }
        InputEvent::None => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_mouse_move() {
        let event = convert_mouse_event(CrosstermMouseEvent {
            kind: MouseEventKind::Moved,
            column: 30,
            row: 20,
            modifiers: KeyModifiers::empty(),
        });

        assert_eq!(event.action, MouseAction::Move);
        assert_eq!(event.button, MouseButton::None);
        assert_eq!((event.x, event.y), (30, 20));
        assert_eq!(event.region, None);
    }

    #[test]
    fn test_convert_mouse_down_and_drag() {
        let down = convert_mouse_event(CrosstermMouseEvent {
            kind: MouseEventKind::Down(CrosstermMouseButton::Left),
            column: 10,
            row: 5,
            modifiers: KeyModifiers::empty(),
        });
        assert_eq!(down.action, MouseAction::Down);
        assert_eq!(down.button, MouseButton::Left);

        let drag = convert_mouse_event(CrosstermMouseEvent {
            kind: MouseEventKind::Drag(CrosstermMouseButton::Right),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::empty(),
        });
        assert!(drag.is_motion());
        assert_eq!(drag.button, MouseButton::Right);
    }

    #[test]
    fn test_convert_scroll() {
        let event = convert_mouse_event(CrosstermMouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::empty(),
        });
        assert_eq!(event.action, MouseAction::Scroll);
    }

    #[test]
    fn test_convert_keys() {
        let event = convert_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(event.key, "c");
        assert!(event.modifiers.ctrl);

        assert_eq!(convert_key_event(key(KeyCode::Esc, KeyModifiers::empty())).key, "Escape");
        assert_eq!(convert_key_event(key(KeyCode::F(5), KeyModifiers::empty())).key, "F5");
    }

    #[test]
    fn test_resize_routes_to_terminal_size() {
        route_event(InputEvent::Resize(132, 43));
        assert_eq!(crate::pipeline::terminal::terminal_width(), 132);
        assert_eq!(crate::pipeline::terminal::terminal_height(), 43);
    }
}

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Global
    ForceQuit,    // Ctrl+C
    RequestClear, // Ctrl+L
    FocusPicker,  // Tab
    Escape,
    Resize,

    // Editing
    Submit,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    CursorUp,
    CursorDown,

    // Conversation scrolling
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Wait up to `timeout` for the next event.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            // Windows reports releases too
            if key_event.kind != KeyEventKind::Press {
                return None;
            }
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
            match key_event.code {
                KeyCode::Char('c') if ctrl => Some(TuiEvent::ForceQuit),
                KeyCode::Char('l') if ctrl => Some(TuiEvent::RequestClear),
                // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
                KeyCode::Char('j') if ctrl => Some(TuiEvent::InputChar('\n')),
                KeyCode::Char(_) if ctrl => None,
                KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
                KeyCode::Enter => Some(TuiEvent::Submit),
                KeyCode::Tab => Some(TuiEvent::FocusPicker),
                KeyCode::Esc => Some(TuiEvent::Escape),
                KeyCode::Backspace => Some(TuiEvent::Backspace),
                KeyCode::Delete => Some(TuiEvent::Delete),
                KeyCode::Left => Some(TuiEvent::CursorLeft),
                KeyCode::Right => Some(TuiEvent::CursorRight),
                KeyCode::Home => Some(TuiEvent::CursorHome),
                KeyCode::End => Some(TuiEvent::CursorEnd),
                KeyCode::Up => Some(TuiEvent::CursorUp),
                KeyCode::Down => Some(TuiEvent::CursorDown),
                KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
                KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
                _ => None,
            }
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_control_shortcuts() {
        assert_eq!(
            translate(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(TuiEvent::ForceQuit)
        );
        assert_eq!(
            translate(key(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Some(TuiEvent::RequestClear)
        );
        assert_eq!(
            translate(key(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(TuiEvent::InputChar('\n'))
        );
        assert_eq!(translate(key(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            translate(key(KeyCode::Char('F'), KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('F'))
        );
        assert_eq!(
            translate(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(TuiEvent::Submit)
        );
        assert_eq!(
            translate(key(KeyCode::Tab, KeyModifiers::NONE)),
            Some(TuiEvent::FocusPicker)
        );
    }

    #[test]
    fn test_key_release_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(translate(release), None);
    }

    #[test]
    fn test_paste_and_resize() {
        assert_eq!(
            translate(Event::Paste("v = u\n+ at".into())),
            Some(TuiEvent::Paste("v = u\n+ at".into()))
        );
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
    }
}

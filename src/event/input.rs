//! Input event types wrapping crossterm for decoupling.
//!
//! Defines [`Key`] and [`InputEvent`]. Crossterm events are converted with
//! [`InputEvent::from_crossterm`] so widgets never depend on crossterm directly
//! and can be driven by scripted keys in headless tests.

use crossterm::event::{
    Event as CtEvent, KeyCode as CtKeyCode, KeyEvent as CtKeyEvent, KeyEventKind,
    KeyModifiers as CtModifiers,
};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
///
/// Control-modified letters arrive as [`Key::Ctrl`] so that edit strategies
/// never mistake them for printable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl Key {
    /// Whether this key carries a printable character.
    #[inline]
    pub fn is_printable(self) -> bool {
        matches!(self, Key::Char(c) if !c.is_control())
    }

    /// The printable character carried by this key, if any.
    #[inline]
    pub fn printable(self) -> Option<char> {
        match self {
            Key::Char(c) if !c.is_control() => Some(c),
            _ => None,
        }
    }

    /// Map a crossterm key event to a `Key`.
    ///
    /// Returns `None` for release events and for key codes that have no
    /// counterpart here (media keys, modifiers pressed alone, ...).
    pub fn from_crossterm(ct: CtKeyEvent) -> Option<Key> {
        if ct.kind == KeyEventKind::Release {
            return None;
        }
        let key = match ct.code {
            CtKeyCode::Char(c) if ct.modifiers.contains(CtModifiers::CONTROL) => {
                Key::Ctrl(c.to_ascii_lowercase())
            }
            CtKeyCode::Char(c) => Key::Char(c),
            CtKeyCode::Enter => Key::Enter,
            CtKeyCode::Esc => Key::Escape,
            CtKeyCode::Tab => Key::Tab,
            CtKeyCode::BackTab => Key::BackTab,
            CtKeyCode::Backspace => Key::Backspace,
            CtKeyCode::Delete => Key::Delete,
            CtKeyCode::Left => Key::Left,
            CtKeyCode::Right => Key::Right,
            CtKeyCode::Up => Key::Up,
            CtKeyCode::Down => Key::Down,
            CtKeyCode::Home => Key::Home,
            CtKeyCode::End => Key::End,
            CtKeyCode::PageUp => Key::PageUp,
            CtKeyCode::PageDown => Key::PageDown,
            CtKeyCode::F(n) => Key::F(n),
            _ => return None,
        };
        Some(key)
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Input events the screen reacts to while a widget waits for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Resize { width: u16, height: u16 },
}

impl InputEvent {
    /// Convert a crossterm `Event`, dropping the ones the widgets ignore
    /// (mouse, focus, paste).
    pub fn from_crossterm(ct: CtEvent) -> Option<InputEvent> {
        match ct {
            CtEvent::Key(ke) => Key::from_crossterm(ke).map(InputEvent::Key),
            CtEvent::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            _ => None,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

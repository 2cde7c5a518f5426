#![forbid(unsafe_code)]

//! Keyboard event types.
//!
//! Only the keys the board reacts to are modeled. All types derive `Clone`,
//! `PartialEq`, and `Eq` for use in tests and pattern matching.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0;
        const CTRL  = 1 << 0;
        const ALT   = 1 << 1;
        const SHIFT = 1 << 2;
    }
}

/// Key codes the board dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// The popup-close key.
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.code == KeyCode::Escape
    }

    /// The comment-submit chord.
    #[must_use]
    pub fn is_ctrl_enter(&self) -> bool {
        self.code == KeyCode::Enter && self.ctrl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_detection() {
        assert!(KeyEvent::new(KeyCode::Escape).is_escape());
        assert!(!KeyEvent::new(KeyCode::Enter).is_escape());
    }

    #[test]
    fn ctrl_enter_requires_both() {
        let plain_enter = KeyEvent::new(KeyCode::Enter);
        assert!(!plain_enter.is_ctrl_enter());

        let chord = KeyEvent::new(KeyCode::Enter).with_modifiers(Modifiers::CTRL);
        assert!(chord.is_ctrl_enter());

        let ctrl_char = KeyEvent::new(KeyCode::Char('j')).with_modifiers(Modifiers::CTRL);
        assert!(!ctrl_char.is_ctrl_enter());
    }
}

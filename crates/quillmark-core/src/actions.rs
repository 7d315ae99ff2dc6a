//! Input events the shortcut engine reacts to.
//!
//! These mirror the handful of editor events a host forwards: a character
//! about to be inserted, Return, a named key command, Tab and plain-text
//! paste. Everything else stays with the host.

use smol_str::SmolStr;

/// Modifier key state for a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    /// Whether any modifier is held.
    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.meta
    }
}

/// Named key commands the host may forward.
pub mod commands {
    pub const BACKSPACE: &str = "backspace";
}

/// An editor event forwarded by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A character is about to be inserted at the selection.
    BeforeInput(char),
    /// Return was pressed.
    Return(Modifiers),
    /// A named key command, e.g. `"backspace"`.
    KeyCommand(SmolStr),
    /// Tab, or Shift+Tab when `shift` is set.
    Tab { shift: bool },
    /// Pasted text. `html` is set when the clipboard carried rich content.
    Paste { text: String, html: Option<String> },
}

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// The new state was committed; suppress the host's default behaviour.
    Handled,
    /// Nothing was committed; let the host do what it normally does.
    NotHandled,
}

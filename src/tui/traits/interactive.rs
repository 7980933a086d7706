//! Keyboard input routing for focused panels

use crossterm::event::KeyEvent;

/// Whether a panel consumed a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    No,
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        if handled {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Panels that handle keyboard input while focused
///
/// Keys a panel does not handle bubble up to the App, which owns the
/// actions that change navigation (descend, ascend, option toggles).
pub trait Interactive {
    fn handle_key(&mut self, key: KeyEvent) -> Handled;

    /// Key hints shown in the status bar while focused
    fn focus_hint(&self) -> &'static str;
}

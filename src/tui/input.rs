// Input handling with per-key behaviors
//
// Most terminals never send key release events, so a held action key arrives
// as a stream of presses. Action keys are debounced; movement keys are not.

use crossterm::event::KeyCode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default debounce window for action keys
const ACTION_DEBOUNCE: Duration = Duration::from_millis(150);

/// How a key reacts to repeated presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBehavior {
    /// Every press triggers (selection movement, scrolling)
    Repeat,

    /// A press triggers only if the window has passed since the last trigger
    /// or the key was released in between (navigation, toggles, quit)
    Debounced(Duration),
}

impl KeyBehavior {
    pub fn action() -> Self {
        Self::Debounced(ACTION_DEBOUNCE)
    }
}

/// Tracks press state per key and decides whether a press triggers
pub struct InputHandler {
    /// Last trigger time of keys currently considered held
    last_triggered: HashMap<KeyCode, Instant>,
    behaviors: HashMap<KeyCode, KeyBehavior>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            last_triggered: HashMap::new(),
            behaviors: HashMap::new(),
        }
    }

    pub fn configure_keys(&mut self, keys: &[KeyCode], behavior: KeyBehavior) {
        for key in keys {
            self.behaviors.insert(*key, behavior);
        }
    }

    /// Handle a key press at `now`; returns true if the action should run
    pub fn press_at(&mut self, key: KeyCode, now: Instant) -> bool {
        let behavior = self
            .behaviors
            .get(&key)
            .copied()
            .unwrap_or(KeyBehavior::Repeat);

        match behavior {
            KeyBehavior::Repeat => true,
            KeyBehavior::Debounced(window) => match self.last_triggered.get(&key) {
                Some(last) if now.duration_since(*last) < window => false,
                _ => {
                    self.last_triggered.insert(key, now);
                    true
                }
            },
        }
    }

    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.press_at(key, Instant::now())
    }

    /// A release ends the debounce window early
    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.last_triggered.remove(&key);
    }

    /// Key map used by the browser
    pub fn with_default_config() -> Self {
        let mut handler = Self::new();

        handler.configure_keys(
            &[
                KeyCode::Up,
                KeyCode::Down,
                KeyCode::Char('j'),
                KeyCode::Char('k'),
                KeyCode::PageUp,
                KeyCode::PageDown,
                KeyCode::Home,
                KeyCode::End,
            ],
            KeyBehavior::Repeat,
        );

        handler.configure_keys(
            &[
                // Navigation
                KeyCode::Enter,
                KeyCode::Right,
                KeyCode::Left,
                KeyCode::Backspace,
                KeyCode::Char('l'),
                KeyCode::Char('h'),
                // Focus
                KeyCode::Tab,
                KeyCode::BackTab,
                // Display options
                KeyCode::Char('1'),
                KeyCode::Char('2'),
                KeyCode::Char('3'),
                // Refresh control
                KeyCode::Char('+'),
                KeyCode::Char('-'),
                KeyCode::Char('r'),
                // Clipboard, logs, quit
                KeyCode::Char('y'),
                KeyCode::Char('L'),
                KeyCode::Char('q'),
                KeyCode::Char('Q'),
            ],
            KeyBehavior::action(),
        );

        handler
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::with_default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounced_key_triggers_once_per_window() {
        let mut handler = InputHandler::new();
        handler.configure_keys(&[KeyCode::Enter], KeyBehavior::action());
        let start = Instant::now();

        assert!(handler.press_at(KeyCode::Enter, start));
        assert!(!handler.press_at(KeyCode::Enter, start + Duration::from_millis(40)));
        assert!(!handler.press_at(KeyCode::Enter, start + Duration::from_millis(149)));
        assert!(handler.press_at(KeyCode::Enter, start + Duration::from_millis(150)));
    }

    #[test]
    fn release_reopens_debounced_key() {
        let mut handler = InputHandler::new();
        handler.configure_keys(&[KeyCode::Char('q')], KeyBehavior::action());
        let start = Instant::now();

        assert!(handler.press_at(KeyCode::Char('q'), start));
        handler.handle_key_release(KeyCode::Char('q'));
        assert!(handler.press_at(KeyCode::Char('q'), start + Duration::from_millis(5)));
    }

    #[test]
    fn movement_keys_always_trigger() {
        let mut handler = InputHandler::with_default_config();
        let start = Instant::now();
        for ms in 0..5 {
            assert!(handler.press_at(KeyCode::Down, start + Duration::from_millis(ms)));
        }
        // Unconfigured keys repeat as well
        assert!(handler.press_at(KeyCode::Char('z'), start));
        assert!(handler.press_at(KeyCode::Char('z'), start));
    }
}

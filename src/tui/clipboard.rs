//! System clipboard access for the `y` key
//!
//! A fresh `arboard` handle is opened per copy; the TUI copies rarely and a
//! long-lived handle can hold the X11 selection open after exit.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Put `text` on the system clipboard
///
/// Fails without a display server (headless Linux, plain SSH sessions).
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    Clipboard::new()
        .context("Failed to access clipboard")?
        .set_text(text)
        .context("Failed to set clipboard text")
}

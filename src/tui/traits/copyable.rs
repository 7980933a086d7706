//! Clipboard content for the `y` key

/// Panels that can put their selection on the clipboard
pub trait Copyable {
    /// Text for the clipboard; `None` when nothing is selected
    fn copy_text(&self) -> Option<String>;

    /// What was copied, for the confirmation toast
    fn copy_description(&self) -> &'static str;
}

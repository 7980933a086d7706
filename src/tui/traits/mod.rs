//! Capability traits for TUI panels
//!
//! App routes keys to the focused panel and asks it for clipboard text;
//! panels declare what they support by implementing these traits.
//!
//! - [`Interactive`] - panels that handle keyboard input
//! - [`Scrollable`] / [`Selectable`] - panels with a viewport (and a cursor)
//! - [`Copyable`] - panels that provide clipboard content

mod copyable;
mod interactive;
mod scrollable;

pub use copyable::Copyable;
pub use interactive::{Handled, Interactive};
pub use scrollable::{Scrollable, Selectable};

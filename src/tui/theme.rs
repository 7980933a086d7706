// Color themes for the TUI
//
// A theme is a flat palette; components read the colors they need.
// Header rows normally carry their own color (fields cyan, properties green);
// the mono theme flattens them.

use crate::logging::LogLevel;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    pub title: Color,
    pub border: Color,
    /// Border of the focused panel
    pub highlight: Color,
    pub background: Color,
    pub foreground: Color,
    /// Leaf rows and secondary text
    pub muted: Color,
    /// Values that can be descended into
    pub navigable: Color,
    pub null_value: Color,
    pub breadcrumb: Color,
    pub status_bar: Color,

    pub selection: Color,
    pub selection_fg: Color,

    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,

    /// Use the header's own color for header rows
    pub colored_headers: bool,
    pub border_type: BorderType,
}

impl Theme {
    pub const NAMES: [&'static str; 3] = ["dark", "light", "mono"];

    /// Load theme by name; unknown names fall back to dark
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "mono" => Self::mono(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!("Unknown theme '{}', using dark", other);
                Self::dark()
            }
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            title: Color::Cyan,
            border: Color::DarkGray,
            highlight: Color::Yellow,
            background: Color::Reset,
            foreground: Color::White,
            muted: Color::Gray,
            navigable: Color::LightBlue,
            null_value: Color::DarkGray,
            breadcrumb: Color::LightCyan,
            status_bar: Color::Green,
            selection: Color::Rgb(0x3a, 0x3d, 0x4a),
            selection_fg: Color::White,
            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Green,
            log_debug: Color::Gray,
            colored_headers: true,
            border_type: BorderType::Rounded,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            title: Color::Blue,
            border: Color::Gray,
            highlight: Color::Magenta,
            background: Color::Reset,
            foreground: Color::Black,
            muted: Color::DarkGray,
            navigable: Color::Blue,
            null_value: Color::Gray,
            breadcrumb: Color::Blue,
            status_bar: Color::DarkGray,
            selection: Color::Rgb(0xd0, 0xd7, 0xe5),
            selection_fg: Color::Black,
            log_error: Color::Red,
            log_warn: Color::Rgb(0xb0, 0x6d, 0x00),
            log_info: Color::Rgb(0x00, 0x70, 0x20),
            log_debug: Color::DarkGray,
            colored_headers: true,
            border_type: BorderType::Plain,
        }
    }

    pub fn mono() -> Self {
        Self {
            name: "mono",
            title: Color::Reset,
            border: Color::Reset,
            highlight: Color::Reset,
            background: Color::Reset,
            foreground: Color::Reset,
            muted: Color::Reset,
            navigable: Color::Reset,
            null_value: Color::Reset,
            breadcrumb: Color::Reset,
            status_bar: Color::Reset,
            selection: Color::Reset,
            selection_fg: Color::Reset,
            log_error: Color::Reset,
            log_warn: Color::Reset,
            log_info: Color::Reset,
            log_debug: Color::Reset,
            colored_headers: false,
            border_type: BorderType::Plain,
        }
    }

    /// Style for the selected row; mono relies on reverse video
    pub fn selected_style(&self) -> Style {
        if self.colored_headers {
            Style::default()
                .fg(self.selection_fg)
                .bg(self.selection)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }

    /// Color of a header row
    pub fn header(&self, own: Color) -> Color {
        if self.colored_headers {
            own
        } else {
            self.foreground
        }
    }

    pub fn log_level(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Error => self.log_error,
            LogLevel::Warn => self.log_warn,
            LogLevel::Info => self.log_info,
            LogLevel::Debug | LogLevel::Trace => self.log_debug,
        }
    }

    pub fn border(&self, focused: bool) -> Color {
        if focused {
            self.highlight
        } else {
            self.border
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

//! Logs panel component
//!
//! Shows the tail of the in-memory log buffer, color-coded by level. Follows
//! new entries until the user scrolls up.

use super::scrollbar::render_scrollbar;
use crate::logging::LogEntry;
use crate::tui::scroll::ScrollState;
use crate::tui::theme::Theme;
use crate::tui::traits::{Copyable, Handled, Interactive, Scrollable};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub struct LogsPanel {
    scroll: ScrollState,
    /// Lines drawn last frame, for the clipboard
    drawn: Vec<String>,
}

impl LogsPanel {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::new(),
            drawn: Vec::new(),
        }
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        entries: &[LogEntry],
        theme: &Theme,
        focused: bool,
    ) {
        self.scroll
            .update_dimensions(entries.len(), area.height.saturating_sub(2) as usize);
        let (start, end) = self.scroll.visible_range();
        let visible = &entries[start..end];
        self.drawn = visible.iter().map(LogEntry::to_line).collect();

        let items: Vec<ListItem> = visible
            .iter()
            .zip(&self.drawn)
            .map(|(entry, line)| {
                ListItem::new(line.as_str()).style(Style::default().fg(theme.log_level(entry.level)))
            })
            .collect();

        let title = if self.scroll.auto_follow {
            " Logs "
        } else {
            " Logs [scroll] "
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border(focused)))
                .title(title),
        );
        f.render_widget(list, area);
        render_scrollbar(f, area, &self.scroll);
    }
}

impl Default for LogsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrollable for LogsPanel {
    fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    fn scroll_state_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }
}

impl Interactive for LogsPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            KeyCode::Home => self.scroll_to_top(),
            KeyCode::End => self.scroll_to_bottom(),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> &'static str {
        "↑↓ scroll  End follow  y copy"
    }
}

impl Copyable for LogsPanel {
    fn copy_text(&self) -> Option<String> {
        (!self.drawn.is_empty()).then(|| self.drawn.join("\n"))
    }

    fn copy_description(&self) -> &'static str {
        "visible log lines"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use chrono::Local;
    use ratatui::{backend::TestBackend, Terminal};

    fn entries(n: usize) -> Vec<LogEntry> {
        (0..n)
            .map(|i| LogEntry {
                timestamp: Local::now(),
                level: LogLevel::Info,
                target: "objscope".into(),
                message: format!("line {}", i),
            })
            .collect()
    }

    fn draw(panel: &mut LogsPanel, entries: &[LogEntry]) {
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        terminal
            .draw(|f| panel.render(f, f.area(), entries, &Theme::dark(), true))
            .unwrap();
    }

    #[test]
    fn follows_tail_until_scrolled() {
        let mut panel = LogsPanel::new();
        draw(&mut panel, &entries(10));
        assert!(panel.copy_text().unwrap().ends_with("line 9"));

        panel.handle_key(KeyEvent::from(KeyCode::Up));
        draw(&mut panel, &entries(12));
        let text = panel.copy_text().unwrap();
        assert!(text.ends_with("line 8"));

        panel.handle_key(KeyEvent::from(KeyCode::End));
        draw(&mut panel, &entries(12));
        assert!(panel.copy_text().unwrap().ends_with("line 11"));
    }
}

//! Breadcrumb bar component
//!
//! One crumb per path entry, root first. With focus, `←→` pick a crumb and
//! the App ascends to it on Enter. When the path is wider than the bar the
//! leading crumbs collapse into an ellipsis.

use crate::tui::theme::Theme;
use crate::tui::traits::{Copyable, Handled, Interactive};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const SEPARATOR: &str = " › ";
const ELLIPSIS: &str = "…";

pub struct BreadcrumbBar {
    crumbs: Vec<String>,
    selected: usize,
}

impl BreadcrumbBar {
    pub fn new() -> Self {
        Self {
            crumbs: Vec::new(),
            selected: 0,
        }
    }

    /// Replace the crumbs; a changed path moves the cursor to the last crumb
    pub fn sync(&mut self, crumbs: Vec<String>) {
        if crumbs != self.crumbs {
            self.selected = crumbs.len().saturating_sub(1);
            self.crumbs = crumbs;
        }
    }

    pub fn crumbs(&self) -> &[String] {
        &self.crumbs
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Index of the first crumb that fits in `width`, keeping the tail
    fn first_visible(&self, width: usize) -> usize {
        let mut used = 0;
        for (i, crumb) in self.crumbs.iter().enumerate().rev() {
            let cost = crumb.width() + if used == 0 { 0 } else { SEPARATOR.width() };
            if used + cost > width && used > 0 {
                return i + 1;
            }
            used += cost;
        }
        0
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, focused: bool) {
        let width = (area.width as usize).saturating_sub(2);
        let mut first = self.first_visible(width);
        if first > 0 {
            // Leave room for the ellipsis
            first = self.first_visible(width.saturating_sub(ELLIPSIS.width() + SEPARATOR.width()));
        }

        let mut spans = Vec::new();
        if first > 0 {
            spans.push(Span::styled(ELLIPSIS, Style::default().fg(theme.muted)));
            spans.push(Span::styled(SEPARATOR, Style::default().fg(theme.muted)));
        }
        for (i, crumb) in self.crumbs.iter().enumerate().skip(first) {
            if i > first {
                spans.push(Span::styled(SEPARATOR, Style::default().fg(theme.muted)));
            }
            let mut style = Style::default().fg(theme.breadcrumb);
            if i + 1 == self.crumbs.len() {
                style = style.add_modifier(Modifier::BOLD);
            }
            if focused && i == self.selected {
                style = theme.selected_style();
            }
            spans.push(Span::styled(crumb.as_str(), style));
        }

        let bar = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border(focused)))
                .title(" Path "),
        );
        f.render_widget(bar, area);
    }
}

impl Default for BreadcrumbBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Interactive for BreadcrumbBar {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        let last = self.crumbs.len().saturating_sub(1);
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => self.selected = (self.selected + 1).min(last),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = last,
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> &'static str {
        "←→ pick  ⏎ go to"
    }
}

impl Copyable for BreadcrumbBar {
    fn copy_text(&self) -> Option<String> {
        (!self.crumbs.is_empty()).then(|| self.crumbs.join(SEPARATOR))
    }

    fn copy_description(&self) -> &'static str {
        "path"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(crumbs: &[&str]) -> BreadcrumbBar {
        let mut bar = BreadcrumbBar::new();
        bar.sync(crumbs.iter().map(|c| c.to_string()).collect());
        bar
    }

    #[test]
    fn path_change_selects_last_crumb() {
        let mut bar = bar(&["Objects", "0: World"]);
        assert_eq!(bar.selected(), 1);
        bar.handle_key(KeyEvent::from(KeyCode::Left));
        assert_eq!(bar.selected(), 0);

        // Same path keeps the cursor
        bar.sync(vec!["Objects".into(), "0: World".into()]);
        assert_eq!(bar.selected(), 0);

        bar.sync(vec!["Objects".into(), "0: World".into(), "World.entities".into()]);
        assert_eq!(bar.selected(), 2);
    }

    #[test]
    fn cursor_stays_within_path() {
        let mut bar = bar(&["Objects", "a", "b"]);
        bar.handle_key(KeyEvent::from(KeyCode::Right));
        assert_eq!(bar.selected(), 2);
        bar.handle_key(KeyEvent::from(KeyCode::Home));
        bar.handle_key(KeyEvent::from(KeyCode::Left));
        assert_eq!(bar.selected(), 0);
        assert_eq!(bar.handle_key(KeyEvent::from(KeyCode::Enter)), Handled::No);
    }

    #[test]
    fn narrow_bar_keeps_the_tail() {
        let bar = bar(&["Objects", "0: World", "World.entities", "3: Entity"]);
        // "World.entities › 3: Entity" is 26 columns
        assert_eq!(bar.first_visible(26), 2);
        assert_eq!(bar.first_visible(200), 0);
        // The last crumb is always shown
        assert_eq!(bar.first_visible(1), 3);
        assert_eq!(
            bar.copy_text().as_deref(),
            Some("Objects › 0: World › World.entities › 3: Entity")
        );
    }
}

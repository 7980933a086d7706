//! Field list component
//!
//! Shows the children of the current path entry as a two-column list:
//! label on the left, rendered value on the right. Header rows are bold in
//! their own color, rows that cannot be opened are dimmed.
//!
//! Only the rows inside the viewport are turned into [`RowView`]s, so value
//! rendering cost follows the screen height rather than the child count.

use super::scrollbar::render_scrollbar;
use crate::browser::session::NULL_TEXT;
use crate::browser::{Element, RowView};
use crate::tui::scroll::ScrollState;
use crate::tui::theme::Theme;
use crate::tui::traits::{Copyable, Handled, Interactive, Scrollable, Selectable};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub struct FieldList {
    scroll: ScrollState,
    selected: usize,
    count: usize,

    /// Views of the rows drawn last frame, the first one at `drawn_from`
    drawn: Vec<RowView>,
    drawn_from: usize,
}

impl FieldList {
    pub fn new() -> Self {
        Self {
            scroll: ScrollState::manual(),
            selected: 0,
            count: 0,
            drawn: Vec::new(),
            drawn_from: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the cursor; clamped against the rows on the next sync
    pub fn select_row(&mut self, index: usize) {
        self.selected = index;
    }

    /// Sync with the current row count and viewport height
    pub fn sync(&mut self, count: usize, viewport: usize) {
        self.count = count;
        self.selected = self.selected.min(count.saturating_sub(1));
        self.scroll.update_dimensions(count, viewport);
        self.scroll.reveal(self.selected);
    }

    /// View of the selected row as last drawn
    pub fn selected_view(&self) -> Option<&RowView> {
        self.selected
            .checked_sub(self.drawn_from)
            .and_then(|i| self.drawn.get(i))
    }

    /// Render `rows`; `view` is called only for rows inside the viewport
    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        rows: &[Element],
        view: impl Fn(&Element) -> RowView,
        theme: &Theme,
        focused: bool,
    ) {
        self.sync(rows.len(), area.height.saturating_sub(2) as usize);
        let (start, end) = self.scroll.visible_range();
        self.drawn = rows[start..end].iter().map(view).collect();
        self.drawn_from = start;

        let label_width = self
            .drawn
            .iter()
            .filter(|row| row.header_color.is_none())
            .map(|row| row.label.width())
            .max()
            .unwrap_or(0)
            .min(area.width as usize / 2);

        let items: Vec<ListItem> = self
            .drawn
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let line = row_line(row, label_width, theme);
                if start + i == self.selected {
                    let style = if focused {
                        theme.selected_style()
                    } else {
                        Style::default().add_modifier(Modifier::UNDERLINED)
                    };
                    ListItem::new(line).style(style)
                } else {
                    ListItem::new(line)
                }
            })
            .collect();

        let title = if rows.is_empty() {
            " Members (empty) ".to_string()
        } else {
            format!(" Members {}/{} ", self.selected + 1, rows.len())
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

impl Default for FieldList {
    fn default() -> Self {
        Self::new()
    }
}

fn row_line<'a>(row: &'a RowView, label_width: usize, theme: &Theme) -> Line<'a> {
    if let Some(color) = row.header_color {
        return Line::from(Span::styled(
            row.label.as_str(),
            Style::default()
                .fg(theme.header(color))
                .add_modifier(Modifier::BOLD),
        ));
    }

    let padding = label_width.saturating_sub(row.label.width());
    let label = format!("{}{}  ", row.label, " ".repeat(padding));
    let value_style = if row.value == NULL_TEXT {
        Style::default().fg(theme.null_value)
    } else if row.navigable {
        Style::default().fg(theme.navigable)
    } else {
        Style::default().fg(theme.muted)
    };
    let marker = if row.navigable { " ›" } else { "" };

    Line::from(vec![
        Span::styled(label, Style::default().fg(theme.foreground)),
        Span::styled(single_line(&row.value), value_style),
        Span::styled(marker, Style::default().fg(theme.muted)),
    ])
}

/// Keep multi-line values on their row
fn single_line(value: &str) -> String {
    value.replace('\r', "").replace('\n', "⏎")
}

impl Scrollable for FieldList {
    fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    fn scroll_state_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }
}

impl Selectable for FieldList {
    fn selected_index(&self) -> usize {
        self.selected
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.count.saturating_sub(1));
        self.scroll.reveal(self.selected);
    }

    fn item_count(&self) -> usize {
        self.count
    }
}

impl Interactive for FieldList {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> &'static str {
        "↑↓ select  ⏎/→ open  ← back  y copy"
    }
}

impl Copyable for FieldList {
    fn copy_text(&self) -> Option<String> {
        self.selected_view()
            .filter(|row| row.header_color.is_none())
            .map(|row| row.value.clone())
    }

    fn copy_description(&self) -> &'static str {
        "value"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::obj;
    use ratatui::{backend::TestBackend, style::Color, Terminal};

    fn rows(n: usize) -> Vec<Element> {
        let mut rows = vec![Element::header("Fields", Color::Cyan)];
        rows.extend((0..n).map(|i| Element::value(format!("f{}", i), Some(obj(i as i64)))));
        rows
    }

    fn view(element: &Element) -> RowView {
        RowView {
            label: element.label().to_string(),
            value: if element.is_header() {
                String::new()
            } else {
                format!("v-{}", element.label())
            },
            navigable: false,
            header_color: element.header_color(),
        }
    }

    fn draw(list: &mut FieldList, rows: &[Element], height: u16) {
        let backend = TestBackend::new(40, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| list.render(f, f.area(), rows, view, &Theme::dark(), true))
            .unwrap();
    }

    #[test]
    fn only_visible_rows_are_viewed() {
        let rows = rows(50);
        let mut list = FieldList::new();
        draw(&mut list, &rows, 12);
        assert_eq!(list.drawn.len(), 10);
        assert_eq!(list.drawn_from, 0);

        list.select(30);
        draw(&mut list, &rows, 12);
        assert_eq!(list.drawn_from, 21);
        assert_eq!(list.selected_view().map(|v| v.label.as_str()), Some("f29"));
    }

    #[test]
    fn selection_clamps_when_rows_shrink() {
        let mut list = FieldList::new();
        draw(&mut list, &rows(20), 30);
        list.select_last();
        assert_eq!(list.selected(), 20);

        draw(&mut list, &rows(3), 30);
        assert_eq!(list.selected(), 3);
        draw(&mut list, &[], 30);
        assert_eq!(list.selected(), 0);
        assert!(list.selected_view().is_none());
    }

    #[test]
    fn copies_values_but_not_headers() {
        let rows = rows(2);
        let mut list = FieldList::new();
        draw(&mut list, &rows, 10);
        assert_eq!(list.copy_text(), None);

        list.handle_key(KeyEvent::from(KeyCode::Down));
        assert_eq!(list.copy_text().as_deref(), Some("v-f0"));
        assert_eq!(
            list.handle_key(KeyEvent::from(KeyCode::Enter)),
            Handled::No
        );
    }

    #[test]
    fn multi_line_values_stay_on_one_row() {
        assert_eq!(single_line("a\r\nb"), "a⏎b");
    }
}

// Title bar component
//
// App name and a one-line summary of what is being browsed.

use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let title_text = match app.world_summary() {
        Some(summary) => format!(" objscope ──── {}", summary),
        None => " objscope".to_string(),
    };

    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.title))
                .title_top(Line::from(" q quit ").right_aligned()),
        );

    f.render_widget(title, area);
}

// Status bar component
//
// Shows where the session is (depth, row count), how it refreshes and which
// member categories are on, plus key hints for the focused panel.

use crate::browser::DisplayOptions;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Below this width the key hints are dropped
const HINT_MIN_WIDTH: u16 = 100;

/// Short labels for the option toggles, in key order 1, 2, 3
const OPTION_LABELS: [&str; 3] = ["fields", "props", "backing"];

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let text = status_text(app, area.width >= HINT_MIN_WIDTH);
    let status = Paragraph::new(text)
        .style(Style::default().fg(app.theme.status_bar))
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}

pub(crate) fn status_text(app: &App, with_hint: bool) -> String {
    let session = &app.session;
    let freshness = if session.is_fresh() { "" } else { "*" };
    let mut text = format!(
        " depth {} │ {} rows │ every {:.2}s{} │ {} │ {}",
        session.depth(),
        app.rows.len(),
        session.interval().as_secs_f64(),
        freshness,
        options_text(session.options()),
        app.uptime(),
    );
    if with_hint {
        text.push_str(&format!(" │ {}: {}", app.focus.name(), app.focus_hint()));
    }
    text
}

fn options_text(options: DisplayOptions) -> String {
    OPTION_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mark = if options.is_set_index(i) { "✓" } else { "✗" };
            format!("{}:{}{}", i + 1, label, mark)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_toggles_are_listed_in_key_order() {
        assert_eq!(
            options_text(DisplayOptions::default()),
            "1:fields✓ 2:props✓ 3:backing✗"
        );
        assert_eq!(
            options_text(DisplayOptions::BACKING_FIELDS),
            "1:fields✗ 2:props✗ 3:backing✓"
        );
    }
}

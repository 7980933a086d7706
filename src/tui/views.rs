// Screen layout and per-frame rendering
//
// ┌ title ─────────────────────────┐
// ├ path ──────────────────────────┤
// │ members             │ logs     │  (logs only when toggled on)
// ├ status ────────────────────────┘

use super::app::App;
use super::components::{status_bar, title_bar};
use super::scroll::Focus;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

/// Width below which the logs panel stacks under the members
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 120;

/// Render one frame; expects `App::prepare_frame` to have run
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(f.area());

    title_bar::render(f, chunks[0], app);
    app.breadcrumb
        .render(f, chunks[1], &app.theme, app.focus == Focus::Breadcrumb);

    let (fields_area, logs_area) = split_content(chunks[2], app.show_logs);
    render_fields(f, fields_area, app);
    if let Some(area) = logs_area {
        let entries = app.log_buffer.get_all();
        app.logs_panel
            .render(f, area, &entries, &app.theme, app.focus == Focus::Logs);
    }

    status_bar::render(f, chunks[3], app);

    if let Some(toast) = &app.toast {
        toast.render(f, f.area(), &app.theme);
    }
}

fn split_content(area: Rect, show_logs: bool) -> (Rect, Option<Rect>) {
    if !show_logs {
        return (area, None);
    }
    let direction = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let chunks = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);
    (chunks[0], Some(chunks[1]))
}

fn render_fields(f: &mut Frame, area: Rect, app: &mut App) {
    // Split borrows: the list is mutated while the session renders values
    let App {
        browser,
        session,
        rows,
        fields,
        theme,
        focus,
        ..
    } = app;
    let view = |element: &crate::browser::Element| session.row_view(browser, element);
    fields.render(f, area, &rows[..], view, theme, *focus == Focus::Fields);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::Browser;
    use crate::config::Config;
    use crate::demo;
    use crate::logging::LogBuffer;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn renders_demo_world_and_descends() {
        let browser = Browser::new();
        let world = demo::populate(&browser, 3, 11);
        let mut app = App::new(browser, &Config::default(), LogBuffer::new()).with_world(world);
        app.toggle_logs();

        let mut terminal = Terminal::new(TestBackend::new(130, 30)).unwrap();
        app.prepare_frame(Instant::now()).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("objscope"));
        assert!(text.contains("Objects"));
        assert!(text.contains("World (tick 0, 3 entities)"));
        assert!(text.contains("Logs"));

        app.activate();
        app.apply_pending().unwrap();
        app.prepare_frame(Instant::now()).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Fields"));
        assert!(text.contains("entities"));
        assert!(text.contains("depth 2"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let browser = Browser::new();
        demo::populate(&browser, 2, 1);
        let mut app = App::new(browser, &Config::default(), LogBuffer::new());
        app.show_toast("copied value");
        let mut terminal = Terminal::new(TestBackend::new(12, 6)).unwrap();
        app.prepare_frame(Instant::now()).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
    }
}

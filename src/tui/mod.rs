// TUI module - Terminal User Interface
//
// Sets up the terminal, runs the event loop and restores the terminal on the
// way out. The loop waits on three sources:
// - keyboard and mouse input
// - a render tick, which drives the children refresh throttle
// - the demo world's step interval

pub mod app;
pub mod clipboard;
pub mod components;
pub mod input;
pub mod scroll;
pub mod theme;
pub mod traits;
pub mod views;

use crate::browser::Browser;
use crate::config::Config;
use crate::demo::World;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};
use traits::Handled;

/// Redraw cadence (20 FPS); also the finest refresh the throttle can see
const RENDER_TICK: Duration = Duration::from_millis(50);

/// Run the browser until the user quits
///
/// Browsing contract violations surface here as errors after the terminal
/// has been restored.
pub async fn run_tui(
    browser: Browser,
    world: Rc<World>,
    config: Config,
    log_buffer: LogBuffer,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let step = Duration::from_millis(config.demo.step_millis);
    let mut app = App::new(browser, &config, log_buffer).with_world(world);
    tracing::info!(
        "Browsing with refresh every {:?}, world step {:?}",
        app.session.interval(),
        step
    );

    let result = run_event_loop(&mut terminal, &mut app, step).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    if let Err(err) = &result {
        tracing::error!("Browser stopped: {:#}", err);
    }
    result
}

/// Frame loop: prepare, draw, apply queued navigation, then wait
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    step: Duration,
) -> Result<()> {
    let mut render_interval = tokio::time::interval(RENDER_TICK);
    let mut step_interval = tokio::time::interval(step);
    // The first tick of an interval completes immediately
    step_interval.tick().await;

    loop {
        app.prepare_frame(Instant::now())
            .context("Failed to read children")?;
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        if app.apply_pending().context("Navigation failed")? {
            // Show the new location without waiting for the next tick
            continue;
        }

        if app.should_quit {
            break;
        }

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            _ = render_interval.tick() => {}

            _ = step_interval.tick() => {
                app.step_world(step);
            }
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: global keys, then the focused panel, then navigation
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    match key_event.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {}
        KeyEventKind::Release => {
            app.handle_key_release(key_event.code);
            return;
        }
    }

    let key = key_event.code;
    if !app.handle_key_press(key) {
        return;
    }

    if handle_global_keys(app, &key_event) {
        return;
    }

    if app.dispatch_to_focused(key_event) == Handled::Yes {
        return;
    }

    match key {
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.activate(),
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
            app.queue(app::Action::AscendOne)
        }
        _ => {}
    }
}

/// Handle global keys - returns true if handled
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Char(c @ '1'..='3') => app.toggle_option(c as usize - '1' as usize),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_refresh(true),
        KeyCode::Char('-') => app.adjust_refresh(false),
        KeyCode::Char('r') => app.force_refresh(),
        KeyCode::Char('L') => app.toggle_logs(),
        KeyCode::Char('y') => copy_focused(app),
        _ => return false,
    }
    true
}

fn copy_focused(app: &mut App) {
    let Some((text, what)) = app.copy_focused() else {
        app.show_toast("Nothing to copy");
        return;
    };
    match clipboard::copy_to_clipboard(&text) {
        Ok(()) => app.show_toast(format!("✓ Copied {}", what)),
        Err(err) => {
            tracing::warn!("Clipboard copy failed: {:#}", err);
            app.show_toast("✗ Failed to copy");
        }
    }
}

/// Mouse wheel scrolls the focused panel
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    let key = match mouse_event.kind {
        MouseEventKind::ScrollUp => KeyCode::Up,
        MouseEventKind::ScrollDown => KeyCode::Down,
        _ => return,
    };
    app.dispatch_to_focused(KeyEvent::new(key, KeyModifiers::NONE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{obj, ObjectList};
    use app::Action;

    fn app() -> App {
        let browser = Browser::new();
        let list = ObjectList::new();
        list.push(Some(obj(5_u8)));
        browser.add(obj(list));
        let mut app = App::new(browser, &Config::default(), LogBuffer::new());
        app.prepare_frame(Instant::now()).unwrap();
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
        // Release so debounced keys can be pressed again right away
        let mut release = KeyEvent::new(code, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        handle_key_event(app, release);
    }

    #[test]
    fn enter_queues_descend_and_backspace_queues_ascend() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.apply_pending().unwrap());
        assert_eq!(app.session.depth(), 2);

        app.prepare_frame(Instant::now()).unwrap();
        press(&mut app, KeyCode::Backspace);
        app.apply_pending().unwrap();
        assert_eq!(app.session.depth(), 1);
    }

    #[test]
    fn breadcrumb_focus_claims_arrow_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.apply_pending().unwrap();
        app.prepare_frame(Instant::now()).unwrap();

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, scroll::Focus::Breadcrumb);
        // Left moves the crumb cursor instead of ascending
        press(&mut app, KeyCode::Left);
        assert!(!app.apply_pending().unwrap());
        assert_eq!(app.breadcrumb.selected(), 0);

        press(&mut app, KeyCode::Enter);
        app.apply_pending().unwrap();
        assert_eq!(app.session.depth(), 1);
    }

    #[test]
    fn global_keys_toggle_state() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert!(app
            .session
            .options()
            .contains(crate::browser::DisplayOptions::BACKING_FIELDS));
        press(&mut app, KeyCode::Char('L'));
        assert!(app.show_logs);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
        app.queue(Action::AscendOne);
        assert!(app.apply_pending().unwrap());
    }
}

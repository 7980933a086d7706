// TUI application state
//
// App owns the browser, one session over it and the panels. Each frame runs
// in three steps:
//   1. prepare_frame: time check, then refill the children if stale
//   2. draw (views::draw)
//   3. apply_pending: navigation queued by input since the last frame
// Navigation invalidates the children, so its result shows on the next frame.

use super::components::{BreadcrumbBar, FieldList, LogsPanel, Toast};
use super::input::InputHandler;
use super::scroll::Focus;
use super::theme::Theme;
use super::traits::{Copyable, Interactive};
use crate::browser::{BrowseError, Browser, DisplayOptions, Element, Session};
use crate::config::{clamp_refresh, Config};
use crate::demo::World;
use crate::logging::LogBuffer;
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Step applied by `+`/`-` to the refresh interval, in seconds
const REFRESH_STEP_SECS: f64 = 0.05;

/// Navigation requested by input, applied after the frame is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Open row `index` of the rows on screen
    Descend(usize),
    /// Go back to breadcrumb `index` (0 is the root)
    AscendTo(usize),
    /// Go back one level
    AscendOne,
}

pub struct App {
    pub browser: Browser,
    pub session: Session,
    world: Option<Rc<World>>,

    /// Rows of the current path entry as materialized this frame
    pub rows: Rc<[Element]>,

    pub focus: Focus,
    pub fields: FieldList,
    pub breadcrumb: BreadcrumbBar,
    pub logs_panel: LogsPanel,
    pub log_buffer: LogBuffer,
    pub show_logs: bool,

    pub theme: Theme,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    pub start_time: Instant,

    pending: VecDeque<Action>,
    /// Selected row of each ancestor, restored when ascending
    selection_stack: Vec<usize>,
    input_handler: InputHandler,
}

impl App {
    pub fn new(browser: Browser, config: &Config, log_buffer: LogBuffer) -> Self {
        let session = Session::new(
            &browser,
            config.browser.display,
            config.browser.refresh_duration(),
        );
        Self {
            browser,
            session,
            world: None,
            rows: Rc::from(Vec::new()),
            focus: Focus::default(),
            fields: FieldList::new(),
            breadcrumb: BreadcrumbBar::new(),
            logs_panel: LogsPanel::new(),
            log_buffer,
            show_logs: config.show_logs,
            theme: Theme::by_name(&config.theme),
            toast: None,
            should_quit: false,
            start_time: Instant::now(),
            pending: VecDeque::new(),
            selection_stack: Vec::new(),
            input_handler: InputHandler::default(),
        }
    }

    /// Attach the live world shown in the title bar
    pub fn with_world(mut self, world: Rc<World>) -> Self {
        self.world = Some(world);
        self
    }

    pub fn world(&self) -> Option<&Rc<World>> {
        self.world.as_ref()
    }

    // ─────────────────────────────────────────────────────────────
    // Frame cycle
    // ─────────────────────────────────────────────────────────────

    /// Time check and refill before drawing
    pub fn prepare_frame(&mut self, now: Instant) -> Result<(), BrowseError> {
        if self.session.tick(now) {
            tracing::trace!("Children stale after {:?}", self.session.interval());
        }
        self.rows = self.session.children(&self.browser, now)?;
        let crumbs = self.session.breadcrumbs(&self.browser);
        self.breadcrumb.sync(crumbs);
        if let Some(toast) = &self.toast {
            if toast.is_expired(now) {
                self.toast = None;
            }
        }
        Ok(())
    }

    /// Apply queued navigation; returns true if any action ran
    ///
    /// Stops after the first action that changes the path: the rest stay
    /// queued until the new location's rows have been read. Contract
    /// violations end the session. A row that turned out not to be
    /// navigable is reported with a toast instead.
    pub fn apply_pending(&mut self) -> Result<bool, BrowseError> {
        let mut applied = false;
        while let Some(action) = self.pending.pop_front() {
            applied = true;
            match action {
                Action::Descend(index) => {
                    match self.session.activate_row(&self.browser, index) {
                        Ok(()) => {
                            self.selection_stack.push(index);
                            self.fields.select_row(0);
                            break;
                        }
                        Err(BrowseError::NotNavigable { label }) => {
                            self.show_toast(format!("'{}' has nothing to open", label));
                        }
                        Err(err) => return Err(err),
                    }
                }
                Action::AscendTo(index) => {
                    self.session.activate_breadcrumb(index)?;
                    self.restore_selection();
                    break;
                }
                Action::AscendOne => {
                    if self.session.ascend_one()? {
                        self.restore_selection();
                        break;
                    }
                }
            }
        }
        Ok(applied)
    }

    /// Queue navigation for after the next draw
    pub fn queue(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    fn restore_selection(&mut self) {
        let entry = self.session.depth() - 1;
        let selected = self.selection_stack.get(entry).copied().unwrap_or(0);
        self.selection_stack.truncate(entry);
        self.fields.select_row(selected);
    }

    /// Advance the demo world by one step
    pub fn step_world(&mut self, dt: Duration) {
        if let Some(world) = &self.world {
            world.step(dt.as_secs_f32());
        }
    }

    // ─────────────────────────────────────────────────────────────
    // User commands
    // ─────────────────────────────────────────────────────────────

    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.input_handler.handle_key_press(key)
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.input_handler.handle_key_release(key);
    }

    /// Route a key to the focused panel
    pub fn dispatch_to_focused(&mut self, key: KeyEvent) -> super::traits::Handled {
        match self.focus {
            Focus::Fields => self.fields.handle_key(key),
            Focus::Breadcrumb => self.breadcrumb.handle_key(key),
            Focus::Logs => self.logs_panel.handle_key(key),
        }
    }

    pub fn focus_hint(&self) -> &'static str {
        match self.focus {
            Focus::Fields => self.fields.focus_hint(),
            Focus::Breadcrumb => self.breadcrumb.focus_hint(),
            Focus::Logs => self.logs_panel.focus_hint(),
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next(self.show_logs);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev(self.show_logs);
    }

    /// Enter, → or l: open the selected row, or jump to the selected crumb
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Fields if !self.rows.is_empty() => {
                self.queue(Action::Descend(self.fields.selected()))
            }
            Focus::Breadcrumb => self.queue(Action::AscendTo(self.breadcrumb.selected())),
            _ => {}
        }
    }

    /// Flip display option `index` (0 fields, 1 properties, 2 backing fields)
    pub fn toggle_option(&mut self, index: usize) {
        let options = self.session.options();
        let enabled = !options.is_set_index(index);
        self.session.set_options(options.with_index(index, enabled));
        let name = DisplayOptions::NAMES.get(index).copied().unwrap_or("?");
        let state = if enabled { "on" } else { "off" };
        tracing::debug!("Display option {} {}", name, state);
        self.show_toast(format!("{} {}", name, state));
    }

    /// Lengthen (`+`) or shorten (`-`) the refresh interval
    pub fn adjust_refresh(&mut self, longer: bool) {
        let current = self.session.interval().as_secs_f64();
        let delta = if longer { REFRESH_STEP_SECS } else { -REFRESH_STEP_SECS };
        let next = clamp_refresh(((current + delta) * 100.0).round() / 100.0);
        self.session.set_interval(Duration::from_secs_f64(next));
        self.show_toast(format!("refresh every {:.2}s", next));
    }

    pub fn force_refresh(&mut self) {
        self.session.refresh();
        // Metadata may be stale if types were registered since
        self.browser.clear_field_cache();
        tracing::debug!("Forced refresh");
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        if !self.show_logs && self.focus == Focus::Logs {
            self.focus = Focus::Fields;
        }
    }

    /// Clipboard text from the focused panel, with a description
    pub fn copy_focused(&self) -> Option<(String, &'static str)> {
        let panel: &dyn Copyable = match self.focus {
            Focus::Fields => &self.fields,
            Focus::Breadcrumb => &self.breadcrumb,
            Focus::Logs => &self.logs_panel,
        };
        panel
            .copy_text()
            .map(|text| (text, panel.copy_description()))
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message, Instant::now()));
    }

    // ─────────────────────────────────────────────────────────────
    // Display helpers
    // ─────────────────────────────────────────────────────────────

    pub fn uptime(&self) -> String {
        let seconds = self.start_time.elapsed().as_secs();
        format!(
            "{:02}:{:02}:{:02}",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    }

    pub fn world_summary(&self) -> Option<String> {
        self.world.as_ref().map(|world| {
            format!(
                "world tick {} · {} entities",
                world.tick.get(),
                world.entities.len()
            )
        })
    }
}

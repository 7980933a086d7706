// Scroll state shared by the TUI panels
//
// Each panel owns a ScrollState. Lists with a selection keep the selected
// row inside the viewport; the logs panel follows new entries instead.

/// Scroll state for a single panel
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Index of the first visible item
    offset: usize,

    /// Number of items in content
    total: usize,

    /// Number of items visible in viewport
    viewport: usize,

    /// Whether new content keeps the view pinned to the bottom
    /// Scrolling up disables this; scrolling to the bottom re-enables it
    pub auto_follow: bool,
}

impl ScrollState {
    /// Scroll state that follows new content (logs)
    pub fn new() -> Self {
        Self {
            offset: 0,
            total: 0,
            viewport: 0,
            auto_follow: true,
        }
    }

    /// Scroll state driven by a selection (field list)
    pub fn manual() -> Self {
        Self {
            offset: 0,
            total: 0,
            viewport: 0,
            auto_follow: false,
        }
    }

    /// Update content and viewport dimensions; call each render frame
    pub fn update_dimensions(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;

        if self.auto_follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Move the viewport the least amount needed to show `index`
    pub fn reveal(&mut self, index: usize) {
        if self.viewport == 0 {
            return;
        }
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + self.viewport {
            self.offset = index + 1 - self.viewport;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_up(&mut self) {
        if self.offset > 0 {
            self.offset -= 1;
            self.auto_follow = false;
        }
    }

    pub fn scroll_down(&mut self) {
        if self.offset < self.max_offset() {
            self.offset += 1;
        }
        if self.offset >= self.max_offset() {
            self.auto_follow = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
        self.auto_follow = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.auto_follow = true;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Visible range as (start, end), end exclusive
    pub fn visible_range(&self) -> (usize, usize) {
        let start = self.offset.min(self.total);
        let end = (self.offset + self.viewport).min(self.total);
        (start, end)
    }

    /// Whether content overflows the viewport
    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.viewport
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}

/// Panels that can hold keyboard focus, in Tab order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Fields,
    Breadcrumb,
    Logs,
}

impl Focus {
    /// Next panel in Tab order; logs are skipped while hidden
    pub fn next(self, logs_visible: bool) -> Self {
        match self {
            Focus::Fields => Focus::Breadcrumb,
            Focus::Breadcrumb if logs_visible => Focus::Logs,
            Focus::Breadcrumb | Focus::Logs => Focus::Fields,
        }
    }

    /// Previous panel in Tab order
    pub fn prev(self, logs_visible: bool) -> Self {
        match self {
            Focus::Fields if logs_visible => Focus::Logs,
            Focus::Fields => Focus::Breadcrumb,
            Focus::Breadcrumb => Focus::Fields,
            Focus::Logs => Focus::Breadcrumb,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Focus::Fields => "fields",
            Focus::Breadcrumb => "path",
            Focus::Logs => "logs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_follow_tracks_growing_content() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(10, 5);
        assert_eq!(scroll.offset(), 5);

        scroll.update_dimensions(15, 5);
        assert_eq!(scroll.offset(), 10);

        scroll.scroll_up();
        assert!(!scroll.auto_follow);
        scroll.update_dimensions(20, 5);
        assert_eq!(scroll.offset(), 9);

        scroll.scroll_to_bottom();
        assert!(scroll.auto_follow);
        assert_eq!(scroll.visible_range(), (15, 20));
    }

    #[test]
    fn reveal_keeps_selection_in_view() {
        let mut scroll = ScrollState::manual();
        scroll.update_dimensions(100, 10);
        assert_eq!(scroll.offset(), 0);

        scroll.reveal(9);
        assert_eq!(scroll.offset(), 0);
        scroll.reveal(10);
        assert_eq!(scroll.offset(), 1);
        scroll.reveal(99);
        assert_eq!(scroll.visible_range(), (90, 100));
        scroll.reveal(3);
        assert_eq!(scroll.offset(), 3);
    }

    #[test]
    fn shrinking_content_clamps_offset() {
        let mut scroll = ScrollState::manual();
        scroll.update_dimensions(50, 10);
        scroll.reveal(49);
        scroll.update_dimensions(12, 10);
        assert_eq!(scroll.offset(), 2);
        assert_eq!(scroll.visible_range(), (2, 12));
    }

    #[test]
    fn focus_cycle_skips_hidden_logs() {
        assert_eq!(Focus::Fields.next(false), Focus::Breadcrumb);
        assert_eq!(Focus::Breadcrumb.next(false), Focus::Fields);
        assert_eq!(Focus::Breadcrumb.next(true), Focus::Logs);
        assert_eq!(Focus::Logs.next(true), Focus::Fields);
        assert_eq!(Focus::Fields.prev(true), Focus::Logs);
        assert_eq!(Focus::Fields.prev(false), Focus::Breadcrumb);
    }
}

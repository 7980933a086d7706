//! Scrolling and selection over a [`ScrollState`]

use crate::tui::scroll::ScrollState;

/// Panels with a scrolling viewport
///
/// Implementors expose their `ScrollState`; movement delegates to it.
pub trait Scrollable {
    fn scroll_state(&self) -> &ScrollState;

    fn scroll_state_mut(&mut self) -> &mut ScrollState;

    fn scroll_up(&mut self) {
        self.scroll_state_mut().scroll_up();
    }

    fn scroll_down(&mut self) {
        self.scroll_state_mut().scroll_down();
    }

    fn scroll_to_top(&mut self) {
        self.scroll_state_mut().scroll_to_top();
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_state_mut().scroll_to_bottom();
    }
}

/// Scrollable panels with a cursor row
///
/// Moving the cursor keeps it inside the viewport.
pub trait Selectable: Scrollable {
    fn selected_index(&self) -> usize;

    /// Set the cursor; implementors clamp to the item count
    fn select(&mut self, index: usize);

    fn item_count(&self) -> usize;

    fn select_next(&mut self) {
        let current = self.selected_index();
        if current + 1 < self.item_count() {
            self.select(current + 1);
        }
    }

    fn select_previous(&mut self) {
        let current = self.selected_index();
        if current > 0 {
            self.select(current - 1);
        }
    }

    fn select_first(&mut self) {
        self.select(0);
    }

    fn select_last(&mut self) {
        let count = self.item_count();
        self.select(count.saturating_sub(1));
    }

    /// Move the cursor by one viewport
    fn page_down(&mut self) {
        let page = self.scroll_state().viewport().max(1);
        self.select(self.selected_index() + page);
    }

    fn page_up(&mut self) {
        let page = self.scroll_state().viewport().max(1);
        self.select(self.selected_index().saturating_sub(page));
    }
}

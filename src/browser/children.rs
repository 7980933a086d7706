//! Single-slot, time-throttled cache of the current parent's children

use super::element::Element;
use super::error::BrowseError;
use super::handler::TypeHandler;
use super::object::ObjectRef;
use super::options::DisplayOptions;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Materialized children of the current parent
///
/// Valid only for the parent that was current when it was filled; callers
/// invalidate it on every navigation change. The time trigger
/// ([`ChildrenCache::should_refresh`]) bounds staleness for a live graph.
pub struct ChildrenCache {
    entries: Rc<[Element]>,
    clean: bool,
    filled_at: Option<Instant>,
    interval: Duration,
    fills: u64,
}

impl ChildrenCache {
    pub fn new(interval: Duration) -> Self {
        Self {
            entries: Rc::from(Vec::new()),
            clean: false,
            filled_at: None,
            interval,
            fills: 0,
        }
    }

    /// Children of `parent`, recomputed through `handler` when dirty
    pub fn get(
        &mut self,
        parent: &ObjectRef,
        handler: &dyn TypeHandler,
        options: DisplayOptions,
        now: Instant,
    ) -> Result<Rc<[Element]>, BrowseError> {
        if !self.clean {
            let entries: Vec<Element> = handler.children(parent, options)?.collect();
            tracing::trace!(
                "Recomputed {} children of {}",
                entries.len(),
                parent.type_key()
            );
            self.entries = Rc::from(entries);
            self.clean = true;
            self.filled_at = Some(now);
            self.fills += 1;
        }
        Ok(self.entries.clone())
    }

    /// Last materialized list, even if it has since been invalidated
    pub fn entries(&self) -> Rc<[Element]> {
        self.entries.clone()
    }

    /// Invalidate if the interval has elapsed since the last fill
    pub fn should_refresh(&mut self, now: Instant) -> bool {
        match self.filled_at {
            Some(filled_at)
                if self.clean && now.saturating_duration_since(filled_at) >= self.interval =>
            {
                self.invalidate();
                true
            }
            _ => false,
        }
    }

    pub fn invalidate(&mut self) {
        self.clean = false;
    }

    pub fn is_clean(&self) -> bool {
        self.clean
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// How many times the list has been recomputed
    pub fn fills(&self) -> u64 {
        self.fills
    }
}

//! Browsing session: navigation path and children cache driven per tick
//!
//! A session borrows its [`Browser`] on each call, so several sessions can
//! share one browser (and its resolution and metadata caches).

use super::children::ChildrenCache;
use super::element::Element;
use super::error::BrowseError;
use super::navigation::NavigationState;
use super::options::DisplayOptions;
use super::Browser;
use ratatui::style::Color;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Text shown for null values
pub const NULL_TEXT: &str = "null";

/// What the presentation layer needs to draw one row
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub label: String,
    /// Rendered value; empty for headers
    pub value: String,
    /// Whether activating the row descends into it
    pub navigable: bool,
    pub header_color: Option<Color>,
}

pub struct Session {
    nav: NavigationState,
    cache: ChildrenCache,
    options: DisplayOptions,
    /// Bumped on every path change
    generation: u64,
    /// Generation the cached rows were produced for
    rows_generation: Option<u64>,
}

impl Session {
    pub fn new(browser: &Browser, options: DisplayOptions, interval: Duration) -> Self {
        Self {
            nav: NavigationState::new(browser.root_element()),
            cache: ChildrenCache::new(interval),
            options,
            generation: 0,
            rows_generation: None,
        }
    }

    /// Time trigger; returns true when the children were invalidated
    pub fn tick(&mut self, now: Instant) -> bool {
        self.cache.should_refresh(now)
    }

    /// Children of the current path entry, recomputed only when stale
    pub fn children(&mut self, browser: &Browser, now: Instant) -> Result<Rc<[Element]>, BrowseError> {
        let current = self.nav.current().clone();
        let parent = current.object().ok_or_else(|| BrowseError::NotNavigable {
            label: current.label().to_string(),
        })?;
        let handler = browser.handler_for(Some(parent));
        let rows = self.cache.get(parent, handler.as_ref(), self.options, now)?;
        self.rows_generation = Some(self.generation);
        Ok(rows)
    }

    /// Descend into row `index` of the last materialized children
    ///
    /// The rows must have been read with [`Session::children`] since the path
    /// last changed. Rows that are only past their refresh interval still count.
    pub fn activate_row(&mut self, browser: &Browser, index: usize) -> Result<(), BrowseError> {
        if self.rows_generation != Some(self.generation) {
            return Err(BrowseError::StaleRows);
        }
        let rows = self.cache.entries();
        let element = rows.get(index).ok_or(BrowseError::RowOutOfRange {
            index,
            len: rows.len(),
        })?;
        if !self.is_navigable(browser, element) {
            return Err(BrowseError::NotNavigable {
                label: element.label().to_string(),
            });
        }
        self.nav.descend(element.clone())?;
        self.path_changed();
        tracing::debug!("Descended into '{}' (depth {})", element.label(), self.nav.depth());
        Ok(())
    }

    /// Ascend to breadcrumb entry `index` (0 is the root)
    pub fn activate_breadcrumb(&mut self, index: usize) -> Result<(), BrowseError> {
        let depth = self.nav.depth();
        let target = self
            .nav
            .get(index)
            .and_then(|element| element.object().cloned())
            .ok_or(BrowseError::BreadcrumbOutOfRange { index, len: depth })?;
        self.nav.ascend(&target)?;
        self.path_changed();
        tracing::debug!("Ascended to depth {}", self.nav.depth());
        Ok(())
    }

    /// Ascend one level; returns false at the root
    pub fn ascend_one(&mut self) -> Result<bool, BrowseError> {
        if self.nav.is_at_root() {
            return Ok(false);
        }
        self.activate_breadcrumb(self.nav.depth() - 2)?;
        Ok(true)
    }

    /// Breadcrumb text of every path entry, computed once per element
    pub fn breadcrumbs(&self, browser: &Browser) -> Vec<String> {
        let path: Vec<&Element> = self.nav.path().collect();
        path.iter()
            .enumerate()
            .map(|(index, element)| {
                let parent = index
                    .checked_sub(1)
                    .and_then(|i| path.get(i))
                    .and_then(|p| p.object());
                let text = element.breadcrumb_with(|| match parent {
                    Some(parent) => browser
                        .handler_for(Some(parent))
                        .breadcrumb_text(parent, element),
                    None => element.label().to_string(),
                });
                text.to_string()
            })
            .collect()
    }

    /// Display data for one row
    pub fn row_view(&self, browser: &Browser, element: &Element) -> RowView {
        let value = match (element.is_header(), element.object()) {
            (true, _) => String::new(),
            (false, Some(object)) => browser.handler_for(Some(object)).string_value(object),
            (false, None) => NULL_TEXT.to_string(),
        };
        RowView {
            label: element.label().to_string(),
            value,
            navigable: self.is_navigable(browser, element),
            header_color: element.header_color(),
        }
    }

    fn path_changed(&mut self) {
        self.generation += 1;
        self.cache.invalidate();
    }

    fn is_navigable(&self, browser: &Browser, element: &Element) -> bool {
        element
            .object()
            .is_some_and(|object| !browser.handler_for(Some(object)).is_leaf(object))
    }

    pub fn depth(&self) -> usize {
        self.nav.depth()
    }

    pub fn options(&self) -> DisplayOptions {
        self.options
    }

    pub fn set_options(&mut self, options: DisplayOptions) {
        if options != self.options {
            self.options = options;
            self.cache.invalidate();
        }
    }

    pub fn interval(&self) -> Duration {
        self.cache.interval()
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.cache.set_interval(interval);
    }

    /// Force the next read to recompute
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }

    pub fn is_fresh(&self) -> bool {
        self.cache.is_clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::collections::ObjectList;
    use crate::browser::handler::{Children, TypeHandler};
    use crate::browser::object::{downcast, obj, Object, ObjectRef, TypeKey};
    use crate::browser::types::TypeInfo;
    use std::cell::Cell;

    struct Node {
        name: String,
        child: Option<ObjectRef>,
        score: i64,
    }
    impl Object for Node {
        fn describe(&self) -> String {
            format!("Node({})", self.name)
        }
    }

    /// Wraps the object handler's breadcrumb text and counts calls
    struct CountingCrumbs {
        calls: Rc<Cell<u32>>,
    }

    impl TypeHandler for CountingCrumbs {
        fn is_leaf(&self, _value: &ObjectRef) -> bool {
            false
        }

        fn breadcrumb_text(&self, _parent: &ObjectRef, element: &Element) -> String {
            self.calls.set(self.calls.get() + 1);
            format!("crumb:{}", element.label())
        }

        fn children<'a>(
            &'a self,
            value: &'a ObjectRef,
            _options: DisplayOptions,
        ) -> Result<Children<'a>, BrowseError> {
            let node = downcast::<Node>(value);
            let child = node.and_then(|n| n.child.clone());
            Ok(Box::new(std::iter::once(Element::value("child", child))))
        }
    }

    fn chain(depth: usize) -> ObjectRef {
        let mut child: Option<ObjectRef> = None;
        for level in (0..depth).rev() {
            child = Some(obj(Node {
                name: format!("n{}", level),
                child,
                score: level as i64,
            }));
        }
        child.unwrap_or_else(|| obj(0_u8))
    }

    fn browser() -> Browser {
        let browser = Browser::new();
        browser.register_type(
            TypeInfo::class::<Node>()
                .field("name", |n: &Node| n.name.clone())
                .field_ref::<Node>("child", |n: &Node| n.child.clone())
                .field("score", |n: &Node| n.score)
                .build(),
        );
        browser
    }

    fn row_index(rows: &[Element], label: &str) -> usize {
        rows.iter().position(|e| e.label() == label).unwrap()
    }

    #[test]
    fn root_lists_roots_by_index() {
        let browser = browser();
        browser.add(chain(2));
        browser.add(obj(String::from("plain")));
        let mut session = Session::new(&browser, DisplayOptions::default(), Duration::from_secs(1));
        let rows = session.children(&browser, Instant::now()).unwrap();
        let views: Vec<RowView> = rows.iter().map(|e| session.row_view(&browser, e)).collect();
        assert_eq!(views[0].label, "0");
        assert_eq!(views[0].value, "Node(n0)");
        assert!(views[0].navigable);
        assert_eq!(views[1].value, "plain");
        assert!(!views[1].navigable);
    }

    #[test]
    fn descend_and_breadcrumbs() {
        let browser = browser();
        browser.add(chain(3));
        let mut session = Session::new(&browser, DisplayOptions::FIELDS, Duration::from_secs(1));
        let now = Instant::now();

        session.children(&browser, now).unwrap();
        session.activate_row(&browser, 0).unwrap();
        let rows = session.children(&browser, now).unwrap();
        let labels: Vec<&str> = rows.iter().map(|e| e.label()).collect();
        assert_eq!(labels, vec!["Fields", "child", "name", "score"]);

        session.activate_row(&browser, row_index(&rows, "child")).unwrap();
        assert_eq!(
            session.breadcrumbs(&browser),
            vec!["Objects", "0: Node", "Node.child"]
        );
    }

    #[test]
    fn navigation_invalidates_before_interval() {
        let browser = browser();
        browser.add(chain(2));
        let mut session = Session::new(&browser, DisplayOptions::FIELDS, Duration::from_secs(60));
        let now = Instant::now();

        let at_root = session.children(&browser, now).unwrap();
        session.activate_row(&browser, 0).unwrap();
        let inside = session.children(&browser, now).unwrap();
        assert!(!Rc::ptr_eq(&at_root, &inside));

        assert!(session.ascend_one().unwrap());
        let back = session.children(&browser, now).unwrap();
        assert!(!Rc::ptr_eq(&inside, &back));
        assert!(!session.ascend_one().unwrap());
    }

    #[test]
    fn rows_from_another_path_entry_are_rejected() {
        let browser = browser();
        browser.add(chain(3));
        let mut session = Session::new(&browser, DisplayOptions::FIELDS, Duration::from_secs(1));
        let now = Instant::now();

        session.children(&browser, now).unwrap();
        session.activate_row(&browser, 0).unwrap();
        let inside = session.children(&browser, now).unwrap();
        let child = row_index(&inside, "child");
        assert!(session.ascend_one().unwrap());

        // The cached rows still belong to the node we just left
        assert_eq!(
            session.activate_row(&browser, child),
            Err(BrowseError::StaleRows)
        );
        assert_eq!(session.breadcrumbs(&browser), vec!["Objects"]);

        let roots = session.children(&browser, now).unwrap();
        assert_eq!(roots.len(), 1);
        session.activate_row(&browser, 0).unwrap();
        assert_eq!(session.breadcrumbs(&browser), vec!["Objects", "0: Node"]);
    }

    #[test]
    fn rows_past_their_interval_can_still_be_activated() {
        let browser = browser();
        browser.add(chain(2));
        let mut session = Session::new(&browser, DisplayOptions::FIELDS, Duration::from_millis(10));
        let start = Instant::now();

        session.children(&browser, start).unwrap();
        assert!(session.tick(start + Duration::from_millis(20)));
        assert!(!session.is_fresh());
        session.activate_row(&browser, 0).unwrap();
        assert_eq!(session.depth(), 2);
    }

    #[test]
    fn rejects_headers_nulls_leaves_and_bad_indices() {
        let browser = browser();
        browser.add(chain(1));
        let mut session = Session::new(&browser, DisplayOptions::FIELDS, Duration::from_secs(1));
        let now = Instant::now();
        session.children(&browser, now).unwrap();
        session.activate_row(&browser, 0).unwrap();
        let rows = session.children(&browser, now).unwrap();

        let header = session.activate_row(&browser, row_index(&rows, "Fields"));
        assert!(matches!(header, Err(BrowseError::NotNavigable { .. })));
        let null = session.activate_row(&browser, row_index(&rows, "child"));
        assert!(matches!(null, Err(BrowseError::NotNavigable { .. })));
        let leaf = session.activate_row(&browser, row_index(&rows, "score"));
        assert!(matches!(leaf, Err(BrowseError::NotNavigable { .. })));
        assert_eq!(
            session.activate_row(&browser, 99),
            Err(BrowseError::RowOutOfRange { index: 99, len: 4 })
        );
        assert_eq!(
            session.activate_breadcrumb(5),
            Err(BrowseError::BreadcrumbOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(session.depth(), 2);
    }

    #[test]
    fn breadcrumb_text_computed_once_per_element() {
        let browser = browser();
        let calls = Rc::new(Cell::new(0));
        browser.register_handler(
            TypeKey::of::<Node>(),
            Rc::new(CountingCrumbs {
                calls: calls.clone(),
            }),
        );
        let root = chain(4);
        let list = ObjectList::new();
        list.push(Some(root));
        browser.add(obj(list));

        let mut session = Session::new(&browser, DisplayOptions::default(), Duration::from_millis(1));
        let mut now = Instant::now();
        for _ in 0..3 {
            session.children(&browser, now).unwrap();
            session.activate_row(&browser, 0).unwrap();
        }
        session.children(&browser, now).unwrap();
        session.activate_row(&browser, 0).unwrap();
        for _ in 0..5 {
            now += Duration::from_millis(5);
            session.tick(now);
            session.children(&browser, now).unwrap();
            session.breadcrumbs(&browser);
        }
        // Root crumb is preset, the list and first node use other handlers,
        // the two entries entered from a Node count once each.
        assert_eq!(session.depth(), 5);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn option_changes_invalidate() {
        let browser = browser();
        let mut session = Session::new(&browser, DisplayOptions::FIELDS, Duration::from_secs(1));
        session.children(&browser, Instant::now()).unwrap();
        assert!(session.is_fresh());
        session.set_options(DisplayOptions::FIELDS);
        assert!(session.is_fresh());
        session.set_options(DisplayOptions::PROPERTIES);
        assert!(!session.is_fresh());
    }
}

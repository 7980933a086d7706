//! Navigation path: synthetic root plus the chain of entered elements

use super::element::Element;
use super::error::BrowseError;
use super::object::same_object;
use super::object::ObjectRef;

/// Breadcrumb path, never empty
///
/// Entries hold strong references, so an ancestor removed from the graph
/// stays reachable from the breadcrumb until it is ascended past.
pub struct NavigationState {
    root: Element,
    trail: Vec<Element>,
}

impl NavigationState {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            trail: Vec::new(),
        }
    }

    /// Last entry of the path
    pub fn current(&self) -> &Element {
        self.trail.last().unwrap_or(&self.root)
    }

    /// Parent of the current entry, `None` at the root
    pub fn parent(&self) -> Option<&Element> {
        match self.trail.len() {
            0 => None,
            1 => Some(&self.root),
            n => self.trail.get(n - 2),
        }
    }

    /// Entries from the root to the current one
    pub fn path(&self) -> impl Iterator<Item = &Element> {
        std::iter::once(&self.root).chain(self.trail.iter())
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        match index {
            0 => Some(&self.root),
            n => self.trail.get(n - 1),
        }
    }

    /// Number of entries including the root
    pub fn depth(&self) -> usize {
        self.trail.len() + 1
    }

    pub fn is_at_root(&self) -> bool {
        self.trail.is_empty()
    }

    /// Append `child`; headers and null rows cannot be entered
    pub fn descend(&mut self, child: Element) -> Result<(), BrowseError> {
        if child.object().is_none() {
            return Err(BrowseError::NotNavigable {
                label: child.label().to_string(),
            });
        }
        self.trail.push(child);
        Ok(())
    }

    /// Truncate the path so the entry holding `target` is last
    ///
    /// Matches by reference identity, searching from the end. A target that
    /// is not on the path leaves it untouched.
    pub fn ascend(&mut self, target: &ObjectRef) -> Result<(), BrowseError> {
        let matches = |element: &Element| element.object().is_some_and(|o| same_object(o, target));
        if let Some(position) = self.trail.iter().rposition(matches) {
            self.trail.truncate(position + 1);
            return Ok(());
        }
        if matches(&self.root) {
            self.trail.clear();
            return Ok(());
        }
        Err(BrowseError::NotInPath)
    }
}

//! Sequence objects: lists, the root set and singleton lists

use super::element::Element;
use super::error::ReadError;
use super::object::{obj, same_object, Object, ObjectRef};
use std::cell::{Cell, RefCell};
use std::fmt;

/// One item produced by an [`Enumerable`]
pub enum Member {
    /// A plain value; the enumerable handler labels it by position
    Value(Option<ObjectRef>),
    /// Already wrapped by the producer; passed through unchanged
    Element(Element),
}

/// Sequence capability, resolved through `dyn Enumerable` registrations
pub trait Enumerable {
    /// Members in iteration order
    fn members(&self) -> Box<dyn Iterator<Item = Member> + '_>;
}

/// Interior-mutable ordered list of nullable references
#[derive(Default)]
pub struct ObjectList {
    items: RefCell<Vec<Option<ObjectRef>>>,
}

impl ObjectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: Option<ObjectRef>) {
        self.items.borrow_mut().push(item);
    }

    /// Remove the first entry that is `item` (by identity)
    pub fn remove(&self, item: &ObjectRef) -> bool {
        let mut items = self.items.borrow_mut();
        let position = items
            .iter()
            .position(|entry| entry.as_ref().is_some_and(|e| same_object(e, item)));
        match position {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn retain(&self, keep: impl FnMut(&Option<ObjectRef>) -> bool) {
        self.items.borrow_mut().retain(keep);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Copy of the current entries
    pub fn snapshot(&self) -> Vec<Option<ObjectRef>> {
        self.items.borrow().clone()
    }
}

impl Enumerable for ObjectList {
    fn members(&self) -> Box<dyn Iterator<Item = Member> + '_> {
        // Snapshot so the list may change while the sequence is consumed
        Box::new(self.snapshot().into_iter().map(Member::Value))
    }
}

impl Object for ObjectList {
    fn describe(&self) -> String {
        format!("ObjectList[{}]", self.len())
    }

    fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        Some(self)
    }
}

/// The root collection wrapped by the synthetic root element
///
/// Insertion order is preserved; nothing else is promised.
#[derive(Default)]
pub struct RootSet {
    roots: ObjectList,
}

impl RootSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, root: ObjectRef) {
        tracing::debug!("Added root {}", root.type_key());
        self.roots.push(Some(root));
    }

    /// Remove `root` by identity; returns whether it was present
    pub fn remove(&self, root: &ObjectRef) -> bool {
        let removed = self.roots.remove(root);
        if removed {
            tracing::debug!("Removed root {}", root.type_key());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl Enumerable for RootSet {
    fn members(&self) -> Box<dyn Iterator<Item = Member> + '_> {
        self.roots.members()
    }
}

impl Object for RootSet {
    fn describe(&self) -> String {
        format!("Roots[{}]", self.len())
    }

    fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        Some(self)
    }
}

type Accessor = Box<dyn Fn() -> Result<Option<ObjectRef>, ReadError>>;

struct SingletonEntry {
    name: String,
    accessor: Accessor,
    failure: Cell<Option<&'static str>>,
}

impl SingletonEntry {
    fn read(&self) -> Option<ObjectRef> {
        if let Some(kind) = self.failure.get() {
            return Some(obj(kind));
        }
        match (self.accessor)() {
            Ok(value) => value,
            Err(e) => {
                let kind = e.kind_name();
                tracing::warn!("Singleton '{}' failed: {} ({})", self.name, e, kind);
                self.failure.set(Some(kind));
                Some(obj(kind))
            }
        }
    }
}

/// Named global instances, listed by name
///
/// Each accessor runs on every enumeration until it fails once; from then on
/// the entry shows the failure's kind name and the accessor is not called again.
pub struct SingletonList {
    title: String,
    entries: Vec<SingletonEntry>,
}

impl SingletonList {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Add an accessor, keeping entries sorted by name
    pub fn with(
        mut self,
        name: impl Into<String>,
        accessor: impl Fn() -> Result<Option<ObjectRef>, ReadError> + 'static,
    ) -> Self {
        let name = name.into();
        let index = self.entries.partition_point(|entry| entry.name <= name);
        self.entries.insert(
            index,
            SingletonEntry {
                name,
                accessor: Box::new(accessor),
                failure: Cell::new(None),
            },
        );
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Enumerable for SingletonList {
    fn members(&self) -> Box<dyn Iterator<Item = Member> + '_> {
        Box::new(
            self.entries
                .iter()
                .map(|entry| Member::Element(Element::value(entry.name.as_str(), entry.read()))),
        )
    }
}

impl Object for SingletonList {
    fn describe(&self) -> String {
        self.title.clone()
    }

    fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        Some(self)
    }
}

impl fmt::Debug for SingletonList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonList")
            .field("title", &self.title)
            .field("entries", &self.entries.len())
            .finish()
    }
}

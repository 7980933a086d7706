//! Element: one displayable row

use super::object::ObjectRef;
use ratatui::style::Color;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// Breadcrumb label of the synthetic root element
pub const ROOT_BREADCRUMB: &str = "Objects";

/// What an element shows
#[derive(Clone)]
pub enum ElementKind {
    /// A (possibly null) reference to an inspected object
    Value(Option<ObjectRef>),
    /// Non-navigable section header with a presentation color
    Header(Color),
}

struct ElementData {
    kind: ElementKind,
    label: String,
    breadcrumb: OnceCell<String>,
}

/// A value row or section header
///
/// Cloning is cheap and shares the memoized breadcrumb, so an element that
/// moves from the children cache onto the navigation path keeps its text.
#[derive(Clone)]
pub struct Element(Rc<ElementData>);

impl Element {
    fn new(kind: ElementKind, label: impl Into<String>) -> Self {
        Self(Rc::new(ElementData {
            kind,
            label: label.into(),
            breadcrumb: OnceCell::new(),
        }))
    }

    pub fn value(label: impl Into<String>, value: Option<ObjectRef>) -> Self {
        Self::new(ElementKind::Value(value), label)
    }

    pub fn header(label: impl Into<String>, color: Color) -> Self {
        Self::new(ElementKind::Header(color), label)
    }

    /// Synthetic path root wrapping the root collection
    pub fn root(roots: ObjectRef) -> Self {
        let element = Self::value(ROOT_BREADCRUMB, Some(roots));
        let _ = element.0.breadcrumb.set(ROOT_BREADCRUMB.to_string());
        element
    }

    pub fn kind(&self) -> &ElementKind {
        &self.0.kind
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// The referenced object; `None` for null rows and headers
    pub fn object(&self) -> Option<&ObjectRef> {
        match &self.0.kind {
            ElementKind::Value(value) => value.as_ref(),
            ElementKind::Header(_) => None,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self.0.kind, ElementKind::Header(_))
    }

    pub fn header_color(&self) -> Option<Color> {
        match self.0.kind {
            ElementKind::Header(color) => Some(color),
            ElementKind::Value(_) => None,
        }
    }

    /// Breadcrumb text if it has been computed
    pub fn breadcrumb(&self) -> Option<&str> {
        self.0.breadcrumb.get().map(String::as_str)
    }

    /// Breadcrumb text, computing it with `compute` on first access only
    pub fn breadcrumb_with(&self, compute: impl FnOnce() -> String) -> &str {
        self.0.breadcrumb.get_or_init(compute)
    }

    /// Same element instance (not just equal contents)
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            ElementKind::Value(Some(value)) => {
                write!(f, "Element({} = {})", self.0.label, value.type_key())
            }
            ElementKind::Value(None) => write!(f, "Element({} = null)", self.0.label),
            ElementKind::Header(_) => write!(f, "Header({})", self.0.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::object::obj;
    use std::cell::Cell;

    #[test]
    fn breadcrumb_is_computed_once_and_shared_by_clones() {
        let element = Element::value("x", Some(obj(1_i32)));
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            "Parent.x".to_string()
        };
        assert_eq!(element.breadcrumb(), None);
        assert_eq!(element.breadcrumb_with(compute), "Parent.x");

        let copy = element.clone();
        assert_eq!(
            copy.breadcrumb_with(|| {
                calls.set(calls.get() + 1);
                "other".to_string()
            }),
            "Parent.x"
        );
        assert_eq!(calls.get(), 1);
        assert!(copy.ptr_eq(&element));
    }

    #[test]
    fn root_has_preset_breadcrumb() {
        let root = Element::root(obj(String::from("roots")));
        assert_eq!(root.breadcrumb(), Some(ROOT_BREADCRUMB));
        assert!(root.object().is_some());
    }

    #[test]
    fn headers_carry_no_object() {
        let header = Element::header("Fields", Color::Cyan);
        assert!(header.is_header());
        assert!(header.object().is_none());
        assert_eq!(header.header_color(), Some(Color::Cyan));
    }
}

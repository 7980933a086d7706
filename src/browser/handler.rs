//! Type handlers: how a value is rendered and expanded

use super::collections::Member;
use super::element::Element;
use super::error::BrowseError;
use super::object::ObjectRef;
use super::options::DisplayOptions;

/// Lazily produced children of one object
pub type Children<'a> = Box<dyn Iterator<Item = Element> + 'a>;

/// Display and expansion strategy for a family of types
///
/// Handlers are resolved per concrete type by the registry and shared by
/// every session of a browser.
pub trait TypeHandler {
    /// One-line rendering of `value`; never fails
    fn string_value(&self, value: &ObjectRef) -> String {
        value.describe()
    }

    /// Whether `value` has no children (its row is not navigable)
    fn is_leaf(&self, value: &ObjectRef) -> bool;

    /// Breadcrumb label for `element` entered from `parent`
    fn breadcrumb_text(&self, _parent: &ObjectRef, element: &Element) -> String {
        element.label().to_string()
    }

    /// Children of `value`, honoring `options`
    ///
    /// The sequence may be abandoned part way. Calling this on a value the
    /// handler reports as a leaf is a contract violation.
    fn children<'a>(
        &'a self,
        value: &'a ObjectRef,
        options: DisplayOptions,
    ) -> Result<Children<'a>, BrowseError>;
}

/// Primitives, strings and null
pub struct LeafHandler;

impl TypeHandler for LeafHandler {
    fn is_leaf(&self, _value: &ObjectRef) -> bool {
        true
    }

    fn children<'a>(
        &'a self,
        value: &'a ObjectRef,
        _options: DisplayOptions,
    ) -> Result<Children<'a>, BrowseError> {
        Err(BrowseError::LeafExpansion {
            type_name: value.type_key().name().to_string(),
        })
    }
}

/// Sequences: one row per member, labeled by position
pub struct EnumerableHandler;

impl TypeHandler for EnumerableHandler {
    fn is_leaf(&self, _value: &ObjectRef) -> bool {
        false
    }

    fn breadcrumb_text(&self, _parent: &ObjectRef, element: &Element) -> String {
        match element.object() {
            Some(child) => format!("{}: {}", element.label(), child.type_key()),
            None => format!("{}: null", element.label()),
        }
    }

    fn children<'a>(
        &'a self,
        value: &'a ObjectRef,
        _options: DisplayOptions,
    ) -> Result<Children<'a>, BrowseError> {
        let Some(sequence) = value.as_enumerable() else {
            tracing::warn!(
                "{} is registered as enumerable but exposes no members",
                value.type_key()
            );
            return Ok(Box::new(std::iter::empty()));
        };
        Ok(Box::new(sequence.members().enumerate().map(
            |(index, member)| match member {
                Member::Element(element) => element,
                Member::Value(item) => Element::value(index.to_string(), item),
            },
        )))
    }
}

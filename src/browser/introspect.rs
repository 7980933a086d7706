//! Reflective handler: lists fields and properties from the type catalog
//!
//! Member lists are built once per concrete type, across the whole base
//! chain, and kept sorted: reference-typed members first, then value-typed,
//! each group by name. Display options filter the cached lists per call.
//!
//! Property getters that fail are remembered per (type, property). The
//! failure's kind name is shown from then on and the getter is not invoked
//! again for any instance of that type.

use super::element::Element;
use super::error::BrowseError;
use super::handler::{Children, TypeHandler};
use super::object::{obj, ObjectRef, TypeKey};
use super::options::DisplayOptions;
use super::types::{FieldDef, Projection, PropertyDef, TypeCatalog, BACKING_FIELD_SUFFIX};
use ratatui::style::Color;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub const FIELDS_HEADER: &str = "Fields";
pub const PROPERTIES_HEADER: &str = "Properties";

const FIELDS_COLOR: Color = Color::Cyan;
const PROPERTIES_COLOR: Color = Color::Green;

/// Projection steps from a concrete value to a base-type value
type ProjectionPath = Rc<[Rc<dyn Projection>]>;

fn project<'a>(value: &'a ObjectRef, path: &[Rc<dyn Projection>]) -> Option<&'a dyn Any> {
    let mut target: &'a dyn Any = (**value).as_any();
    for step in path {
        target = step.project(target)?;
    }
    Some(target)
}

/// Cached descriptor of one field
pub struct FieldSlot {
    pub declaring: TypeKey,
    /// Display label (backing suffix stripped)
    pub label: String,
    pub is_value: bool,
    def: FieldDef,
    path: ProjectionPath,
}

impl FieldSlot {
    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn is_backing(&self) -> bool {
        self.def.is_backing()
    }

    fn read(&self, value: &ObjectRef) -> Option<ObjectRef> {
        project(value, &self.path).and_then(|target| self.def.read(target))
    }
}

/// Cached descriptor of one property, with its sticky failure marker
pub struct PropertySlot {
    pub declaring: TypeKey,
    pub is_value: bool,
    def: PropertyDef,
    path: ProjectionPath,
    failure: Cell<Option<&'static str>>,
}

impl PropertySlot {
    pub fn name(&self) -> &str {
        &self.def.name
    }

    fn read(&self, value: &ObjectRef) -> Option<ObjectRef> {
        if let Some(kind) = self.failure.get() {
            return Some(obj(kind));
        }
        let target = project(value, &self.path)?;
        match self.def.read(target) {
            Ok(result) => result,
            Err(e) => {
                let kind = e.kind_name();
                tracing::warn!(
                    "Property {}.{} failed, skipping from now on: {} ({})",
                    self.declaring,
                    self.def.name,
                    e,
                    kind
                );
                self.failure.set(Some(kind));
                Some(obj(kind))
            }
        }
    }
}

/// Sorted member lists of one concrete type
pub struct TypeMetadata {
    pub fields: Vec<FieldSlot>,
    pub properties: Vec<PropertySlot>,
}

/// Generic structural handler backed by the type catalog
pub struct ObjectHandler {
    catalog: Rc<TypeCatalog>,
    metadata: RefCell<HashMap<TypeKey, Rc<TypeMetadata>>>,
}

impl ObjectHandler {
    pub fn new(catalog: Rc<TypeCatalog>) -> Self {
        Self {
            catalog,
            metadata: RefCell::new(HashMap::new()),
        }
    }

    /// Member lists for `key`, built on first use
    pub fn metadata(&self, key: TypeKey) -> Rc<TypeMetadata> {
        if let Some(meta) = self.metadata.borrow().get(&key) {
            return meta.clone();
        }
        let meta = Rc::new(self.build(key));
        tracing::debug!(
            "Built member metadata for {} ({} fields, {} properties)",
            key,
            meta.fields.len(),
            meta.properties.len()
        );
        self.metadata.borrow_mut().insert(key, meta.clone());
        meta
    }

    /// Drop all cached metadata, including memoized property failures
    pub fn clear_cache(&self) {
        self.metadata.borrow_mut().clear();
    }

    fn build(&self, key: TypeKey) -> TypeMetadata {
        let mut fields = Vec::new();
        let mut properties = Vec::new();
        let mut seen: HashSet<(TypeKey, String)> = HashSet::new();
        let mut visited: HashSet<TypeKey> = HashSet::new();
        let mut steps: Vec<Rc<dyn Projection>> = Vec::new();

        let mut current = Some(key);
        while let Some(ty) = current.take() {
            if !visited.insert(ty) {
                tracing::warn!("Cyclic base chain detected at {}", ty);
                break;
            }
            let Some(info) = self.catalog.get(ty) else {
                break;
            };
            let path: ProjectionPath = steps.iter().cloned().collect();

            for def in &info.fields {
                if !seen.insert((ty, def.name.clone())) {
                    continue;
                }
                let label = def
                    .name
                    .strip_suffix(BACKING_FIELD_SUFFIX)
                    .unwrap_or(&def.name)
                    .to_string();
                fields.push(FieldSlot {
                    declaring: ty,
                    label,
                    is_value: self.catalog.is_value_type(def.declared),
                    def: def.clone(),
                    path: path.clone(),
                });
            }
            for def in &info.properties {
                if !seen.insert((ty, def.name.clone())) {
                    continue;
                }
                properties.push(PropertySlot {
                    declaring: ty,
                    is_value: self.catalog.is_value_type(def.declared),
                    def: def.clone(),
                    path: path.clone(),
                    failure: Cell::new(None),
                });
            }

            // Marker bases (no projection) declare no members past this point
            if let Some(base) = info.base.as_ref() {
                if let Some(step) = base.projection.as_ref() {
                    if !base.key.is_object() {
                        steps.push(step.clone());
                        current = Some(base.key);
                    }
                }
            }
        }

        fields.sort_by(|a, b| {
            a.is_value
                .cmp(&b.is_value)
                .then_with(|| a.def.name.cmp(&b.def.name))
        });
        properties.sort_by(|a, b| {
            a.is_value
                .cmp(&b.is_value)
                .then_with(|| a.def.name.cmp(&b.def.name))
        });
        TypeMetadata { fields, properties }
    }
}

fn field_rows<'a>(
    meta: Rc<TypeMetadata>,
    value: &'a ObjectRef,
    backing: bool,
) -> impl Iterator<Item = Element> + 'a {
    let count = meta.fields.len();
    (0..count).filter_map(move |index| {
        let slot = &meta.fields[index];
        if slot.is_backing() && !backing {
            return None;
        }
        Some(Element::value(slot.label.as_str(), slot.read(value)))
    })
}

fn property_rows<'a>(meta: Rc<TypeMetadata>, value: &'a ObjectRef) -> impl Iterator<Item = Element> + 'a {
    let count = meta.properties.len();
    (0..count).map(move |index| {
        let slot = &meta.properties[index];
        Element::value(slot.name(), slot.read(value))
    })
}

impl TypeHandler for ObjectHandler {
    fn is_leaf(&self, _value: &ObjectRef) -> bool {
        false
    }

    fn breadcrumb_text(&self, parent: &ObjectRef, element: &Element) -> String {
        format!("{}.{}", parent.type_key(), element.label())
    }

    fn children<'a>(
        &'a self,
        value: &'a ObjectRef,
        options: DisplayOptions,
    ) -> Result<Children<'a>, BrowseError> {
        let meta = self.metadata(value.type_key());
        let backing = options.contains(DisplayOptions::BACKING_FIELDS);

        let fields = options.contains(DisplayOptions::FIELDS).then(|| {
            std::iter::once(Element::header(FIELDS_HEADER, FIELDS_COLOR))
                .chain(field_rows(meta.clone(), value, backing))
        });
        let properties = options.contains(DisplayOptions::PROPERTIES).then(|| {
            std::iter::once(Element::header(PROPERTIES_HEADER, PROPERTIES_COLOR))
                .chain(property_rows(meta.clone(), value))
        });

        Ok(Box::new(
            fields
                .into_iter()
                .flatten()
                .chain(properties.into_iter().flatten()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::error::ReadError;
    use crate::browser::object::Object;
    use crate::browser::types::TypeInfo;

    struct Thing;
    impl Object for Thing {}

    struct Sample {
        a: Rc<Thing>,
        b: i32,
        c: Option<ObjectRef>,
    }
    impl Object for Sample {}

    struct Base {
        id: u32,
    }
    impl Object for Base {}

    struct Derived {
        base: Base,
        name: String,
        calls: Rc<Cell<u32>>,
    }
    impl Object for Derived {}

    fn handler() -> ObjectHandler {
        let catalog = Rc::new(TypeCatalog::new());
        catalog.register(
            TypeInfo::class::<Sample>()
                .field_ref::<Thing>("c", |s: &Sample| s.c.clone())
                .field_ref::<Thing>("a", |s: &Sample| Some(s.a.clone() as ObjectRef))
                .field("b", |s: &Sample| s.b)
                .build(),
        );
        catalog.register(
            TypeInfo::class::<Base>()
                .field("id", |b: &Base| b.id)
                .build(),
        );
        catalog.register(
            TypeInfo::class::<Derived>()
                .base::<Base>(|d| &d.base)
                .field("name", |d: &Derived| d.name.clone())
                .backing_field("size", |d: &Derived| d.name.len())
                .property("size", |d: &Derived| Ok(d.name.len()))
                .property("broken", |d: &Derived| -> Result<u8, ReadError> {
                    d.calls.set(d.calls.get() + 1);
                    Err(ReadError::invocation("getter", ReadError::Unsupported))
                })
                .build(),
        );
        ObjectHandler::new(catalog)
    }

    fn derived(calls: &Rc<Cell<u32>>) -> ObjectRef {
        obj(Derived {
            base: Base { id: 9 },
            name: "crate".into(),
            calls: calls.clone(),
        })
    }

    fn rows(handler: &ObjectHandler, value: &ObjectRef, options: DisplayOptions) -> Vec<(String, String)> {
        handler
            .children(value, options)
            .unwrap()
            .map(|e| {
                let text = match (e.is_header(), e.object()) {
                    (true, _) => "#".to_string(),
                    (false, Some(v)) => v.describe(),
                    (false, None) => "null".to_string(),
                };
                (e.label().to_string(), text)
            })
            .collect()
    }

    #[test]
    fn references_sort_before_values() {
        let handler = handler();
        let meta = handler.metadata(TypeKey::of::<Sample>());
        let names: Vec<&str> = meta.fields.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }

    #[test]
    fn base_members_are_included_and_projected() {
        let handler = handler();
        let calls = Rc::new(Cell::new(0));
        let value = derived(&calls);
        let listed = rows(&handler, &value, DisplayOptions::FIELDS);
        assert_eq!(
            listed,
            vec![
                ("Fields".to_string(), "#".to_string()),
                ("name".to_string(), "crate".to_string()),
                ("id".to_string(), "9".to_string()),
            ]
        );
    }

    #[test]
    fn backing_fields_are_optional_and_relabeled() {
        let handler = handler();
        let calls = Rc::new(Cell::new(0));
        let value = derived(&calls);
        let options = DisplayOptions::FIELDS.with(DisplayOptions::BACKING_FIELDS, true);
        let labels: Vec<String> = rows(&handler, &value, options)
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["Fields", "name", "id", "size"]);
    }

    #[test]
    fn failing_property_is_read_once_per_type() {
        let handler = handler();
        let calls = Rc::new(Cell::new(0));
        let first = derived(&calls);
        let second = derived(&calls);

        let listed = rows(&handler, &first, DisplayOptions::PROPERTIES);
        assert_eq!(listed[1], ("broken".to_string(), "Unsupported".to_string()));
        assert_eq!(listed[2], ("size".to_string(), "5".to_string()));

        rows(&handler, &first, DisplayOptions::PROPERTIES);
        let again = rows(&handler, &second, DisplayOptions::PROPERTIES);
        assert_eq!(again[1].1, "Unsupported");
        assert_eq!(calls.get(), 1);

        handler.clear_cache();
        rows(&handler, &second, DisplayOptions::PROPERTIES);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn options_filter_without_rebuilding() {
        let handler = handler();
        let calls = Rc::new(Cell::new(0));
        let value = derived(&calls);
        assert!(rows(&handler, &value, DisplayOptions::NONE).is_empty());

        let fields_only = rows(&handler, &value, DisplayOptions::FIELDS);
        let both = rows(&handler, &value, DisplayOptions::default());
        assert_eq!(fields_only.len(), 3);
        assert_eq!(both.len(), 3 + 3);
        assert_eq!(both[3].0, "Properties");
    }

    #[test]
    fn breadcrumb_qualifies_with_parent_type() {
        let handler = handler();
        let calls = Rc::new(Cell::new(0));
        let value = derived(&calls);
        let element = Element::value("name", None);
        assert_eq!(handler.breadcrumb_text(&value, &element), "Derived.name");
    }
}

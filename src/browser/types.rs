//! Type catalog: explicit per-type registration of hierarchy and members
//!
//! Rust has no runtime reflection, so every inspectable type declares what
//! the browser needs to know about it up front:
//! - its kind (value, reference or interface)
//! - the interfaces it implements, in declaration order
//! - an optional base type, with a projection from `&Self` to `&Base`
//! - its fields and properties, as typed getters
//!
//! Handler resolution walks the interfaces and the base chain recorded here.
//! The reflective handler reads members through the getters, projecting
//! through the base chain for members declared on a base type.
//!
//! ```ignore
//! catalog.register(
//!     TypeInfo::class::<Entity>()
//!         .base::<Actor>(|e| &e.actor)
//!         .field("name", |e: &Entity| e.name.clone())
//!         .property("ratio", |e: &Entity| e.health.ratio())
//!         .build(),
//! );
//! ```

use super::error::ReadError;
use super::object::{obj, primitive_keys, Object, ObjectRef, TypeKey};
use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::rc::Rc;

/// Suffix marking generated storage behind an exposed property
pub const BACKING_FIELD_SUFFIX: &str = "$backing";

/// How a type participates in member ordering and resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Copied by value; sorts after reference-typed members
    Value,
    /// Shared by reference
    Reference,
    /// Capability marker (`dyn Trait`), only used for resolution
    Interface,
}

/// Projection from a derived value to its embedded base value
pub(crate) trait Projection {
    fn project<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any>;
}

struct Upcast<T, B> {
    project: fn(&T) -> &B,
}

impl<T: Any, B: Any> Projection for Upcast<T, B> {
    fn project<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any> {
        target
            .downcast_ref::<T>()
            .map(|value| (self.project)(value) as &dyn Any)
    }
}

/// Link from a type to its base type
#[derive(Clone)]
pub struct BaseLink {
    pub key: TypeKey,
    /// `None` for marker bases that declare no members
    pub(crate) projection: Option<Rc<dyn Projection>>,
}

type FieldGetter = Rc<dyn Fn(&dyn Any) -> Option<ObjectRef>>;
type PropertyGetter = Rc<dyn Fn(&dyn Any) -> Result<Option<ObjectRef>, ReadError>>;

/// Declared field: plain storage, reading never fails
#[derive(Clone)]
pub struct FieldDef {
    pub name: String,
    /// Declared type of the field, used for value/reference ordering
    pub declared: TypeKey,
    getter: FieldGetter,
}

impl FieldDef {
    /// Read the field from a value of the declaring type
    pub fn read(&self, target: &dyn Any) -> Option<ObjectRef> {
        (self.getter)(target)
    }

    pub fn is_backing(&self) -> bool {
        self.name.ends_with(BACKING_FIELD_SUFFIX)
    }
}

/// Declared property: computed on read, may fail
#[derive(Clone)]
pub struct PropertyDef {
    pub name: String,
    pub declared: TypeKey,
    getter: PropertyGetter,
}

impl PropertyDef {
    /// Invoke the getter on a value of the declaring type
    pub fn read(&self, target: &dyn Any) -> Result<Option<ObjectRef>, ReadError> {
        (self.getter)(target)
    }
}

/// Everything the catalog knows about one type
#[derive(Clone)]
pub struct TypeInfo {
    pub key: TypeKey,
    pub kind: TypeKind,
    pub base: Option<BaseLink>,
    /// Implemented (or, for interfaces, extended) interfaces in declaration order
    pub interfaces: Vec<TypeKey>,
    pub fields: Vec<FieldDef>,
    pub properties: Vec<PropertyDef>,
}

impl TypeInfo {
    /// Reference type (struct shared through `Rc`)
    pub fn class<T: Object>() -> TypeBuilder<T> {
        TypeBuilder::new(TypeKey::of::<T>(), TypeKind::Reference, None)
    }

    /// Value type; its base is the value-type marker
    pub fn value<T: Object>() -> TypeBuilder<T> {
        let base = BaseLink {
            key: TypeKey::value_type(),
            projection: None,
        };
        TypeBuilder::new(TypeKey::of::<T>(), TypeKind::Value, Some(base))
    }

    /// Interface marker, usually `dyn Trait`
    pub fn interface<T: ?Sized + 'static>() -> TypeBuilder<T> {
        TypeBuilder::new(TypeKey::of::<T>(), TypeKind::Interface, None)
    }
}

/// Builder for [`TypeInfo`]
pub struct TypeBuilder<T: ?Sized> {
    info: TypeInfo,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized + 'static> TypeBuilder<T> {
    fn new(key: TypeKey, kind: TypeKind, base: Option<BaseLink>) -> Self {
        Self {
            info: TypeInfo {
                key,
                kind,
                base,
                interfaces: Vec::new(),
                fields: Vec::new(),
                properties: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    /// Declare an implemented interface (or an extended one, for interfaces)
    pub fn implements<I: ?Sized + 'static>(mut self) -> Self {
        self.info.interfaces.push(TypeKey::of::<I>());
        self
    }

    pub fn build(self) -> TypeInfo {
        self.info
    }
}

impl<T: Any> TypeBuilder<T> {
    /// Declare the base type, reached by projecting to the embedded value
    pub fn base<B: Object>(mut self, project: fn(&T) -> &B) -> Self {
        self.info.base = Some(BaseLink {
            key: TypeKey::of::<B>(),
            projection: Some(Rc::new(Upcast { project })),
        });
        self
    }

    /// Field holding a value; the getter snapshots it on every read
    pub fn field<F: Object>(mut self, name: &str, get: impl Fn(&T) -> F + 'static) -> Self {
        let getter: FieldGetter =
            Rc::new(move |target: &dyn Any| target.downcast_ref::<T>().map(|t| obj(get(t))));
        self.info.fields.push(FieldDef {
            name: name.to_string(),
            declared: TypeKey::of::<F>(),
            getter,
        });
        self
    }

    /// Field holding a nullable reference of declared type `F`
    pub fn field_ref<F: ?Sized + 'static>(
        mut self,
        name: &str,
        get: impl Fn(&T) -> Option<ObjectRef> + 'static,
    ) -> Self {
        let getter: FieldGetter =
            Rc::new(move |target: &dyn Any| target.downcast_ref::<T>().and_then(|t| get(t)));
        self.info.fields.push(FieldDef {
            name: name.to_string(),
            declared: TypeKey::of::<F>(),
            getter,
        });
        self
    }

    /// Generated storage behind the property `property`
    ///
    /// Listed only when backing fields are enabled; its label drops the suffix.
    pub fn backing_field<F: Object>(
        self,
        property: &str,
        get: impl Fn(&T) -> F + 'static,
    ) -> Self {
        let name = format!("{}{}", property, BACKING_FIELD_SUFFIX);
        self.field(&name, get)
    }

    /// Computed property returning a value
    pub fn property<F: Object>(
        mut self,
        name: &str,
        get: impl Fn(&T) -> Result<F, ReadError> + 'static,
    ) -> Self {
        let getter: PropertyGetter = Rc::new(move |target: &dyn Any| match target
            .downcast_ref::<T>()
        {
            Some(t) => get(t).map(|v| Some(obj(v))),
            None => Ok(None),
        });
        self.info.properties.push(PropertyDef {
            name: name.to_string(),
            declared: TypeKey::of::<F>(),
            getter,
        });
        self
    }

    /// Computed property returning a nullable reference of declared type `F`
    pub fn property_ref<F: ?Sized + 'static>(
        mut self,
        name: &str,
        get: impl Fn(&T) -> Result<Option<ObjectRef>, ReadError> + 'static,
    ) -> Self {
        let getter: PropertyGetter = Rc::new(move |target: &dyn Any| match target
            .downcast_ref::<T>()
        {
            Some(t) => get(t),
            None => Ok(None),
        });
        self.info.properties.push(PropertyDef {
            name: name.to_string(),
            declared: TypeKey::of::<F>(),
            getter,
        });
        self
    }
}

/// Registration table for all inspectable types
///
/// Append-mostly: registering a key again replaces the entry. Unknown types
/// behave as plain reference types with no members.
pub struct TypeCatalog {
    types: RefCell<HashMap<TypeKey, Rc<TypeInfo>>>,
}

impl TypeCatalog {
    /// Catalog with the built-in primitive types
    pub fn new() -> Self {
        let catalog = Self {
            types: RefCell::new(HashMap::new()),
        };
        for key in primitive_keys() {
            let kind = if key == TypeKey::of::<String>() || key == TypeKey::of::<&'static str>() {
                TypeKind::Reference
            } else {
                TypeKind::Value
            };
            let base = (kind == TypeKind::Value).then(|| BaseLink {
                key: TypeKey::value_type(),
                projection: None,
            });
            catalog.insert(TypeInfo {
                key,
                kind,
                base,
                interfaces: Vec::new(),
                fields: Vec::new(),
                properties: Vec::new(),
            });
        }
        catalog
    }

    /// Register (or replace) a type
    pub fn register(&self, info: TypeInfo) {
        tracing::debug!(
            "Registered type {} ({} fields, {} properties)",
            info.key,
            info.fields.len(),
            info.properties.len()
        );
        self.insert(info);
    }

    fn insert(&self, info: TypeInfo) {
        self.types.borrow_mut().insert(info.key, Rc::new(info));
    }

    pub fn get(&self, key: TypeKey) -> Option<Rc<TypeInfo>> {
        self.types.borrow().get(&key).cloned()
    }

    /// Kind of a type; unregistered types count as reference types
    pub fn kind_of(&self, key: TypeKey) -> TypeKind {
        self.get(key)
            .map(|info| info.kind)
            .unwrap_or(TypeKind::Reference)
    }

    pub fn is_value_type(&self, key: TypeKey) -> bool {
        self.kind_of(key) == TypeKind::Value
    }

    /// Base chain of `key`, most-derived first, excluding `key` and the root
    pub fn base_chain(&self, key: TypeKey) -> Vec<TypeKey> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([key]);
        let mut current = self.get(key).and_then(|info| info.base.as_ref().map(|b| b.key));
        while let Some(base) = current {
            if base.is_object() {
                break;
            }
            if !seen.insert(base) {
                tracing::warn!("Cyclic base chain detected at {}", base);
                break;
            }
            chain.push(base);
            current = self.get(base).and_then(|info| info.base.as_ref().map(|b| b.key));
        }
        chain
    }

    /// Every interface `key` implements, in resolution order
    ///
    /// Declared interfaces come first, each followed by the interfaces it
    /// extends; then the interfaces of each base type. Duplicates are dropped.
    pub fn interfaces_of(&self, key: TypeKey) -> Vec<TypeKey> {
        let mut ordered = Vec::new();
        let mut seen = HashSet::new();
        let lineage = std::iter::once(key).chain(self.base_chain(key));
        for ty in lineage {
            if let Some(info) = self.get(ty) {
                for iface in &info.interfaces {
                    self.collect_interface(*iface, &mut ordered, &mut seen);
                }
            }
        }
        ordered
    }

    fn collect_interface(
        &self,
        iface: TypeKey,
        ordered: &mut Vec<TypeKey>,
        seen: &mut HashSet<TypeKey>,
    ) {
        if !seen.insert(iface) {
            return;
        }
        ordered.push(iface);
        if let Some(info) = self.get(iface) {
            for parent in &info.interfaces {
                self.collect_interface(*parent, ordered, seen);
            }
        }
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

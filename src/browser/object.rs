//! Inspectable object model
//!
//! Anything the browser can show implements [`Object`]. Objects are shared
//! through [`ObjectRef`] (`Rc<dyn Object>`); a missing reference is `None`.
//! Runtime types are identified by [`TypeKey`], which also serves as the key
//! for handler registrations and catalog entries.

use super::collections::Enumerable;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Shared reference to an inspectable object
pub type ObjectRef = Rc<dyn Object>;

/// Marker standing in for "any value type" in the type hierarchy
pub struct ValueType;

/// Identifier for a runtime type, interface or marker type
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for `T`. Works for concrete types and `dyn Trait` interfaces.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(std::any::type_name::<T>()),
        }
    }

    /// The universal root type every resolution falls back to
    pub fn object() -> Self {
        Self::of::<dyn Object>()
    }

    /// Marker key that primitive and struct-like types derive from
    pub fn value_type() -> Self {
        Self::of::<ValueType>()
    }

    /// Short type name (no module path)
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_object(&self) -> bool {
        self.id == TypeId::of::<dyn Object>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip the module path (and generic arguments) from a type name
fn short_type_name(full: &'static str) -> &'static str {
    let head = full.split('<').next().unwrap_or(full);
    head.rsplit("::").next().unwrap_or(head)
}

/// Upcast helper so member getters can downcast to the concrete type
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An inspectable value
///
/// Only `describe` is worth overriding for most types. Collections also
/// override `as_enumerable` and declare `dyn Enumerable` in their catalog
/// entry so the enumerable handler is resolved for them.
pub trait Object: AsAny + 'static {
    /// Concrete runtime type of this value
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }

    /// One-line rendering; defaults to the type name
    fn describe(&self) -> String {
        self.type_key().name().to_string()
    }

    /// Sequence view, for values that expose members in order
    fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        None
    }
}

/// Wrap a value as a shared object reference
pub fn obj<T: Object>(value: T) -> ObjectRef {
    Rc::new(value)
}

/// Borrow the concrete value behind a reference
///
/// Goes through the trait object; calling `as_any` on the `Rc` itself would
/// yield the `Rc`.
pub fn downcast<T: Object>(value: &ObjectRef) -> Option<&T> {
    (**value).as_any().downcast_ref::<T>()
}

/// Reference identity (ignores vtable differences between fat pointers)
pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    std::ptr::eq(
        Rc::as_ptr(a) as *const (),
        Rc::as_ptr(b) as *const (),
    )
}

/// Identity comparison for nullable references
pub fn same_value(a: Option<&ObjectRef>, b: Option<&ObjectRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_object(a, b),
        (None, None) => true,
        _ => false,
    }
}

macro_rules! leaf_objects {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Object for $ty {
                fn describe(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

leaf_objects!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str,
);

/// Keys of every built-in leaf type, for registering the leaf handler
pub fn primitive_keys() -> Vec<TypeKey> {
    vec![
        TypeKey::of::<bool>(),
        TypeKey::of::<char>(),
        TypeKey::of::<i8>(),
        TypeKey::of::<i16>(),
        TypeKey::of::<i32>(),
        TypeKey::of::<i64>(),
        TypeKey::of::<i128>(),
        TypeKey::of::<isize>(),
        TypeKey::of::<u8>(),
        TypeKey::of::<u16>(),
        TypeKey::of::<u32>(),
        TypeKey::of::<u64>(),
        TypeKey::of::<u128>(),
        TypeKey::of::<usize>(),
        TypeKey::of::<f32>(),
        TypeKey::of::<f64>(),
        TypeKey::of::<String>(),
        TypeKey::of::<&'static str>(),
    ]
}

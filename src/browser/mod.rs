//! Object-graph browsing engine
//!
//! The engine resolves a display handler per runtime type, tracks the
//! breadcrumb path the user has entered and caches the current parent's
//! children on a throttle. It never draws anything: front-ends read
//! [`Session::children`] and feed row and breadcrumb activations back.
//!
//! # Architecture
//!
//! ```text
//! Browser (shared)                    Session (one per view)
//! ├── TypeCatalog   types, members    ├── NavigationState   root + trail
//! ├── HandlerRegistry                 ├── ChildrenCache     single slot
//! │   └── resolved cache              └── DisplayOptions
//! ├── ObjectHandler  metadata cache
//! └── RootSet
//! ```

pub mod children;
pub mod collections;
pub mod element;
pub mod error;
pub mod handler;
pub mod introspect;
pub mod navigation;
pub mod object;
pub mod options;
pub mod registry;
pub mod session;
pub mod types;

pub use collections::{Enumerable, Member, ObjectList, RootSet, SingletonList};
pub use element::{Element, ElementKind};
pub use error::{BrowseError, ReadError};
pub use handler::{Children, EnumerableHandler, LeafHandler, TypeHandler};
pub use introspect::ObjectHandler;
pub use object::{downcast, obj, same_object, Object, ObjectRef, TypeKey};
pub use options::DisplayOptions;
pub use registry::HandlerRegistry;
pub use session::{RowView, Session};
pub use types::{TypeCatalog, TypeInfo, TypeKind};

use std::rc::Rc;

/// One browsable object graph: types, handlers and roots
///
/// Construct one per graph and hand it to whatever presents it; nothing here
/// is global.
pub struct Browser {
    catalog: Rc<TypeCatalog>,
    registry: HandlerRegistry,
    objects: Rc<ObjectHandler>,
    roots: Rc<RootSet>,
}

impl Browser {
    /// Browser with the built-in types and handlers registered
    pub fn new() -> Self {
        let catalog = Rc::new(TypeCatalog::new());
        catalog.register(TypeInfo::interface::<dyn Enumerable>().build());
        catalog.register(TypeInfo::class::<ObjectList>().implements::<dyn Enumerable>().build());
        catalog.register(TypeInfo::class::<RootSet>().implements::<dyn Enumerable>().build());
        catalog.register(
            TypeInfo::class::<SingletonList>()
                .implements::<dyn Enumerable>()
                .build(),
        );

        let objects = Rc::new(ObjectHandler::new(catalog.clone()));
        let registry = HandlerRegistry::new(catalog.clone(), objects.clone());

        let leaf: Rc<dyn TypeHandler> = Rc::new(LeafHandler);
        for key in object::primitive_keys() {
            registry.register(key, leaf.clone());
        }
        registry.register(TypeKey::of::<dyn Enumerable>(), Rc::new(EnumerableHandler));

        Self {
            catalog,
            registry,
            objects,
            roots: Rc::new(RootSet::new()),
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn roots(&self) -> &RootSet {
        &self.roots
    }

    /// Add a root object to browse
    pub fn add(&self, root: ObjectRef) {
        self.roots.add(root);
    }

    /// Remove a root object by identity
    pub fn remove(&self, root: &ObjectRef) -> bool {
        self.roots.remove(root)
    }

    /// Declare an inspectable type
    pub fn register_type(&self, info: TypeInfo) {
        self.catalog.register(info);
    }

    /// Register a handler for a type, interface or base type
    ///
    /// Types already resolved keep their old handler until
    /// [`Browser::clear_resolved_handlers`] is called.
    pub fn register_handler(&self, key: TypeKey, handler: Rc<dyn TypeHandler>) {
        self.registry.register(key, handler);
    }

    pub fn handler_for(&self, value: Option<&ObjectRef>) -> Rc<dyn TypeHandler> {
        self.registry.handler_for(value)
    }

    /// Drop the reflective handler's member metadata and property failures
    pub fn clear_field_cache(&self) {
        self.objects.clear_cache();
        tracing::debug!("Cleared member metadata cache");
    }

    pub fn clear_resolved_handlers(&self) {
        self.registry.clear_resolved();
    }

    /// Synthetic path root wrapping the root set
    pub fn root_element(&self) -> Element {
        let roots: ObjectRef = self.roots.clone();
        Element::root(roots)
    }
}

impl Default for Browser {
    fn default() -> Self {
        Self::new()
    }
}

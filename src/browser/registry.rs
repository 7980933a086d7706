//! Handler registry with interface and base-type fallback

use super::handler::{LeafHandler, TypeHandler};
use super::object::{ObjectRef, TypeKey};
use super::types::TypeCatalog;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Maps runtime types to handlers
///
/// Resolution order for a concrete type:
/// 1. a registration for the type itself
/// 2. its interfaces, in declaration order, each followed by the interfaces it extends
/// 3. its base types, most-derived first
/// 4. the universal fallback
///
/// The fallback is a required constructor argument, so resolution is total.
/// Results are cached per concrete type. Re-registering a key does not
/// touch the cache; call [`HandlerRegistry::clear_resolved`] after changing
/// registrations for types that were already resolved.
pub struct HandlerRegistry {
    catalog: Rc<TypeCatalog>,
    handlers: RefCell<HashMap<TypeKey, Rc<dyn TypeHandler>>>,
    fallback: RefCell<Rc<dyn TypeHandler>>,
    null_handler: Rc<dyn TypeHandler>,
    resolved: RefCell<HashMap<TypeKey, Rc<dyn TypeHandler>>>,
}

impl HandlerRegistry {
    pub fn new(catalog: Rc<TypeCatalog>, fallback: Rc<dyn TypeHandler>) -> Self {
        Self {
            catalog,
            handlers: RefCell::new(HashMap::new()),
            fallback: RefCell::new(fallback),
            null_handler: Rc::new(LeafHandler),
            resolved: RefCell::new(HashMap::new()),
        }
    }

    /// Register `handler` for `key`, replacing any earlier registration
    ///
    /// Registering the universal root replaces the fallback.
    pub fn register(&self, key: TypeKey, handler: Rc<dyn TypeHandler>) {
        if key.is_object() {
            tracing::debug!("Replaced fallback handler");
            *self.fallback.borrow_mut() = handler;
            return;
        }
        if self.handlers.borrow_mut().insert(key, handler).is_some() {
            tracing::debug!("Re-registered handler for {}", key);
        } else {
            tracing::debug!("Registered handler for {}", key);
        }
    }

    pub fn is_registered(&self, key: TypeKey) -> bool {
        key.is_object() || self.handlers.borrow().contains_key(&key)
    }

    /// Handler for a concrete type, memoized
    pub fn resolve(&self, key: TypeKey) -> Rc<dyn TypeHandler> {
        if let Some(handler) = self.resolved.borrow().get(&key) {
            return handler.clone();
        }
        let handler = self.search(key);
        self.resolved.borrow_mut().insert(key, handler.clone());
        handler
    }

    /// Handler for a nullable value; null short-circuits to the leaf handler
    pub fn handler_for(&self, value: Option<&ObjectRef>) -> Rc<dyn TypeHandler> {
        match value {
            Some(value) => self.resolve(value.type_key()),
            None => self.null_handler.clone(),
        }
    }

    /// Forget every memoized resolution
    pub fn clear_resolved(&self) {
        let count = self.resolved.borrow().len();
        self.resolved.borrow_mut().clear();
        tracing::debug!("Cleared {} resolved handlers", count);
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.borrow().len()
    }

    fn search(&self, key: TypeKey) -> Rc<dyn TypeHandler> {
        let handlers = self.handlers.borrow();
        if let Some(handler) = handlers.get(&key) {
            return handler.clone();
        }

        let interfaces = self.catalog.interfaces_of(key);
        let bases = self.catalog.base_chain(key);
        for candidate in interfaces.iter().chain(bases.iter()) {
            if let Some(handler) = handlers.get(candidate) {
                tracing::trace!("Resolved {} through {}", key, candidate);
                return handler.clone();
            }
        }

        tracing::trace!("Resolved {} to fallback", key);
        self.fallback.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::collections::Enumerable;
    use crate::browser::element::Element;
    use crate::browser::error::BrowseError;
    use crate::browser::handler::Children;
    use crate::browser::object::{obj, Object};
    use crate::browser::options::DisplayOptions;
    use crate::browser::types::TypeInfo;

    /// Handler that only reports its name
    struct Named(&'static str);

    impl TypeHandler for Named {
        fn string_value(&self, _value: &ObjectRef) -> String {
            self.0.to_string()
        }

        fn is_leaf(&self, _value: &ObjectRef) -> bool {
            false
        }

        fn children<'a>(
            &'a self,
            _value: &'a ObjectRef,
            _options: DisplayOptions,
        ) -> Result<Children<'a>, BrowseError> {
            Ok(Box::new(std::iter::empty::<Element>()))
        }
    }

    trait Collection {}
    trait Tagged {}

    struct GameObject;
    impl Object for GameObject {}

    struct Inventory;
    impl Object for Inventory {}

    struct Player {
        base: GameObject,
    }
    impl Object for Player {}

    struct Stranger;
    impl Object for Stranger {}

    fn setup() -> HandlerRegistry {
        let catalog = Rc::new(TypeCatalog::new());
        catalog.register(TypeInfo::interface::<dyn Collection>().build());
        catalog.register(TypeInfo::class::<GameObject>().build());
        catalog.register(
            TypeInfo::class::<Inventory>()
                .implements::<dyn Tagged>()
                .implements::<dyn Collection>()
                .build(),
        );
        catalog.register(
            TypeInfo::class::<Player>()
                .base::<GameObject>(|p| &p.base)
                .implements::<dyn Collection>()
                .build(),
        );
        let registry = HandlerRegistry::new(catalog, Rc::new(Named("fallback")));
        registry.register(TypeKey::of::<dyn Collection>(), Rc::new(Named("collection")));
        registry.register(TypeKey::of::<GameObject>(), Rc::new(Named("game-object")));
        registry
    }

    fn name_of(registry: &HandlerRegistry, key: TypeKey) -> String {
        registry.resolve(key).string_value(&obj(0_u8))
    }

    #[test]
    fn interface_registration_beats_fallback() {
        let registry = setup();
        assert_eq!(name_of(&registry, TypeKey::of::<Inventory>()), "collection");
    }

    #[test]
    fn interfaces_beat_base_types() {
        let registry = setup();
        assert_eq!(name_of(&registry, TypeKey::of::<Player>()), "collection");
    }

    #[test]
    fn exact_match_wins() {
        let registry = setup();
        assert_eq!(name_of(&registry, TypeKey::of::<GameObject>()), "game-object");
        registry.register(TypeKey::of::<Player>(), Rc::new(Named("player")));
        assert_eq!(name_of(&registry, TypeKey::of::<Player>()), "player");
    }

    #[test]
    fn unknown_types_fall_back() {
        let registry = setup();
        assert_eq!(name_of(&registry, TypeKey::of::<Stranger>()), "fallback");
        assert_eq!(name_of(&registry, TypeKey::of::<dyn Enumerable>()), "fallback");
    }

    #[test]
    fn resolution_is_memoized_until_cleared() {
        let registry = setup();
        let first = registry.resolve(TypeKey::of::<Stranger>());
        let second = registry.resolve(TypeKey::of::<Stranger>());
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(registry.resolved_count(), 1);

        // Stale until cleared
        registry.register(TypeKey::of::<Stranger>(), Rc::new(Named("late")));
        assert_eq!(name_of(&registry, TypeKey::of::<Stranger>()), "fallback");
        registry.clear_resolved();
        assert_eq!(name_of(&registry, TypeKey::of::<Stranger>()), "late");
    }

    #[test]
    fn null_resolves_to_leaf() {
        let registry = setup();
        let handler = registry.handler_for(None);
        assert!(handler.is_leaf(&obj(0_u8)));
        assert_eq!(registry.resolved_count(), 0);
    }

    #[test]
    fn registering_root_replaces_fallback() {
        let registry = setup();
        registry.register(TypeKey::object(), Rc::new(Named("root")));
        assert!(registry.is_registered(TypeKey::object()));
        assert_eq!(name_of(&registry, TypeKey::of::<Stranger>()), "root");
    }
}

//! Maps component types to tokens and routes operations to their stores.

use std::any::{TypeId, type_name};
use std::collections::HashMap;

use log::error;

use crate::{
    component::{AnyStore, Component, Store, Token},
    entity::Entity,
    error::Error,
};

/// The component type registry and the stores it routes to.
///
/// Each registered type is assigned the next [`Token`]; the token indexes
/// both the entity signatures and the `stores` vec. Tokens are never
/// recycled, so at most `max_components` types can ever be registered.
pub struct Registry {
    /// Rust type identity to token.
    tokens: HashMap<TypeId, Token>,

    /// One type-erased store per registered type, indexed by token.
    stores: Vec<Box<dyn AnyStore>>,

    /// Per-store value capacity, fixed at construction.
    max_entities: usize,

    /// Maximum number of registrable types (the signature width).
    max_components: usize,
}

impl Registry {
    /// Construct a registry for up to `max_components` types, each storing
    /// up to `max_entities` values.
    pub fn new(max_entities: usize, max_components: usize) -> Self {
        Self {
            tokens: HashMap::new(),
            stores: Vec::new(),
            max_entities,
            max_components,
        }
    }

    /// Register a component type and allocate its store.
    ///
    /// Fails without mutating anything if the type is already registered or
    /// every token is spent; both are logged. Registration must precede any
    /// other operation on the type.
    pub fn register<C: Component>(&mut self) -> Result<Token, Error> {
        let type_id = TypeId::of::<C>();
        if self.tokens.contains_key(&type_id) {
            error!(
                "component type {} is already registered, ignoring",
                type_name::<C>()
            );
            return Err(Error::DuplicateType {
                type_name: type_name::<C>(),
            });
        }
        if self.stores.len() == self.max_components {
            error!(
                "all {} component type tokens are spent, cannot register {}",
                self.max_components,
                type_name::<C>()
            );
            return Err(Error::CapacityExceeded {
                capacity: self.max_components,
            });
        }

        let token = Token::new(self.stores.len() as u32);
        self.tokens.insert(type_id, token);
        self.stores.push(Box::new(Store::<C>::new(self.max_entities)));
        Ok(token)
    }

    /// Get the token for a registered type.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    pub fn token<C: Component>(&self) -> Token {
        match self.tokens.get(&TypeId::of::<C>()) {
            Some(&token) => token,
            None => panic!("component type {} is not registered", type_name::<C>()),
        }
    }

    /// Insert a value for the entity. See [`Store::insert`].
    #[inline]
    pub fn insert<C: Component>(&mut self, entity: Entity, value: C) -> Result<(), Error> {
        self.store_mut::<C>().insert(entity, value)
    }

    /// Remove and return the entity's value. See [`Store::remove`].
    #[inline]
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Result<C, Error> {
        self.store_mut::<C>().remove(entity)
    }

    /// Get the entity's value. Panics if the entity holds none.
    #[inline]
    pub fn get<C: Component>(&self, entity: Entity) -> &C {
        self.store::<C>().get(entity)
    }

    /// Get the entity's value mutably. Panics if the entity holds none.
    #[inline]
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        self.store_mut::<C>().get_mut(entity)
    }

    /// Get the entity's value if it holds one.
    #[inline]
    pub fn try_get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.store::<C>().try_get(entity)
    }

    /// Get the entity's value mutably if it holds one.
    #[inline]
    pub fn try_get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.store_mut::<C>().try_get_mut(entity)
    }

    /// Check whether the entity holds a value of the type.
    #[inline]
    pub fn contains<C: Component>(&self, entity: Entity) -> bool {
        self.store::<C>().contains(entity)
    }

    /// Purge the destroyed entity from every registered store.
    /// O(registered types).
    pub fn destroyed(&mut self, entity: Entity) {
        for store in &mut self.stores {
            store.purge(entity);
        }
    }

    /// Number of registered component types.
    #[inline]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Check whether no types are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Get the concrete store for a registered type.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    fn store<C: Component>(&self) -> &Store<C> {
        let token = self.token::<C>();
        self.stores[token.index()]
            .as_any()
            .downcast_ref()
            .expect("token points at a store of another type")
    }

    /// Get the concrete store for a registered type, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    fn store_mut<C: Component>(&mut self) -> &mut Store<C> {
        let token = self.token::<C>();
        self.stores[token.index()]
            .as_any_mut()
            .downcast_mut()
            .expect("token points at a store of another type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }
    impl Component for Velocity {}

    fn entity(id: u32) -> Entity {
        Entity::new(id)
    }

    #[test]
    fn registration_assigns_increasing_tokens() {
        // Given
        let mut components = Registry::new(16, 8);

        // When
        let pos = components.register::<Position>().unwrap();
        let vel = components.register::<Velocity>().unwrap();

        // Then
        assert_eq!(pos, Token::new(0));
        assert_eq!(vel, Token::new(1));
        assert_eq!(components.token::<Position>(), pos);
        assert_eq!(components.token::<Velocity>(), vel);
        assert_eq!(components.len(), 2);
    }

    #[test]
    fn duplicate_registration_is_refused() {
        // Given
        let mut components = Registry::new(16, 8);
        components.register::<Position>().unwrap();

        // When
        let result = components.register::<Position>();

        // Then
        assert!(matches!(result, Err(Error::DuplicateType { .. })));
        assert_eq!(components.len(), 1);
    }

    #[test]
    fn registration_stops_when_tokens_are_spent() {
        // Given
        let mut components = Registry::new(16, 1);
        components.register::<Position>().unwrap();

        // When
        let result = components.register::<Velocity>();

        // Then
        assert_eq!(result, Err(Error::CapacityExceeded { capacity: 1 }));
    }

    #[test]
    fn operations_route_to_the_right_store() {
        // Given
        let mut components = Registry::new(16, 8);
        components.register::<Position>().unwrap();
        components.register::<Velocity>().unwrap();

        // When
        components
            .insert(entity(0), Position { x: 1.0, y: 2.0 })
            .unwrap();
        components
            .insert(entity(0), Velocity { dx: 0.5, dy: 0.0 })
            .unwrap();

        // Then
        assert_eq!(components.get::<Position>(entity(0)).x, 1.0);
        assert_eq!(components.get::<Velocity>(entity(0)).dx, 0.5);
        assert!(components.contains::<Position>(entity(0)));
        assert!(!components.contains::<Position>(entity(1)));

        // When
        let removed = components.remove::<Velocity>(entity(0)).unwrap();

        // Then
        assert_eq!(removed, Velocity { dx: 0.5, dy: 0.0 });
        assert!(!components.contains::<Velocity>(entity(0)));
        assert!(components.contains::<Position>(entity(0)));
    }

    #[test]
    fn destroyed_purges_every_store() {
        // Given
        let mut components = Registry::new(16, 8);
        components.register::<Position>().unwrap();
        components.register::<Velocity>().unwrap();
        components
            .insert(entity(0), Position { x: 0.0, y: 0.0 })
            .unwrap();
        components
            .insert(entity(0), Velocity { dx: 0.0, dy: 0.0 })
            .unwrap();
        components
            .insert(entity(1), Position { x: 5.0, y: 5.0 })
            .unwrap();

        // When
        components.destroyed(entity(0));

        // Then
        assert!(!components.contains::<Position>(entity(0)));
        assert!(!components.contains::<Velocity>(entity(0)));
        assert!(components.contains::<Position>(entity(1)));
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn token_of_unregistered_type_panics() {
        // Given
        let components = Registry::new(16, 8);

        // When
        components.token::<Position>();
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn access_to_unregistered_type_panics() {
        // Given
        let mut components = Registry::new(16, 8);

        // When
        let _ = components.insert(entity(0), Position { x: 0.0, y: 0.0 });
    }
}

//! The World: the facade composing every registry into one consistent API.
//!
//! A `World` owns the entity, component, system, and resource registries and
//! drives the one cross-cutting protocol: component mutation → signature
//! update → system membership re-evaluation. Because that protocol spans
//! three registries, the world is the only entry point client code should
//! use; the registries stay consistent only as long as every mutation flows
//! through here.
//!
//! # Example
//!
//! ```ignore
//! let mut world = World::new();
//! world.register_component::<Position>()?;
//! world.register_component::<Velocity>()?;
//!
//! world.register_system(Physics::default());
//! let mut required = world.empty_signature();
//! required.insert(world.component_token::<Position>());
//! required.insert(world.component_token::<Velocity>());
//! world.set_system_signature::<Physics>(required)?;
//!
//! let entity = world.create_entity()?;
//! world.add_component(entity, Position { x: 0.0, y: 0.0 })?;
//! world.add_component(entity, Velocity { dx: 1.0, dy: 0.0 })?;
//! // Physics::entity_joined fired; the entity is in its membership set.
//! ```

use crate::{
    component::{self, Component, Token},
    entity::{self, Entity},
    error::Error,
    resource::{self, Resource},
    signature::Signature,
    system::{self, System},
};

use log::error;
use std::collections::BTreeSet;

/// Capacity bounds, fixed at world construction and never adjustable after.
///
/// `max_entities` bounds living entities and per-type component slots;
/// `max_components` bounds registrable component types and is the signature
/// width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_entities: usize,
    pub max_components: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_entities: 10000,
            max_components: 1000,
        }
    }
}

/// The central container composing entity, component, system, and resource
/// lifecycles into one consistent API.
pub struct World {
    limits: Limits,
    entities: entity::Registry,
    components: component::Registry,
    systems: system::Registry,
    resources: resource::Registry,
}

impl World {
    /// Construct a world with the default [`Limits`].
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Construct a world with explicit capacity bounds.
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            entities: entity::Registry::new(limits.max_entities, limits.max_components),
            components: component::Registry::new(limits.max_entities, limits.max_components),
            systems: system::Registry::new(limits.max_components),
            resources: resource::Registry::new(),
        }
    }

    /// The capacity bounds this world was constructed with.
    #[inline]
    pub fn limits(&self) -> Limits {
        self.limits
    }

    // ---- entities ----

    /// Issue a new entity with an empty signature.
    ///
    /// Fails with [`Error::CapacityExceeded`] when `max_entities` are alive.
    #[inline]
    pub fn create_entity(&mut self) -> Result<Entity, Error> {
        self.entities.create()
    }

    /// Destroy an entity: recycle its id, purge every component it holds,
    /// and drop it from every system's membership set (without firing
    /// `entity_left`; see [`system::Registry::destroyed`]).
    ///
    /// Returns `false` and mutates nothing if the id is out of range or not
    /// alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.entities.destroy(entity) {
            return false;
        }
        self.components.destroyed(entity);
        self.systems.destroyed(entity);
        true
    }

    /// Check whether the id is currently alive.
    #[inline]
    pub fn is_living(&self, entity: Entity) -> bool {
        self.entities.is_living(entity)
    }

    /// Number of entities currently alive.
    #[inline]
    pub fn living_count(&self) -> usize {
        self.entities.living_count()
    }

    /// The entity's current signature.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of range.
    #[inline]
    pub fn signature(&self, entity: Entity) -> &Signature {
        self.entities.signature(entity)
    }

    /// An empty signature of this world's width, for building system
    /// requirements.
    #[inline]
    pub fn empty_signature(&self) -> Signature {
        Signature::new(self.limits.max_components)
    }

    // ---- components ----

    /// Register a component type, assigning its [`Token`].
    #[inline]
    pub fn register_component<C: Component>(&mut self) -> Result<Token, Error> {
        self.components.register::<C>()
    }

    /// The token for a registered component type.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    #[inline]
    pub fn component_token<C: Component>(&self) -> Token {
        self.components.token::<C>()
    }

    /// Attach a component to a living entity.
    ///
    /// One logical transaction: store the value, set the type's bit in the
    /// entity's signature, re-evaluate system membership. A refused store
    /// mutation (duplicate add, full store) short-circuits the transaction;
    /// no signature or membership change escapes a soft failure.
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) -> Result<(), Error> {
        if !self.entities.is_living(entity) {
            error!("cannot add a component to {entity:?}, which is not alive");
            return Err(Error::DeadEntity { entity });
        }

        self.components.insert(entity, value)?;

        let mut signature = self.entities.signature(entity).clone();
        signature.insert(self.components.token::<C>());
        self.entities.set_signature(entity, signature.clone());

        self.systems.signature_changed(entity, &signature);
        Ok(())
    }

    /// Detach and return a component from a living entity.
    ///
    /// The same transaction as [`add_component`](World::add_component) with
    /// the signature bit cleared; a refused store mutation (entity holds no
    /// such component) short-circuits it.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Result<C, Error> {
        if !self.entities.is_living(entity) {
            error!("cannot remove a component from {entity:?}, which is not alive");
            return Err(Error::DeadEntity { entity });
        }

        let value = self.components.remove::<C>(entity)?;

        let mut signature = self.entities.signature(entity).clone();
        signature.remove(self.components.token::<C>());
        self.entities.set_signature(entity, signature.clone());

        self.systems.signature_changed(entity, &signature);
        Ok(value)
    }

    /// Get a component held by the entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity holds no component of this type; prove presence
    /// with [`has_component`](World::has_component) or use
    /// [`try_component`](World::try_component).
    #[inline]
    pub fn component<C: Component>(&self, entity: Entity) -> &C {
        self.components.get(entity)
    }

    /// Get a component held by the entity, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the entity holds no component of this type.
    #[inline]
    pub fn component_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        self.components.get_mut(entity)
    }

    /// Get a component if the entity holds one.
    #[inline]
    pub fn try_component<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.components.try_get(entity)
    }

    /// Get a component mutably if the entity holds one.
    #[inline]
    pub fn try_component_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.components.try_get_mut(entity)
    }

    /// Check whether the entity holds a component of the type.
    #[inline]
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        self.components.contains::<C>(entity)
    }

    // ---- systems ----

    /// Register a system instance. Panics if the type is already registered.
    ///
    /// Register systems and set their signatures before processing entities:
    /// an unset signature is empty and matches every entity.
    #[inline]
    pub fn register_system<S: System>(&mut self, system: S) {
        self.systems.register(system);
    }

    /// Attach the required signature to a registered system.
    #[inline]
    pub fn set_system_signature<S: System>(&mut self, signature: Signature) -> Result<(), Error> {
        self.systems.set_signature::<S>(signature)
    }

    /// Get the registered instance of a system type.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    #[inline]
    pub fn system<S: System>(&self) -> &S {
        self.systems.get::<S>()
    }

    /// Get the registered instance of a system type, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    #[inline]
    pub fn system_mut<S: System>(&mut self) -> &mut S {
        self.systems.get_mut::<S>()
    }

    /// The entities currently matching a system's required signature.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    #[inline]
    pub fn system_entities<S: System>(&self) -> &BTreeSet<Entity> {
        self.systems.entities_of::<S>()
    }

    // ---- resources ----

    /// Register a resource type, allocating its name→value map.
    #[inline]
    pub fn register_resource<R: Resource>(&mut self) -> Result<(), Error> {
        self.resources.register::<R>()
    }

    /// Store a resource under the key, replacing any previous value.
    #[inline]
    pub fn set_resource<R: Resource>(&mut self, key: impl Into<String>, value: R) {
        self.resources.set(key, value);
    }

    /// Get the resource stored under the key, if any.
    #[inline]
    pub fn resource<R: Resource>(&self, key: &str) -> Option<&R> {
        self.resources.get(key)
    }

    /// Get the resource stored under the key mutably, if any.
    #[inline]
    pub fn resource_mut<R: Resource>(&mut self, key: &str) -> Option<&mut R> {
        self.resources.get_mut(key)
    }

    /// Drop the mapping and hand ownership of the resource back.
    #[inline]
    pub fn remove_resource<R: Resource>(&mut self, key: &str) -> Option<R> {
        self.resources.remove(key)
    }

    /// Drop every resource of the type.
    #[inline]
    pub fn clear_resources<R: Resource>(&mut self) {
        self.resources.clear::<R>();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

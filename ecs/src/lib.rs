//! A fixed-capacity, signature-based Entity Component System core.
//!
//! Client code attaches typed data ("components") to lightweight integer
//! identifiers ("entities"), registers subscribers ("systems") interested in
//! entities holding particular component combinations, and reads shared named
//! objects ("resources"), all through one [`World`] value.
//!
//! # Architecture
//!
//! The world composes four registries, each owning one concern:
//!
//! - **[`entity::Registry`]**: issues and recycles entity ids, stores each
//!   entity's [`Signature`] (a bit vector of owned component types).
//! - **[`component::Registry`]**: one dense, capacity-bounded array per
//!   registered component type, with bidirectional entity/slot index maps.
//! - **[`system::Registry`]**: one instance per registered [`System`], each
//!   with a required signature and a live membership set.
//! - **[`resource::Registry`]**: typed, string-keyed storage for shared
//!   objects that belong to no entity.
//!
//! The world drives the one cross-cutting protocol: component mutation →
//! signature update → membership re-evaluation. Mutating the registries
//! directly skips that protocol, so the world is the only entry point client
//! code should use.
//!
//! # Capacity
//!
//! Entity and component-type capacity is fixed when the world is constructed
//! (see [`Limits`]) and never grows. Component storage never reallocates.
//!
//! # Error handling
//!
//! Recoverable misuse (duplicate adds, duplicate registrations, destroying an
//! id that is not alive) is reported through the [`log`] facade at error
//! level and returned as a typed [`Error`]; the operation mutates nothing.
//! Contract violations (reading a component the entity does not hold,
//! touching an unregistered type) panic; they are programming errors, not
//! runtime conditions to recover from.
//!
//! # Threading
//!
//! Strictly single-threaded. Every operation takes `&self`/`&mut self` and
//! runs to completion; exclusive access is the borrow checker's job. Wrap the
//! whole [`World`] in a lock externally if you must share it.
//!
//! # Example
//!
//! ```ignore
//! use lattice_ecs::World;
//! use lattice_macros::Component;
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut world = World::new();
//! world.register_component::<Position>()?;
//!
//! let entity = world.create_entity()?;
//! world.add_component(entity, Position { x: 0.0, y: 0.0 })?;
//!
//! world.component_mut::<Position>(entity).x += 1.0;
//!
//! world.destroy_entity(entity);
//! ```

// Allows the derive macros to refer to `::lattice_ecs::…` from inside this
// crate as well as from dependents.
extern crate self as lattice_ecs;

pub mod component;
pub mod entity;
pub mod error;
pub mod resource;
pub mod signature;
pub mod system;
pub mod world;

pub use component::{Component, Token};
pub use entity::Entity;
pub use error::Error;
pub use resource::Resource;
pub use signature::Signature;
pub use system::System;
pub use world::{Limits, World};

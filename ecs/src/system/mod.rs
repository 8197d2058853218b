//! Systems: subscribers to entities matching a required signature.
//!
//! A system declares interest in every entity whose [`Signature`] is a
//! superset of the system's required signature. The [`Registry`] holds one
//! instance per registered system type, re-evaluates membership whenever an
//! entity's signature changes, and invokes the system's hooks on membership
//! edges.

use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeSet, HashMap};

use log::error;

use crate::{entity::Entity, error::Error, signature::Signature};

/// A subscriber to entities matching a required signature.
///
/// Both hooks default to empty bodies; implement the ones you need.
/// [`entity_joined`](System::entity_joined) fires when an entity's signature
/// grows to cover the requirement, [`entity_left`](System::entity_left) when
/// it shrinks below it. Neither fires when the entity is destroyed outright
/// (see [`Registry::destroyed`]).
pub trait System: 'static {
    /// Called once when an entity enters this system's membership.
    fn entity_joined(&mut self, _entity: Entity) {}

    /// Called once when an entity leaves this system's membership through a
    /// signature change.
    fn entity_left(&mut self, _entity: Entity) {}
}

/// Object-safe carrier for a boxed system: the hooks plus downcast access.
trait AnySystem: System {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> AnySystem for S {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One registered system: the instance, its requirement, and its members.
struct Entry {
    system: Box<dyn AnySystem>,

    /// The signature an entity must cover to be a member.
    required: Signature,

    /// Entities currently matching, ordered for deterministic iteration.
    entities: BTreeSet<Entity>,
}

/// Holds one instance per registered system type and keeps every membership
/// set consistent with the entity signatures it is told about.
pub struct Registry {
    /// Rust type identity to entry index.
    index: HashMap<TypeId, usize>,

    /// Registered systems in registration order.
    entries: Vec<Entry>,

    /// Width of required signatures, fixed at construction.
    signature_width: usize,
}

impl Registry {
    /// Construct a registry whose required signatures are
    /// `signature_width` bits wide.
    pub fn new(signature_width: usize) -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            signature_width,
        }
    }

    /// Register a system instance. Registration should happen before
    /// entities are processed; the signature starts empty until
    /// [`set_signature`](Registry::set_signature) is called.
    ///
    /// # Panics
    ///
    /// Panics if a system of this type is already registered.
    pub fn register<S: System>(&mut self, system: S) {
        let type_id = TypeId::of::<S>();
        if self.index.contains_key(&type_id) {
            panic!("system type {} is already registered", type_name::<S>());
        }

        self.index.insert(type_id, self.entries.len());
        self.entries.push(Entry {
            system: Box::new(system),
            required: Signature::new(self.signature_width),
            entities: BTreeSet::new(),
        });
    }

    /// Attach the required signature to a registered system.
    ///
    /// A system that is never given a signature keeps the empty one, which
    /// is a superset-match for *every* entity. Set a signature before
    /// relying on membership.
    ///
    /// Fails without mutating anything if the type is not registered; logged.
    pub fn set_signature<S: System>(&mut self, signature: Signature) -> Result<(), Error> {
        let Some(&index) = self.index.get(&TypeId::of::<S>()) else {
            error!(
                "cannot set a signature for unregistered system {}",
                type_name::<S>()
            );
            return Err(Error::UnknownSystem {
                type_name: type_name::<S>(),
            });
        };
        self.entries[index].required = signature;
        Ok(())
    }

    /// Re-evaluate every system's membership against an entity's new
    /// signature, invoking hooks on membership edges.
    ///
    /// Runs for all systems on every component add/remove: O(systems) per
    /// mutation, the dominant per-mutation cost of the design.
    pub fn signature_changed(&mut self, entity: Entity, signature: &Signature) {
        for entry in &mut self.entries {
            if signature.contains_all(&entry.required) {
                if entry.entities.insert(entity) {
                    entry.system.entity_joined(entity);
                }
            } else if entry.entities.remove(&entity) {
                entry.system.entity_left(entity);
            }
        }
    }

    /// Drop the destroyed entity from every membership set.
    ///
    /// Deliberately does NOT invoke `entity_left`: by the time the registry
    /// hears about a destruction the entity's components are already purged,
    /// so the hook would observe an entity with no data. Signature-driven
    /// removal always fires the hook; destruction never does.
    pub fn destroyed(&mut self, entity: Entity) {
        for entry in &mut self.entries {
            entry.entities.remove(&entity);
        }
    }

    /// Get the registered instance of a system type.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    pub fn get<S: System>(&self) -> &S {
        self.entry::<S>()
            .system
            .as_any()
            .downcast_ref()
            .expect("entry holds a system of another type")
    }

    /// Get the registered instance of a system type, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    pub fn get_mut<S: System>(&mut self) -> &mut S {
        let index = self.entry_index::<S>();
        self.entries[index]
            .system
            .as_any_mut()
            .downcast_mut()
            .expect("entry holds a system of another type")
    }

    /// The entities currently matching a system's required signature.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    pub fn entities_of<S: System>(&self) -> &BTreeSet<Entity> {
        &self.entry::<S>().entities
    }

    /// Number of registered systems.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no systems are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry<S: System>(&self) -> &Entry {
        &self.entries[self.entry_index::<S>()]
    }

    fn entry_index<S: System>(&self) -> usize {
        match self.index.get(&TypeId::of::<S>()) {
            Some(&index) => index,
            None => panic!("system type {} is not registered", type_name::<S>()),
        }
    }
}

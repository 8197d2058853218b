//! Typed, string-keyed storage for shared objects that belong to no entity.
//!
//! Resources are things like asset caches, input state, or configuration:
//! owned by the world at large rather than by any entity, looked up by type
//! and name. The registry OWNS stored values: [`Registry::remove`] hands
//! ownership back, replacement via [`Registry::set`] drops the old value,
//! and dropping the registry drops whatever remains. There is no non-owning
//! mode.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use log::error;

use crate::error::Error;

/// A trait marking a type as storable in the resource registry.
///
/// Use `#[derive(Resource)]` from `lattice_macros` to implement it.
pub trait Resource: 'static {}

/// One flat name→value map per registered resource type.
pub struct Registry {
    /// Rust type identity to the type's `HashMap<String, R>`.
    maps: HashMap<TypeId, Box<dyn Any>>,
}

impl Registry {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self {
            maps: HashMap::new(),
        }
    }

    /// Register a resource type and allocate its name→value map.
    ///
    /// Fails without mutating anything if the type is already registered;
    /// logged. Registration must precede any set/get/remove for the type.
    pub fn register<R: Resource>(&mut self) -> Result<(), Error> {
        let type_id = TypeId::of::<R>();
        if self.maps.contains_key(&type_id) {
            error!(
                "resource type {} is already registered, ignoring",
                type_name::<R>()
            );
            return Err(Error::DuplicateType {
                type_name: type_name::<R>(),
            });
        }
        self.maps
            .insert(type_id, Box::new(HashMap::<String, R>::new()));
        Ok(())
    }

    /// Store a value under the key, replacing (and dropping) any previous
    /// value of this type with the same key.
    pub fn set<R: Resource>(&mut self, key: impl Into<String>, value: R) {
        self.map_mut::<R>().insert(key.into(), value);
    }

    /// Get the value stored under the key, or `None` if the key is absent.
    pub fn get<R: Resource>(&self, key: &str) -> Option<&R> {
        self.map::<R>().get(key)
    }

    /// Get the value stored under the key mutably, or `None` if absent.
    pub fn get_mut<R: Resource>(&mut self, key: &str) -> Option<&mut R> {
        self.map_mut::<R>().get_mut(key)
    }

    /// Drop the mapping and hand ownership of the value back.
    pub fn remove<R: Resource>(&mut self, key: &str) -> Option<R> {
        self.map_mut::<R>().remove(key)
    }

    /// Check whether a value of the type is stored under the key.
    pub fn contains<R: Resource>(&self, key: &str) -> bool {
        self.map::<R>().contains_key(key)
    }

    /// Drop every mapping of the type, dropping the values.
    pub fn clear<R: Resource>(&mut self) {
        self.map_mut::<R>().clear();
    }

    /// Number of values stored for the type.
    pub fn len<R: Resource>(&self) -> usize {
        self.map::<R>().len()
    }

    /// Get the name→value map for a registered type.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered, the same contract as component
    /// stores.
    fn map<R: Resource>(&self) -> &HashMap<String, R> {
        match self.maps.get(&TypeId::of::<R>()) {
            Some(map) => map
                .downcast_ref()
                .expect("registry holds a map of another type"),
            None => panic!("resource type {} is not registered", type_name::<R>()),
        }
    }

    /// Get the name→value map for a registered type, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the type is not registered.
    fn map_mut<R: Resource>(&mut self) -> &mut HashMap<String, R> {
        match self.maps.get_mut(&TypeId::of::<R>()) {
            Some(map) => map
                .downcast_mut()
                .expect("registry holds a map of another type"),
            None => panic!("resource type {} is not registered", type_name::<R>()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Clock {
        ticks: u64,
    }
    impl Resource for Clock {}

    #[derive(Debug, PartialEq)]
    struct Palette(Vec<u32>);
    impl Resource for Palette {}

    #[test]
    fn set_then_get_returns_the_value() {
        // Given
        let mut resources = Registry::new();
        resources.register::<Clock>().unwrap();

        // When
        resources.set("frame", Clock { ticks: 60 });

        // Then
        assert_eq!(resources.get::<Clock>("frame"), Some(&Clock { ticks: 60 }));
        assert!(resources.contains::<Clock>("frame"));
        assert_eq!(resources.len::<Clock>(), 1);
    }

    #[test]
    fn missing_key_is_an_explicit_none() {
        // Given
        let mut resources = Registry::new();
        resources.register::<Clock>().unwrap();

        // Then - never a silently materialized default
        assert_eq!(resources.get::<Clock>("absent"), None);
        assert_eq!(resources.len::<Clock>(), 0);
    }

    #[test]
    fn set_replaces_the_previous_value() {
        // Given
        let mut resources = Registry::new();
        resources.register::<Clock>().unwrap();
        resources.set("frame", Clock { ticks: 1 });

        // When
        resources.set("frame", Clock { ticks: 2 });

        // Then
        assert_eq!(resources.get::<Clock>("frame"), Some(&Clock { ticks: 2 }));
        assert_eq!(resources.len::<Clock>(), 1);
    }

    #[test]
    fn get_mut_writes_through() {
        // Given
        let mut resources = Registry::new();
        resources.register::<Clock>().unwrap();
        resources.set("frame", Clock { ticks: 0 });

        // When
        resources.get_mut::<Clock>("frame").unwrap().ticks += 5;

        // Then
        assert_eq!(resources.get::<Clock>("frame").unwrap().ticks, 5);
    }

    #[test]
    fn remove_hands_ownership_back() {
        // Given
        let mut resources = Registry::new();
        resources.register::<Clock>().unwrap();
        resources.set("frame", Clock { ticks: 9 });

        // When
        let removed = resources.remove::<Clock>("frame");

        // Then
        assert_eq!(removed, Some(Clock { ticks: 9 }));
        assert_eq!(resources.get::<Clock>("frame"), None);
        assert_eq!(resources.remove::<Clock>("frame"), None);
    }

    #[test]
    fn clear_drops_every_value_of_the_type() {
        // Given
        let mut resources = Registry::new();
        resources.register::<Clock>().unwrap();
        resources.register::<Palette>().unwrap();
        resources.set("a", Clock { ticks: 1 });
        resources.set("b", Clock { ticks: 2 });
        resources.set("main", Palette(vec![0xffffff]));

        // When
        resources.clear::<Clock>();

        // Then - other types untouched
        assert_eq!(resources.len::<Clock>(), 0);
        assert_eq!(resources.len::<Palette>(), 1);
    }

    #[test]
    fn types_share_keys_without_collision() {
        // Given
        let mut resources = Registry::new();
        resources.register::<Clock>().unwrap();
        resources.register::<Palette>().unwrap();

        // When - same key, different types
        resources.set("main", Clock { ticks: 3 });
        resources.set("main", Palette(vec![1, 2]));

        // Then
        assert_eq!(resources.get::<Clock>("main"), Some(&Clock { ticks: 3 }));
        assert_eq!(resources.get::<Palette>("main"), Some(&Palette(vec![1, 2])));
    }

    #[test]
    fn duplicate_registration_is_refused() {
        // Given
        let mut resources = Registry::new();
        resources.register::<Clock>().unwrap();
        resources.set("frame", Clock { ticks: 7 });

        // When
        let result = resources.register::<Clock>();

        // Then - existing values survive
        assert!(matches!(result, Err(Error::DuplicateType { .. })));
        assert_eq!(resources.get::<Clock>("frame"), Some(&Clock { ticks: 7 }));
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn access_to_unregistered_type_panics() {
        // Given
        let resources = Registry::new();

        // When
        resources.get::<Clock>("anything");
    }
}

//! Dense, capacity-bounded storage for one component type.

use std::any::{Any, type_name};
use std::collections::HashMap;

use log::error;

use crate::{component::Component, entity::Entity, error::Error};

/// A packed array of component values plus bidirectional entity/slot maps.
///
/// Values live in a dense `Vec` that is allocated once at capacity and never
/// reallocates. Removal swaps the last slot into the hole, so iteration
/// order is not preserved but both maps stay exact inverses covering
/// `[0, len)` with no gaps.
///
/// The store knows nothing about signatures or liveness; the world enforces
/// those before calling in.
pub struct Store<C: Component> {
    /// Dense component values, one per occupied slot.
    values: Vec<C>,

    /// Sparse entity id to dense slot index.
    entity_to_slot: HashMap<Entity, usize>,

    /// Dense slot index back to owning entity, parallel to `values`.
    slot_to_entity: Vec<Entity>,

    /// Slot bound, fixed at construction.
    capacity: usize,
}

impl<C: Component> Store<C> {
    /// Construct a store with room for `capacity` values.
    pub fn new(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            entity_to_slot: HashMap::new(),
            slot_to_entity: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value for the entity at the tail slot. O(1).
    ///
    /// Fails without mutating anything if the entity already holds this type
    /// or the store is full; both are logged.
    pub fn insert(&mut self, entity: Entity, value: C) -> Result<(), Error> {
        if self.entity_to_slot.contains_key(&entity) {
            error!(
                "{entity:?} already holds a {} component, insert ignored",
                type_name::<C>()
            );
            return Err(Error::DuplicateComponent {
                entity,
                type_name: type_name::<C>(),
            });
        }
        if self.values.len() == self.capacity {
            error!(
                "{} store is full (capacity {}), insert ignored",
                type_name::<C>(),
                self.capacity
            );
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        self.entity_to_slot.insert(entity, self.values.len());
        self.slot_to_entity.push(entity);
        self.values.push(value);
        Ok(())
    }

    /// Remove and return the entity's value, compacting by moving the last
    /// slot into the hole. O(1); storage order is not preserved.
    ///
    /// Fails without mutating anything if the entity holds no value; logged.
    pub fn remove(&mut self, entity: Entity) -> Result<C, Error> {
        let Some(slot) = self.entity_to_slot.remove(&entity) else {
            error!(
                "{entity:?} holds no {} component, remove ignored",
                type_name::<C>()
            );
            return Err(Error::MissingComponent {
                entity,
                type_name: type_name::<C>(),
            });
        };

        let value = self.values.swap_remove(slot);
        self.slot_to_entity.swap_remove(slot);

        // The former last value now occupies the vacated slot; point its
        // owner at the new location.
        if slot < self.values.len() {
            let moved = self.slot_to_entity[slot];
            self.entity_to_slot.insert(moved, slot);
        }

        Ok(value)
    }

    /// Get the entity's value.
    ///
    /// # Panics
    ///
    /// Panics if the entity holds no value of this type. Check with
    /// [`contains`](Store::contains) or use [`try_get`](Store::try_get) to
    /// prove presence first.
    pub fn get(&self, entity: Entity) -> &C {
        self.try_get(entity)
            .unwrap_or_else(|| panic!("{entity:?} holds no {} component", type_name::<C>()))
    }

    /// Get the entity's value mutably.
    ///
    /// # Panics
    ///
    /// Panics if the entity holds no value of this type.
    pub fn get_mut(&mut self, entity: Entity) -> &mut C {
        match self.entity_to_slot.get(&entity) {
            Some(&slot) => &mut self.values[slot],
            None => panic!("{entity:?} holds no {} component", type_name::<C>()),
        }
    }

    /// Get the entity's value if it holds one.
    #[inline]
    pub fn try_get(&self, entity: Entity) -> Option<&C> {
        self.entity_to_slot.get(&entity).map(|&slot| &self.values[slot])
    }

    /// Get the entity's value mutably if it holds one.
    #[inline]
    pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        match self.entity_to_slot.get(&entity) {
            Some(&slot) => Some(&mut self.values[slot]),
            None => None,
        }
    }

    /// Check whether the entity holds a value of this type.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_to_slot.contains_key(&entity)
    }

    /// Number of values currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether no values are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The type-erased handle the registry holds for each store.
///
/// One behavioral method is enough: drop an entity's slot if it has one. The
/// `Any` accessors exist so the registry can hand back the concrete
/// [`Store<C>`] for typed operations.
pub trait AnyStore {
    /// Remove the entity's value if present, dropping it. Never fails.
    fn purge(&mut self, entity: Entity);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> AnyStore for Store<C> {
    fn purge(&mut self, entity: Entity) {
        if self.contains(entity) {
            // Presence was just checked, so this cannot fail or log.
            let _ = self.remove(entity);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    impl Component for Health {}

    fn entity(id: u32) -> Entity {
        Entity::new(id)
    }

    /// The dense-array invariant: the maps are exact inverses over [0, len).
    fn assert_maps_are_inverses(store: &Store<Health>) {
        assert_eq!(store.slot_to_entity.len(), store.values.len());
        assert_eq!(store.entity_to_slot.len(), store.values.len());
        for (slot, owner) in store.slot_to_entity.iter().enumerate() {
            assert_eq!(store.entity_to_slot[owner], slot);
        }
    }

    #[test]
    fn insert_then_get_returns_the_value() {
        // Given
        let mut store = Store::new(4);

        // When
        store.insert(entity(0), Health(100)).unwrap();

        // Then
        assert_eq!(store.get(entity(0)), &Health(100));
        assert!(store.contains(entity(0)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_insert_is_refused_and_keeps_the_first_value() {
        // Given
        let mut store = Store::new(4);
        store.insert(entity(0), Health(100)).unwrap();

        // When
        let result = store.insert(entity(0), Health(55));

        // Then
        assert!(matches!(result, Err(Error::DuplicateComponent { .. })));
        assert_eq!(store.get(entity(0)), &Health(100));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_at_capacity_is_refused() {
        // Given
        let mut store = Store::new(2);
        store.insert(entity(0), Health(1)).unwrap();
        store.insert(entity(1), Health(2)).unwrap();

        // When
        let result = store.insert(entity(2), Health(3));

        // Then
        assert_eq!(result, Err(Error::CapacityExceeded { capacity: 2 }));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_returns_the_value_and_compacts() {
        // Given
        let mut store = Store::new(4);
        store.insert(entity(0), Health(10)).unwrap();
        store.insert(entity(1), Health(20)).unwrap();
        store.insert(entity(2), Health(30)).unwrap();

        // When - remove from the middle so the tail value moves
        let removed = store.remove(entity(1)).unwrap();

        // Then
        assert_eq!(removed, Health(20));
        assert_eq!(store.len(), 2);
        assert!(!store.contains(entity(1)));
        assert_eq!(store.get(entity(0)), &Health(10));
        assert_eq!(store.get(entity(2)), &Health(30));
        assert_maps_are_inverses(&store);
    }

    #[test]
    fn remove_of_missing_value_is_refused() {
        // Given
        let mut store: Store<Health> = Store::new(4);

        // When
        let result = store.remove(entity(0));

        // Then
        assert!(matches!(result, Err(Error::MissingComponent { .. })));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn maps_stay_inverses_across_churn() {
        // Given
        let mut store = Store::new(8);
        for id in 0..8 {
            store.insert(entity(id), Health(id)).unwrap();
        }

        // When - interleave removals and re-inserts
        store.remove(entity(3)).unwrap();
        store.remove(entity(7)).unwrap();
        store.remove(entity(0)).unwrap();
        store.insert(entity(3), Health(33)).unwrap();
        store.remove(entity(5)).unwrap();

        // Then
        assert_maps_are_inverses(&store);
        assert_eq!(store.len(), 5);
        assert_eq!(store.get(entity(3)), &Health(33));
    }

    #[test]
    fn get_mut_writes_through() {
        // Given
        let mut store = Store::new(4);
        store.insert(entity(0), Health(10)).unwrap();

        // When
        store.get_mut(entity(0)).0 = 42;

        // Then
        assert_eq!(store.get(entity(0)), &Health(42));
    }

    #[test]
    #[should_panic(expected = "holds no")]
    fn get_after_remove_panics() {
        // Given
        let mut store = Store::new(4);
        store.insert(entity(0), Health(10)).unwrap();
        store.remove(entity(0)).unwrap();

        // When
        store.get(entity(0));
    }

    #[test]
    fn try_get_reports_absence_explicitly() {
        // Given
        let mut store = Store::new(4);
        store.insert(entity(0), Health(10)).unwrap();

        // Then
        assert_eq!(store.try_get(entity(0)), Some(&Health(10)));
        assert_eq!(store.try_get(entity(1)), None);
    }

    #[test]
    fn purge_drops_the_slot_if_present() {
        // Given
        let mut store = Store::new(4);
        store.insert(entity(0), Health(10)).unwrap();

        // When
        store.purge(entity(0));
        store.purge(entity(1)); // absent, still fine

        // Then
        assert!(!store.contains(entity(0)));
        assert!(store.is_empty());
    }
}

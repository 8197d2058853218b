//! Entity identifiers and their lifecycle.
//!
//! An [`Entity`] is an opaque id in `[0, capacity)`. The [`Registry`] issues
//! ids from a FIFO free list, recycles them on destruction, and owns each
//! entity's [`Signature`]. Ids are dense, which lets every other registry use
//! them as array indices.
//!
//! Destroying an id that is not currently alive is refused and logged rather
//! than corrupting the free list; callers that care can check the returned
//! `bool`.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use log::error;

use crate::{error::Error, signature::Signature};

/// An opaque entity identifier in `[0, capacity)`.
///
/// Ids are reused after destruction, so a held `Entity` is only meaningful
/// while the entity is alive. The registry answers
/// [`is_living`](Registry::is_living) for callers that need to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    /// Construct an entity from a raw id value.
    #[inline]
    pub(crate) const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[inline]
    pub fn id(&self) -> u32 {
        self.0
    }

    /// Get the index of this entity for use in indexable storage.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Issues and recycles entity ids and stores each entity's signature.
pub struct Registry {
    /// Ids available for use, popped front / pushed back (FIFO reuse).
    free: VecDeque<Entity>,

    /// One signature per id slot, indexed by entity id.
    signatures: Vec<Signature>,

    /// Bit per id slot, set while the id is alive.
    living: FixedBitSet,

    /// Number of ids currently alive.
    living_count: usize,
}

impl Registry {
    /// Construct a registry with `capacity` issuable ids and signatures
    /// `signature_width` bits wide.
    pub fn new(capacity: usize, signature_width: usize) -> Self {
        Self {
            free: (0..capacity as u32).map(Entity::new).collect(),
            signatures: vec![Signature::new(signature_width); capacity],
            living: FixedBitSet::with_capacity(capacity),
            living_count: 0,
        }
    }

    /// Issue the next free id with a cleared signature.
    ///
    /// Fails with [`Error::CapacityExceeded`] when every id is alive; no id
    /// is issued.
    pub fn create(&mut self) -> Result<Entity, Error> {
        let Some(entity) = self.free.pop_front() else {
            error!(
                "no free entity ids remain (capacity {})",
                self.signatures.len()
            );
            return Err(Error::CapacityExceeded {
                capacity: self.signatures.len(),
            });
        };

        self.signatures[entity.index()].clear();
        self.living.insert(entity.index());
        self.living_count += 1;
        Ok(entity)
    }

    /// Destroy a living entity: clear its signature and recycle the id.
    ///
    /// Returns `false` without mutating anything if the id is out of range
    /// or not currently alive; both are logged. The alive check makes
    /// double-destroy a refused no-op instead of a free-list corruption.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if entity.index() >= self.signatures.len() {
            error!("attempted to destroy out-of-range entity {entity:?}");
            return false;
        }
        if !self.living.contains(entity.index()) {
            error!("attempted to destroy {entity:?}, which is not alive");
            return false;
        }

        self.signatures[entity.index()].clear();
        self.living.set(entity.index(), false);
        self.free.push_back(entity);
        self.living_count -= 1;
        true
    }

    /// Replace the entity's signature.
    ///
    /// An out-of-range id is logged and ignored.
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) {
        let Some(slot) = self.signatures.get_mut(entity.index()) else {
            error!("attempted to set the signature of out-of-range entity {entity:?}");
            return;
        };
        *slot = signature;
    }

    /// Get the entity's signature.
    ///
    /// # Panics
    ///
    /// Panics if the id is out of range. Reads have no failure channel, so a
    /// bad id here is a caller bug, not a runtime condition.
    pub fn signature(&self, entity: Entity) -> &Signature {
        self.signatures
            .get(entity.index())
            .unwrap_or_else(|| panic!("signature read for out-of-range entity {entity:?}"))
    }

    /// Check whether the id is currently alive.
    #[inline]
    pub fn is_living(&self, entity: Entity) -> bool {
        entity.index() < self.signatures.len() && self.living.contains(entity.index())
    }

    /// Number of ids currently alive.
    #[inline]
    pub fn living_count(&self) -> usize {
        self.living_count
    }

    /// Total number of issuable ids.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.signatures.len()
    }
}

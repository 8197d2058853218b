//! Fixed-width bit vectors recording which component types an entity owns.

use fixedbitset::FixedBitSet;

use crate::component::Token;

/// A fixed-width bit vector with one bit per component type token.
///
/// Bit *i* is set iff the owner currently holds a component whose
/// [`Token`] index is *i*. The width is the world's component-type capacity
/// and never changes after construction.
///
/// Signatures drive system membership: an entity belongs to a system when its
/// signature [`contains_all`](Signature::contains_all) of the system's
/// required signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    bits: FixedBitSet,
}

impl Signature {
    /// Construct an empty signature with one bit per possible token.
    #[inline]
    pub fn new(width: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(width),
        }
    }

    /// Set the bit for the given token.
    #[inline]
    pub fn insert(&mut self, token: Token) {
        self.bits.insert(token.index());
    }

    /// Clear the bit for the given token.
    #[inline]
    pub fn remove(&mut self, token: Token) {
        self.bits.set(token.index(), false);
    }

    /// Check whether the bit for the given token is set.
    #[inline]
    pub fn contains(&self, token: Token) -> bool {
        self.bits.contains(token.index())
    }

    /// Check whether every bit set in `required` is also set here.
    ///
    /// An empty `required` signature is a subset of everything, so it always
    /// matches.
    #[inline]
    pub fn contains_all(&self, required: &Signature) -> bool {
        self.bits.is_superset(&required.bits)
    }

    /// Clear every bit.
    #[inline]
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Check whether no bits are set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// The number of token bits this signature can hold.
    #[inline]
    pub fn width(&self) -> usize {
        self.bits.len()
    }
}
